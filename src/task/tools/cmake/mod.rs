// smelter: third-party dependency build orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `CMake` tool for generate/clean operations.
//!
//! ```text
//! CmakeTool
//! Operations: Generate | Clean
//! Builder: root/prefix/def/prefix_path/generator
//! Run: cwd = <root>/vsbuild, "cmake -G ... -D... <root>"
//! build_path_for(root) is pure so tasks can derive solution paths
//! without constructing a tool
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::debug;

use super::{Tool, ToolContext};
use crate::error::Result;
use crate::utility::fs;

/// `CMake` generator used for configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CmakeGenerator {
    /// Visual Studio generator (multi-config, x64).
    #[default]
    VisualStudio,
    /// Ninja generator.
    Ninja,
}

impl CmakeGenerator {
    const fn as_str(self) -> &'static str {
        match self {
            Self::VisualStudio => "Visual Studio 17 2022",
            Self::Ninja => "Ninja",
        }
    }

    /// Name of the build directory under the source root.
    const fn build_dir_name(self) -> &'static str {
        match self {
            Self::VisualStudio => "vsbuild",
            Self::Ninja => "build",
        }
    }
}

/// `CMake` operation to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CmakeOperation {
    /// Generate the build system into the build directory.
    #[default]
    Generate,
    /// Delete the build directory.
    Clean,
}

/// `CMake` tool. Running it returns the build path.
#[derive(Debug, Clone, Default)]
pub struct CmakeTool {
    root: Option<PathBuf>,
    prefix: Option<PathBuf>,
    definitions: BTreeMap<String, String>,
    prefix_paths: Vec<PathBuf>,
    generator: CmakeGenerator,
    operation: CmakeOperation,
}

impl CmakeTool {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Derives the build path for a source root under the default
    /// generator. Pure: consults neither the filesystem nor a tool
    /// instance.
    #[must_use]
    pub fn build_path_for(root: &Path) -> PathBuf {
        root.join(CmakeGenerator::VisualStudio.build_dir_name())
    }

    /// Sets the source root.
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Sets `CMAKE_INSTALL_PREFIX`.
    #[must_use]
    pub fn prefix(mut self, path: impl Into<PathBuf>) -> Self {
        self.prefix = Some(path.into());
        self
    }

    /// Adds a `-D` definition.
    #[must_use]
    pub fn def(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.definitions.insert(key.into(), value.into());
        self
    }

    /// Adds a `CMAKE_PREFIX_PATH` entry.
    #[must_use]
    pub fn prefix_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.prefix_paths.push(path.into());
        self
    }

    #[must_use]
    pub const fn generator(mut self, generator: CmakeGenerator) -> Self {
        self.generator = generator;
        self
    }

    #[must_use]
    pub const fn generate_op(mut self) -> Self {
        self.operation = CmakeOperation::Generate;
        self
    }

    #[must_use]
    pub const fn clean_op(mut self) -> Self {
        self.operation = CmakeOperation::Clean;
        self
    }

    fn root_required(&self) -> Result<&Path> {
        self.root.as_deref().context("cmake: root is required")
    }

    /// The build directory this tool generates into.
    pub fn build_path(&self) -> Result<PathBuf> {
        Ok(self.root_required()?.join(self.generator.build_dir_name()))
    }

    fn combined_definitions(&self) -> BTreeMap<String, String> {
        let mut definitions = self.definitions.clone();

        if let Some(prefix) = &self.prefix {
            definitions
                .entry("CMAKE_INSTALL_PREFIX".to_string())
                .or_insert_with(|| prefix.display().to_string());
        }

        if !self.prefix_paths.is_empty() {
            let value = self
                .prefix_paths
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(";");
            definitions
                .entry("CMAKE_PREFIX_PATH".to_string())
                .or_insert(value);
        }

        definitions
    }

    /// Renders the generate invocation without running it.
    pub(crate) fn generate_process(&self, ctx: &ToolContext) -> Result<crate::core::process::Process> {
        let root = self.root_required()?;
        let build_path = self.build_path()?;

        let cmake = ctx.tool_binary(&ctx.config().tools.cmake, "cmake")?;

        let mut process = ctx
            .process()
            .name("cmake")
            .binary(&cmake)
            .cwd(&build_path)
            .arg_pair_quoted("-G", self.generator.as_str());

        if self.generator == CmakeGenerator::VisualStudio {
            process = process.arg_pair("-A", "x64");
        }

        for (key, value) in self.combined_definitions() {
            process = process.arg_pair(&format!("-D{key}="), value.as_str());
        }

        Ok(process.arg(root))
    }

    fn do_generate(&self, ctx: &ToolContext) -> Result<PathBuf> {
        let build_path = self.build_path()?;

        debug!(build = %build_path.display(), "generating");
        self.generate_process(ctx)?.execute()?;

        Ok(build_path)
    }

    fn do_clean(&self, ctx: &ToolContext) -> Result<PathBuf> {
        let build_path = self.build_path()?;

        if ctx.is_dry_run() {
            debug!(build = %build_path.display(), "[dry-run] would delete build directory");
            return Ok(build_path);
        }

        fs::delete_directory(&build_path)?;
        Ok(build_path)
    }
}

impl Tool for CmakeTool {
    type Output = PathBuf;

    fn name(&self) -> &'static str {
        "cmake"
    }

    fn run(&self, ctx: &ToolContext) -> Result<PathBuf> {
        match self.operation {
            CmakeOperation::Generate => self.do_generate(ctx),
            CmakeOperation::Clean => self.do_clean(ctx),
        }
    }
}

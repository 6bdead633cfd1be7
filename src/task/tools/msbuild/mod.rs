// smelter: third-party dependency build orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `MSBuild` tool for Visual Studio solution/project builds.
//!
//! ```text
//! MsbuildTool
//! Operations: Build | Clean
//! Builder: solution/configuration/platform/target
//! Run: "msbuild -nologo -m -p:... -t:... <solution>"
//! Stdout gated behind verbose mode (STDOUT_IS_VERBOSE)
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::debug;

use super::{Tool, ToolContext};
use crate::core::process::{ArgFlags, ProcessFlags};
use crate::error::Result;

/// `MSBuild` operation to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MsbuildOperation {
    /// Build the solution/project (the INSTALL project installs too).
    #[default]
    Build,
    /// Clean the solution/project.
    Clean,
}

impl MsbuildOperation {
    const fn target(self) -> &'static str {
        match self {
            Self::Build => "Build",
            Self::Clean => "Clean",
        }
    }
}

/// `MSBuild` tool. Running it returns the path of the built artifact.
#[derive(Debug, Clone)]
pub struct MsbuildTool {
    solution: Option<PathBuf>,
    configuration: String,
    platform: String,
    operation: MsbuildOperation,
}

impl Default for MsbuildTool {
    fn default() -> Self {
        Self::new()
    }
}

impl MsbuildTool {
    #[must_use]
    pub fn new() -> Self {
        Self {
            solution: None,
            configuration: "Release".to_string(),
            platform: "x64".to_string(),
            operation: MsbuildOperation::Build,
        }
    }

    /// Sets the solution or project file to build.
    #[must_use]
    pub fn solution(mut self, path: impl Into<PathBuf>) -> Self {
        self.solution = Some(path.into());
        self
    }

    /// Sets the build configuration (default: Release).
    #[must_use]
    pub fn configuration(mut self, configuration: impl Into<String>) -> Self {
        self.configuration = configuration.into();
        self
    }

    /// Sets the target platform (default: x64).
    #[must_use]
    pub fn platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = platform.into();
        self
    }

    #[must_use]
    pub const fn build_op(mut self) -> Self {
        self.operation = MsbuildOperation::Build;
        self
    }

    #[must_use]
    pub const fn clean_op(mut self) -> Self {
        self.operation = MsbuildOperation::Clean;
        self
    }

    fn solution_required(&self) -> Result<&Path> {
        self.solution
            .as_deref()
            .context("msbuild: solution is required")
    }

    /// Renders the msbuild invocation without running it.
    fn build_process(&self, ctx: &ToolContext) -> Result<crate::core::process::Process> {
        let solution = self.solution_required()?;

        let msbuild = ctx.tool_binary(&ctx.config().tools.msbuild, "msbuild")?;

        Ok(ctx
            .process()
            .name("msbuild")
            .binary(&msbuild)
            .flag(ProcessFlags::STDOUT_IS_VERBOSE)
            .arg("-nologo")
            .arg("-m")
            .arg_pair("-p:Configuration=", self.configuration.as_str())
            .arg_pair("-p:Platform=", self.platform.as_str())
            .arg_pair_flagged("-t:", self.operation.target(), ArgFlags::NOSPACE)
            .arg(solution))
    }
}

impl Tool for MsbuildTool {
    type Output = PathBuf;

    fn name(&self) -> &'static str {
        "msbuild"
    }

    fn run(&self, ctx: &ToolContext) -> Result<PathBuf> {
        let solution = self.solution_required()?.to_path_buf();

        debug!(
            solution = %solution.display(),
            target = self.operation.target(),
            "running msbuild"
        );
        self.build_process(ctx)?.execute()?;

        Ok(solution)
    }
}

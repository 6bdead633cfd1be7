// smelter: third-party dependency build orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Tool abstractions for task execution.
//!
//! ```text
//! Task --> run_tool(tool) --> ToolContext --> Process
//!   downloader, extractor, cmake, msbuild
//! Each tool: operation enum + typed Output
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use crate::config::Config;
use crate::core::process::Process;
use crate::error::Result;

pub mod cmake;
pub mod downloader;
pub mod extractor;
pub mod msbuild;

/// Context provided to tools during execution.
///
/// Carries the shared configuration, the interrupt flag processes adopt,
/// and the dry-run bit.
#[derive(Clone)]
pub struct ToolContext {
    config: Arc<Config>,
    interrupt: Arc<AtomicBool>,
    dry_run: bool,
}

impl ToolContext {
    /// Creates a new `ToolContext`.
    #[must_use]
    pub const fn new(config: Arc<Config>, interrupt: Arc<AtomicBool>, dry_run: bool) -> Self {
        Self {
            config,
            interrupt,
            dry_run,
        }
    }

    /// Returns a reference to the configuration.
    #[must_use]
    pub const fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// Returns the shared interrupt flag.
    #[must_use]
    pub const fn interrupt(&self) -> &Arc<AtomicBool> {
        &self.interrupt
    }

    /// Returns whether this is a dry-run execution.
    #[must_use]
    pub const fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Checks if an interrupt has been requested.
    #[must_use]
    pub fn is_interrupted(&self) -> bool {
        self.interrupt.load(std::sync::atomic::Ordering::SeqCst)
    }

    /// Starts a [`Process`] pre-wired with this context's verbosity,
    /// dry-run bit, and interrupt flag.
    ///
    /// Verbosity affects argument filtering, so call this before adding
    /// arguments.
    #[must_use]
    pub fn process(&self) -> Process {
        Process::new()
            .verbose(self.config.global.verbose)
            .dry(self.dry_run)
            .interrupt_flag(Arc::clone(&self.interrupt))
    }

    /// Resolves a tool binary: the configured path if set, otherwise PATH
    /// discovery.
    pub(crate) fn tool_binary(&self, configured: &Path, name: &str) -> Result<PathBuf> {
        if configured.as_os_str().is_empty() {
            which::which(name).map_err(|_| {
                crate::error::ProcessError::ExecutableNotFound {
                    name: name.to_string(),
                }
                .into()
            })
        } else {
            Ok(configured.to_path_buf())
        }
    }
}

/// Trait for tools consumed by tasks.
///
/// Tools are the building blocks of tasks. Each tool encapsulates one
/// external operation (download, extract, cmake generate, msbuild) and
/// returns a tool-specific result: the downloader yields the downloaded
/// file, cmake its build path, msbuild the built artifact.
pub trait Tool {
    /// Tool-specific result of a successful run.
    type Output;

    /// Returns the name of this tool (e.g. "cmake", "msbuild").
    fn name(&self) -> &str;

    /// Executes the tool's operation.
    fn run(&self, ctx: &ToolContext) -> Result<Self::Output>;
}

#[cfg(test)]
mod tests;

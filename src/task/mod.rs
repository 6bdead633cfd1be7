// smelter: third-party dependency build orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Task execution system.
//!
//! # Architecture
//!
//! ```text
//! TaskManager
//!      |
//!      v
//!   Task enum ----> TaskContext (config, interrupt flag)
//!      |
//!      v
//!    Phases
//!   /  |   \
//!  v   v    v
//! Clean Fetch Build+Install
//!                  |
//!                  v
//!               Tools
//!      downloader, extractor,
//!        cmake, msbuild
//! ```
//!
//! # Key Types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`Taskable`] | Trait defining the common task interface |
//! | [`Task`] | Enum dispatching to concrete task implementations |
//! | [`CleanFlags`] | Bitflags controlling what to clean |
//! | [`TaskContext`] | Execution context with config and interrupt flag |
//! | [`PhaseControl`] | Clean / Fetch / `BuildAndInstall` toggles |
//!
//! # The Taskable Pattern
//!
//! `source_path()` is a pure function of the task name and its registered
//! version; it never inspects the filesystem. That keeps cross-task path
//! references (one task's install tree feeding another's prefix path)
//! resolvable before anything has been fetched or built.
//!
//! ## Adding a New Task
//!
//! 1. Create the task struct in `tasks/`
//! 2. Implement `Taskable` for the struct
//! 3. Add a variant to the `Task` enum
//! 4. Add the variant name to the `impl_taskable_for_task!` invocation

pub mod manager;
pub mod registry;
pub mod tasks;
pub mod tools;

use bitflags::bitflags;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Context as _;
use tracing::debug;

use crate::config::Config;
use crate::error::{Result, TaskError};
use crate::task::tools::{Tool, ToolContext};

use tasks::binary_io::BinaryIoTask;
use tasks::bsa::BsaTask;
use tasks::directxtex::DirectXTexTask;
use tasks::mmio::MmioTask;

bitflags! {
    /// Flags controlling what gets discarded during the clean phase.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CleanFlags: u8 {
        /// Delete cached archives so they are downloaded again.
        const REDOWNLOAD = 0x01;

        /// Delete the extracted source directory.
        const REEXTRACT = 0x02;

        /// Delete the build configuration (cmake build tree).
        const RECONFIGURE = 0x04;

        /// Clean build artifacts without reconfiguring.
        const REBUILD = 0x08;
    }
}

/// Controls which task phases are enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseControl {
    do_clean: bool,
    do_fetch: bool,
    do_build: bool,
}

impl Default for PhaseControl {
    fn default() -> Self {
        Self::new()
    }
}

impl PhaseControl {
    /// Creates the default phase settings.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            do_clean: false,
            do_fetch: true,
            do_build: true,
        }
    }

    /// Sets whether to run the clean phase.
    #[must_use]
    pub const fn with_clean(mut self, enable: bool) -> Self {
        self.do_clean = enable;
        self
    }

    /// Sets whether to run the fetch phase.
    #[must_use]
    pub const fn with_fetch(mut self, enable: bool) -> Self {
        self.do_fetch = enable;
        self
    }

    /// Sets whether to run the build phase.
    #[must_use]
    pub const fn with_build(mut self, enable: bool) -> Self {
        self.do_build = enable;
        self
    }

    /// Returns whether the clean phase should run.
    #[must_use]
    pub const fn do_clean(&self) -> bool {
        self.do_clean
    }

    /// Returns whether the fetch phase should run.
    #[must_use]
    pub const fn do_fetch(&self) -> bool {
        self.do_fetch
    }

    /// Returns whether the build phase should run.
    #[must_use]
    pub const fn do_build(&self) -> bool {
        self.do_build
    }
}

/// Trait for task implementations.
pub trait Taskable {
    /// Returns the task name.
    fn name(&self) -> &str;

    /// Whether a prebuilt artifact is used instead of building from
    /// source.
    fn prebuilt(&self) -> bool {
        false
    }

    /// Looks up the task's version in the configuration registry.
    fn version(&self, config: &Config) -> Result<String> {
        Ok(config.versions.get(self.name())?.to_string())
    }

    /// Derives the source directory: `<build root>/<name>-<version>`.
    ///
    /// Pure: depends only on the name and the resolved version.
    fn source_path(&self, config: &Config) -> Result<PathBuf> {
        let build = config
            .paths
            .build
            .as_ref()
            .context("paths.build not configured")?;
        Ok(build.join(format!("{}-{}", self.name(), self.version(config)?)))
    }

    /// Executes the clean phase for the given flags.
    fn do_clean(&self, ctx: &TaskContext, flags: CleanFlags) -> Result<()>;

    /// Executes the fetch phase (download + extract).
    fn do_fetch(&self, ctx: &TaskContext) -> Result<()>;

    /// Executes the build and install phase.
    fn do_build_and_install(&self, ctx: &TaskContext) -> Result<()>;
}

/// Context provided to tasks during execution.
#[derive(Clone)]
pub struct TaskContext {
    config: Arc<Config>,
    interrupt: Arc<AtomicBool>,
    dry_run: bool,
    clean_flags: CleanFlags,
    phases: PhaseControl,
}

impl TaskContext {
    /// Creates a new `TaskContext`.
    #[must_use]
    pub fn new(config: Arc<Config>, interrupt: Arc<AtomicBool>) -> Self {
        Self {
            config,
            interrupt,
            dry_run: false,
            clean_flags: CleanFlags::empty(),
            phases: PhaseControl::new(),
        }
    }

    /// Gets a reference to the configuration.
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

    /// Gets the clean flags.
    #[must_use]
    pub const fn clean_flags(&self) -> CleanFlags {
        self.clean_flags
    }

    /// Gets the phase control.
    #[must_use]
    pub const fn phases(&self) -> PhaseControl {
        self.phases
    }

    /// Sets dry-run mode.
    #[must_use]
    pub const fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Sets clean flags.
    #[must_use]
    pub const fn with_clean_flags(mut self, flags: CleanFlags) -> Self {
        self.clean_flags = flags;
        self
    }

    /// Replaces the phase toggles.
    #[must_use]
    pub const fn with_phases(mut self, phases: PhaseControl) -> Self {
        self.phases = phases;
        self
    }

    /// Checks if an interrupt has been requested.
    #[must_use]
    pub fn is_interrupted(&self) -> bool {
        self.interrupt.load(Ordering::SeqCst)
    }

    /// Creates a `ToolContext` from this `TaskContext`.
    #[must_use]
    pub fn tool_context(&self) -> ToolContext {
        ToolContext::new(
            Arc::clone(&self.config),
            Arc::clone(&self.interrupt),
            self.dry_run,
        )
    }

    /// Runs a tool with this task's context and returns its typed result.
    pub fn run_tool<T: Tool>(&self, tool: &T) -> Result<T::Output> {
        debug!(tool = %tool.name(), "running tool");
        tool.run(&self.tool_context())
    }
}

/// A build task.
///
/// This enum uses compile-time dispatch; new task types are added as
/// variants.
#[derive(Debug, Clone)]
pub enum Task {
    /// `binary_io` library build task.
    BinaryIo(BinaryIoTask),
    /// `bsa` library build task (depends on the other three).
    Bsa(BsaTask),
    /// `DirectXTex` library build task.
    DirectXTex(DirectXTexTask),
    /// `mmio` library build task.
    Mmio(MmioTask),
}

impl Task {
    /// Runs the task through all enabled phases, checking for interrupts
    /// between them.
    ///
    /// # Errors
    ///
    /// Returns an error if any enabled phase fails or the task is
    /// interrupted between phases.
    pub fn run(&self, ctx: &TaskContext) -> Result<()> {
        if ctx.phases().do_clean() && !ctx.clean_flags().is_empty() {
            if ctx.is_interrupted() {
                return Err(TaskError::Interrupted(self.name().to_string()).into());
            }
            self.do_clean(ctx, ctx.clean_flags())?;
        }

        if ctx.phases().do_fetch() {
            if ctx.is_interrupted() {
                return Err(TaskError::Interrupted(self.name().to_string()).into());
            }
            self.do_fetch(ctx)?;
        }

        if ctx.phases().do_build() {
            if ctx.is_interrupted() {
                return Err(TaskError::Interrupted(self.name().to_string()).into());
            }
            self.do_build_and_install(ctx)?;
        }

        Ok(())
    }
}

/// Macro to implement Taskable for Task enum by delegating to inner types.
macro_rules! impl_taskable_for_task {
    ($($variant:ident),+ $(,)?) => {
        impl Taskable for Task {
            fn name(&self) -> &str {
                match self {
                    $(Task::$variant(t) => Taskable::name(t),)+
                }
            }

            fn prebuilt(&self) -> bool {
                match self {
                    $(Task::$variant(t) => Taskable::prebuilt(t),)+
                }
            }

            fn do_clean(&self, ctx: &TaskContext, flags: CleanFlags) -> Result<()> {
                match self {
                    $(Task::$variant(t) => Taskable::do_clean(t, ctx, flags),)+
                }
            }

            fn do_fetch(&self, ctx: &TaskContext) -> Result<()> {
                match self {
                    $(Task::$variant(t) => Taskable::do_fetch(t, ctx),)+
                }
            }

            fn do_build_and_install(&self, ctx: &TaskContext) -> Result<()> {
                match self {
                    $(Task::$variant(t) => Taskable::do_build_and_install(t, ctx),)+
                }
            }
        }
    };
}

impl_taskable_for_task!(BinaryIo, Bsa, DirectXTex, Mmio);

/// All built-in tasks, in a dependency-respecting order: `bsa` consumes
/// the install trees of the other three.
#[must_use]
pub fn default_tasks() -> Vec<Task> {
    vec![
        Task::BinaryIo(BinaryIoTask::new()),
        Task::DirectXTex(DirectXTexTask::new()),
        Task::Mmio(MmioTask::new()),
        Task::Bsa(BsaTask::new()),
    ]
}

// smelter: third-party dependency build orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Task manager for orchestrating task execution.
//!
//! ```text
//! TaskManager::new(config)
//!   .with_clean_flags() .with_dry_run() .add()
//!   .run()
//!       per task: Clean --> Fetch --> Build+Install
//!       interrupt flag shared with every spawned process
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::info;

use crate::config::Config;
use crate::error::{Result, TaskError};

use super::{CleanFlags, PhaseControl, Task, TaskContext, Taskable};

/// Runs tasks sequentially in the order they were added.
///
/// The interrupt flag is shared: Ctrl-C handlers and processes spawned by
/// tools all observe the same atomic.
pub struct TaskManager {
    tasks: Vec<Task>,
    interrupt: Arc<AtomicBool>,
    config: Arc<Config>,
    dry_run: bool,
    clean_flags: CleanFlags,
    phases: PhaseControl,
}

impl TaskManager {
    /// Creates a new `TaskManager` with the given configuration.
    #[must_use]
    pub fn new(config: Arc<Config>) -> Self {
        Self {
            tasks: Vec::new(),
            interrupt: Arc::new(AtomicBool::new(false)),
            config,
            dry_run: false,
            clean_flags: CleanFlags::empty(),
            phases: PhaseControl::new(),
        }
    }

    /// Sets dry-run mode.
    #[must_use]
    pub const fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Sets clean flags; the clean phase runs when any are set.
    #[must_use]
    pub fn with_clean_flags(mut self, flags: CleanFlags) -> Self {
        self.clean_flags = flags;
        self.phases = self.phases.with_clean(!flags.is_empty());
        self
    }

    /// Enables or disables the fetch phase.
    #[must_use]
    pub const fn with_do_fetch(mut self, enable: bool) -> Self {
        self.phases = self.phases.with_fetch(enable);
        self
    }

    /// Enables or disables the build phase.
    #[must_use]
    pub const fn with_do_build(mut self, enable: bool) -> Self {
        self.phases = self.phases.with_build(enable);
        self
    }

    /// Adds a task to be executed.
    pub fn add(&mut self, task: Task) {
        self.tasks.push(task);
    }

    /// Returns the number of tasks.
    #[must_use]
    pub const fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Returns the shared interrupt flag, e.g. for a Ctrl-C handler.
    #[must_use]
    pub fn interrupt_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.interrupt)
    }

    /// Requests a cooperative interrupt of the running task.
    pub fn interrupt(&self) {
        self.interrupt.store(true, Ordering::SeqCst);
    }

    /// Returns whether an interrupt has been requested.
    #[must_use]
    pub fn is_interrupted(&self) -> bool {
        self.interrupt.load(Ordering::SeqCst)
    }

    /// Runs all tasks in order.
    ///
    /// # Errors
    ///
    /// Stops at the first failing task, or when interrupted between
    /// tasks.
    pub fn run(&self) -> Result<()> {
        let ctx = TaskContext::new(Arc::clone(&self.config), Arc::clone(&self.interrupt))
            .with_dry_run(self.dry_run)
            .with_clean_flags(self.clean_flags)
            .with_phases(self.phases);

        for task in &self.tasks {
            if self.is_interrupted() {
                return Err(TaskError::Interrupted(task.name().to_string()).into());
            }

            info!(task = %task.name(), "running task");
            task.run(&ctx)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;

// smelter: third-party dependency build orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `build` command: select tasks, wire Ctrl-C, run the manager.

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use crate::cli::BuildArgs;
use crate::config::Config;
use crate::error::Result;
use crate::task::manager::TaskManager;
use crate::task::registry::TaskRegistry;
use crate::task::{CleanFlags, Task, Taskable, default_tasks};

fn clean_flags(args: &BuildArgs) -> CleanFlags {
    let mut flags = CleanFlags::empty();
    if args.redownload || args.clean_all {
        flags |= CleanFlags::REDOWNLOAD;
    }
    if args.reextract || args.clean_all {
        flags |= CleanFlags::REEXTRACT;
    }
    if args.reconfigure || args.clean_all {
        flags |= CleanFlags::RECONFIGURE;
    }
    if args.rebuild || args.clean_all {
        flags |= CleanFlags::REBUILD;
    }
    flags
}

/// Selects the requested tasks, preserving the default dependency order.
fn select_tasks(args: &BuildArgs, config: &Config) -> Result<Vec<Task>> {
    let all = default_tasks();

    let mut registry = TaskRegistry::new(config.aliases.clone());
    registry.register_all(all.iter().map(|t| t.name().to_string()));

    let selected = registry.resolve(&args.tasks)?;

    Ok(all
        .into_iter()
        .filter(|task| selected.iter().any(|name| name.as_str() == task.name()))
        .collect())
}

/// Runs the `build` command.
///
/// # Errors
///
/// Returns an error when task selection fails or any task fails.
pub fn run_build_command(args: &BuildArgs, config: &Config, dry_run: bool) -> Result<()> {
    let tasks = select_tasks(args, config)?;
    if tasks.is_empty() {
        warn!("no tasks selected");
        return Ok(());
    }

    let mut manager = TaskManager::new(Arc::new(config.clone()))
        .with_dry_run(dry_run)
        .with_clean_flags(clean_flags(args))
        .with_do_fetch(!args.no_fetch)
        .with_do_build(!args.no_build);

    for task in tasks {
        manager.add(task);
    }

    let interrupt = manager.interrupt_flag();
    ctrlc::set_handler(move || {
        interrupt.store(true, std::sync::atomic::Ordering::SeqCst);
    })
    .context("failed to install Ctrl-C handler")?;

    info!(count = manager.task_count(), "running tasks");
    manager.run()
}

// smelter: third-party dependency build orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `list` command: print matching tasks and aliases.

use crate::cli::ListArgs;
use crate::config::Config;
use crate::error::Result;
use crate::task::registry::TaskRegistry;
use crate::task::{Taskable, default_tasks};

/// Runs the `list` command.
///
/// # Errors
///
/// Returns an error when a pattern matches no task.
pub fn run_list_command(args: &ListArgs, config: &Config) -> Result<()> {
    let mut registry = TaskRegistry::new(config.aliases.clone());
    registry.register_all(default_tasks().iter().map(|t| t.name().to_string()));

    for name in registry.resolve(&args.patterns)? {
        println!("{name}");
    }

    for (alias, targets) in &config.aliases {
        println!("{alias} (alias for {})", targets.join(", "));
    }

    Ok(())
}

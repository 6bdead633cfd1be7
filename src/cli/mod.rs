// smelter: third-party dependency build orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! smelter [global options] <command>
//! build [tasks...]   fetch + build, with clean flags
//! list [patterns...] show matching tasks
//! options            dump effective configuration
//! version
//! ```

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};


/// Fetches, builds, and installs third-party dependencies.
///
/// Invoking `smelter -d some/prefix build` builds everything. Use
/// `smelter build <task>...` for specific tasks; globs like `b*` are
/// supported.
#[derive(Debug, Parser)]
#[command(name = "smelter", version, about = "Third-party dependency build orchestrator")]
pub struct Cli {
    /// Global options shared by all commands
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Command to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Options shared by all commands.
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalOptions {
    /// Additional configuration files, loaded in order after smelter.toml.
    #[arg(long = "ini", value_name = "FILE", global = true)]
    pub inis: Vec<PathBuf>,

    /// Build prefix; cache, build, and install trees live under it.
    #[arg(short = 'd', long, value_name = "PATH", global = true)]
    pub prefix: Option<PathBuf>,

    /// Log commands without spawning anything.
    #[arg(long, global = true)]
    pub dry: bool,

    /// Show full tool output and keep verbose-only arguments.
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Console log level (0-6).
    #[arg(short = 'l', long, value_name = "LEVEL", global = true)]
    pub log_level: Option<u8>,

    /// Log file path; omit for console-only logging.
    #[arg(long, value_name = "FILE", global = true)]
    pub log_file: Option<PathBuf>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shows the version.
    Version,

    /// Lists all options and their values from the configuration.
    Options,

    /// Builds tasks.
    Build(BuildArgs),

    /// Lists available tasks.
    List(ListArgs),
}

/// Arguments for the `build` command.
#[derive(Debug, Clone, Default, Args)]
pub struct BuildArgs {
    /// Re-downloads archives, see --reextract.
    #[arg(short = 'g', long, action = ArgAction::SetTrue)]
    pub redownload: bool,

    /// Deletes source directories and re-extracts archives.
    #[arg(short = 'e', long, action = ArgAction::SetTrue)]
    pub reextract: bool,

    /// Reconfigures the task by deleting the cmake build tree.
    #[arg(short = 'c', long, action = ArgAction::SetTrue)]
    pub reconfigure: bool,

    /// Cleans build artifacts without reconfiguring.
    #[arg(short = 'b', long, action = ArgAction::SetTrue)]
    pub rebuild: bool,

    /// Implies --redownload --reextract --reconfigure --rebuild.
    #[arg(short = 'n', long = "new", action = ArgAction::SetTrue)]
    pub clean_all: bool,

    /// Skips the fetch phase.
    #[arg(long = "no-fetch")]
    pub no_fetch: bool,

    /// Skips the build phase.
    #[arg(long = "no-build")]
    pub no_build: bool,

    /// Tasks to run. Globs like `b*` and aliases are supported; empty
    /// selects all tasks.
    #[arg(value_name = "TASK")]
    pub tasks: Vec<String>,
}

/// Arguments for the `list` command.
#[derive(Debug, Clone, Default, Args)]
pub struct ListArgs {
    /// Patterns to filter tasks; empty lists everything.
    #[arg(value_name = "PATTERN")]
    pub patterns: Vec<String>,
}

/// Parses the command line.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

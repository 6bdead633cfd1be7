// smelter: third-party dependency build orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> Logging --> Command Dispatch
//!   Build | List | Options | Version
//! ```

use std::process::ExitCode;

use smelter::cli::{self, Command, GlobalOptions};
use smelter::cmd::build::run_build_command;
use smelter::cmd::list::run_list_command;
use smelter::config::Config;
use smelter::config::loader::ConfigLoader;
use smelter::logging::{LogConfig, LogLevel, init_logging};

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

fn main() -> ExitCode {
    let cli = cli::parse();

    let log_config = build_log_config(&cli.global);
    let _log_guard = match init_logging(&log_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            return ExitCode::FAILURE;
        }
    };

    dispatch_command(&cli)
}

fn build_log_config(global: &GlobalOptions) -> LogConfig {
    let console_level = global
        .log_level
        .and_then(LogLevel::from_u8)
        .unwrap_or(LogLevel::INFO);

    LogConfig::new()
        .with_console_level(console_level)
        .with_log_file(global.log_file.as_ref().map(|p| p.display().to_string()))
}

fn dispatch_command(cli: &cli::Cli) -> ExitCode {
    let result = match &cli.command {
        Some(Command::Version) => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Some(Command::Options) => load_config(&cli.global).map(|config| {
            for line in config.format_options() {
                println!("{line}");
            }
        }),
        Some(Command::Build(args)) => {
            load_config(&cli.global).and_then(|config| run_build_command(args, &config, config.global.dry))
        }
        Some(Command::List(args)) => {
            load_config(&cli.global).and_then(|config| run_list_command(args, &config))
        }
        None => {
            eprintln!("No command specified. Use --help for usage information.");
            Err(anyhow::anyhow!("No command specified"))
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn build_config_loader(global: &GlobalOptions) -> smelter::error::Result<ConfigLoader> {
    let mut loader = ConfigLoader::new().add_toml_file_optional("smelter.toml");
    for ini_path in &global.inis {
        loader = loader.add_toml_file(ini_path);
    }

    if let Some(prefix) = &global.prefix {
        loader = loader.set("paths.prefix", prefix.display().to_string())?;
    }
    if global.dry {
        loader = loader.set("global.dry", true)?;
    }
    if global.verbose {
        loader = loader.set("global.verbose", true)?;
    }

    Ok(loader)
}

fn load_config(global: &GlobalOptions) -> smelter::error::Result<Config> {
    build_config_loader(global)?.build()
}

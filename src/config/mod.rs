// smelter: third-party dependency build orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults
//! 2. smelter.toml (cwd)
//! 3. --ini files
//! 4. SMELTER_* env vars (opt-in)
//! 5. CLI overrides
//! ```
//!
//! # Layout
//!
//! ```text
//! [global]   dry, verbose, redownload, reextract, log levels
//! [paths]    prefix -> downloads/ build/ install/
//! [tools]    sevenz, cmake, msbuild
//! [versions] task name -> version tag
//! [aliases]  name -> [task patterns]
//! ```

pub mod loader;
pub mod paths;
pub mod types;


use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::Result;

use loader::ConfigLoader;
use paths::PathsConfig;
use types::{Aliases, GlobalConfig, ToolsConfig, VersionsConfig};

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Global options.
    pub global: GlobalConfig,
    /// Paths configuration.
    pub paths: PathsConfig,
    /// Tool paths.
    pub tools: ToolsConfig,
    /// Version registry: task name -> version tag.
    pub versions: VersionsConfig,
    /// Task aliases.
    pub aliases: Aliases,
}

impl Config {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use smelter::config::Config;
    ///
    /// let config = Config::builder()
    ///     .add_toml_file_optional("smelter.toml")
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load configuration from a single TOML file (simple API).
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid TOML, or
    /// does not match the `Config` structure.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::builder().add_toml_file(path).build()
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML or does not match the
    /// `Config` structure.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// Resolve all paths and validate configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if path resolution fails.
    pub fn resolve_and_validate(&mut self) -> Result<()> {
        if self.paths.prefix.is_some() {
            self.paths.resolve()?;
        }
        Ok(())
    }

    /// Format configuration options for display.
    ///
    /// Output is deterministically ordered using `BTreeMap`.
    #[must_use]
    pub fn format_options(&self) -> Vec<String> {
        let mut options = BTreeMap::new();

        options.insert("global.dry".to_string(), self.global.dry.to_string());
        options.insert(
            "global.verbose".to_string(),
            self.global.verbose.to_string(),
        );
        options.insert(
            "global.redownload".to_string(),
            self.global.redownload.to_string(),
        );
        options.insert(
            "global.reextract".to_string(),
            self.global.reextract.to_string(),
        );
        options.insert(
            "global.output_log_level".to_string(),
            self.global.output_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.file_log_level".to_string(),
            self.global.file_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.log_file".to_string(),
            self.global.log_file.display().to_string(),
        );

        options.insert(
            "tools.sevenz".to_string(),
            self.tools.sevenz.display().to_string(),
        );
        options.insert(
            "tools.cmake".to_string(),
            self.tools.cmake.display().to_string(),
        );
        options.insert(
            "tools.msbuild".to_string(),
            self.tools.msbuild.display().to_string(),
        );

        for (name, version) in self.versions.iter() {
            options.insert(format!("versions.{name}"), version.clone());
        }

        let fmt = |p: &Option<std::path::PathBuf>| {
            p.as_ref()
                .map_or_else(String::new, |p| p.display().to_string())
        };
        options.insert("paths.prefix".to_string(), fmt(&self.paths.prefix));
        options.insert("paths.cache".to_string(), fmt(&self.paths.cache));
        options.insert("paths.build".to_string(), fmt(&self.paths.build));
        options.insert("paths.install".to_string(), fmt(&self.paths.install));

        let max_key_len = options.keys().map(String::len).max().unwrap_or(0);

        options
            .into_iter()
            .map(|(key, value)| format!("{key:<max_key_len$} = {value}"))
            .collect()
    }
}

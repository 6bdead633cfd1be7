// smelter: third-party dependency build orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration types.
//!
//! ```text
//! Config: GlobalConfig, PathsConfig, ToolsConfig, VersionsConfig
//! Aliases: task name -> [task list]
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::error::ConfigError;
use crate::logging::LogLevel;

/// Global configuration options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Log commands without spawning anything.
    pub dry: bool,
    /// Show full tool output and keep verbose-only arguments.
    pub verbose: bool,
    /// Re-download archives even if they already exist.
    pub redownload: bool,
    /// Re-extract archives even if the target directory exists.
    pub reextract: bool,
    /// Log level for stdout output (0-6).
    pub output_log_level: LogLevel,
    /// Log level for file output (0-6).
    pub file_log_level: LogLevel,
    /// Path to log file.
    pub log_file: PathBuf,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            dry: false,
            verbose: false,
            redownload: false,
            reextract: false,
            output_log_level: LogLevel::INFO,
            file_log_level: LogLevel::TRACE,
            log_file: PathBuf::from("smelter.log"),
        }
    }
}

/// Tool binary paths. Empty paths fall back to PATH discovery.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolsConfig {
    /// Path to the 7z executable.
    pub sevenz: PathBuf,
    /// Path to the cmake executable.
    pub cmake: PathBuf,
    /// Path to the msbuild executable.
    pub msbuild: PathBuf,
}

/// Task aliases mapping alias names to task patterns.
pub type Aliases = BTreeMap<String, Vec<String>>;

/// Version registry: task name -> version tag.
///
/// `source_path()` derivations depend on this registry only, never on the
/// filesystem, so versions must be known up front.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionsConfig(BTreeMap<String, String>);

impl Default for VersionsConfig {
    fn default() -> Self {
        let mut versions = BTreeMap::new();
        versions.insert("binary_io".to_string(), "2.0.6".to_string());
        versions.insert("bsa".to_string(), "4.1.0".to_string());
        versions.insert("directxtex".to_string(), "jun2024".to_string());
        versions.insert("mmio".to_string(), "1.0.0".to_string());
        Self(versions)
    }
}

impl VersionsConfig {
    /// Creates an empty registry.
    #[must_use]
    pub const fn empty() -> Self {
        Self(BTreeMap::new())
    }

    /// Looks up the version for a task name.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::MissingKey` if the task has no registered
    /// version.
    pub fn get(&self, name: &str) -> std::result::Result<&str, ConfigError> {
        self.0
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| ConfigError::MissingKey {
                section: "versions".to_string(),
                key: name.to_string(),
            })
    }

    /// Sets the version for a task name.
    pub fn set(&mut self, name: impl Into<String>, version: impl Into<String>) {
        self.0.insert(name.into(), version.into());
    }

    /// Iterates over all registered versions.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.0.iter()
    }
}

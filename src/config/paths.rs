// smelter: third-party dependency build orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Path configuration.
//!
//! ```text
//! prefix/
//!   downloads/   (cache)
//!   build/       (per-task source + build trees)
//!   install/     (final artifacts)
//! ```
//!
//! All paths are optional and resolved from `prefix` if not set.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};

/// Build and installation paths configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    /// Main build prefix (all other paths relative to this).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<PathBuf>,
    /// Download cache directory (default: prefix/downloads).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache: Option<PathBuf>,
    /// Build directory (default: prefix/build).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build: Option<PathBuf>,
    /// Installation root (default: prefix/install).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub install: Option<PathBuf>,
}

impl PathsConfig {
    /// Resolve all relative paths against prefix and fill in defaults.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::MissingKey` if the `prefix` path is not set.
    pub fn resolve(&mut self) -> Result<()> {
        let prefix = self.prefix.clone().ok_or_else(|| ConfigError::MissingKey {
            section: "paths".to_string(),
            key: "prefix".to_string(),
        })?;

        let resolve = |path: &mut Option<PathBuf>, parent: &Path, default: &str| match path {
            Some(p) if p.is_relative() => {
                *path = Some(parent.join(p.clone()));
            }
            None => {
                *path = Some(parent.join(default));
            }
            _ => {}
        };

        resolve(&mut self.cache, &prefix, "downloads");
        resolve(&mut self.build, &prefix, "build");
        resolve(&mut self.install, &prefix, "install");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::PathsConfig;
    use std::path::PathBuf;

    #[test]
    fn test_resolve_requires_prefix() {
        let mut paths = PathsConfig::default();
        assert!(paths.resolve().is_err());
    }

    #[test]
    fn test_resolve_fills_defaults() {
        let mut paths = PathsConfig {
            prefix: Some(PathBuf::from("/work")),
            ..PathsConfig::default()
        };
        paths.resolve().unwrap();

        assert_eq!(paths.cache, Some(PathBuf::from("/work/downloads")));
        assert_eq!(paths.build, Some(PathBuf::from("/work/build")));
        assert_eq!(paths.install, Some(PathBuf::from("/work/install")));
    }

    #[test]
    fn test_resolve_keeps_absolute_overrides() {
        let mut paths = PathsConfig {
            prefix: Some(PathBuf::from("/work")),
            build: Some(PathBuf::from("/elsewhere/build")),
            ..PathsConfig::default()
        };
        paths.resolve().unwrap();

        assert_eq!(paths.build, Some(PathBuf::from("/elsewhere/build")));
    }

    #[test]
    fn test_resolve_joins_relative_overrides() {
        let mut paths = PathsConfig {
            prefix: Some(PathBuf::from("/work")),
            cache: Some(PathBuf::from("dl")),
            ..PathsConfig::default()
        };
        paths.resolve().unwrap();

        assert_eq!(paths.cache, Some(PathBuf::from("/work/dl")));
    }
}

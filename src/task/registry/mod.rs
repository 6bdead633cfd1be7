// smelter: third-party dependency build orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Task registry for resolving task names, aliases, and glob patterns.
//!
//! ```text
//! input ["deps", "b*"]
//!   resolve_aliases: "deps" --> [binary_io, directxtex, ...]
//!   match_pattern:   "b*"   --> [binary_io, bsa]
//!   dedupe + preserve order
//! ```

use std::collections::BTreeSet;

use anyhow::Context;
use wax::{Glob, Pattern};

use crate::config::types::Aliases;
use crate::error::{Result, TaskError};

/// Registry for looking up tasks by name or pattern.
pub struct TaskRegistry {
    task_names: BTreeSet<String>,
    aliases: Aliases,
}

impl TaskRegistry {
    /// Creates a new `TaskRegistry`.
    #[must_use]
    pub const fn new(aliases: Aliases) -> Self {
        Self {
            task_names: BTreeSet::new(),
            aliases,
        }
    }

    /// Registers a task name.
    pub fn register(&mut self, name: impl Into<String>) {
        self.task_names.insert(name.into());
    }

    /// Registers multiple task names.
    pub fn register_all(&mut self, names: impl IntoIterator<Item = impl Into<String>>) {
        for name in names {
            self.task_names.insert(name.into());
        }
    }

    /// Returns all registered task names.
    #[must_use]
    pub const fn all_tasks(&self) -> &BTreeSet<String> {
        &self.task_names
    }

    /// Expands aliases in a list of task patterns, recursively.
    #[must_use]
    pub fn resolve_aliases(&self, patterns: &[String]) -> Vec<String> {
        let mut result = Vec::new();

        for pattern in patterns {
            if let Some(targets) = self.aliases.get(pattern) {
                result.extend(self.resolve_aliases(targets));
            } else {
                result.push(pattern.clone());
            }
        }

        result
    }

    /// Matches a glob pattern against registered task names.
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern is not a valid glob.
    pub fn match_pattern(&self, pattern: &str) -> Result<Vec<String>> {
        if self.task_names.contains(pattern) {
            return Ok(vec![pattern.to_string()]);
        }

        let glob =
            Glob::new(pattern).with_context(|| format!("invalid glob pattern: {pattern}"))?;

        Ok(self
            .task_names
            .iter()
            .filter(|name| glob.is_match(name.as_str()))
            .cloned()
            .collect())
    }

    /// Resolves task specifications to concrete task names: aliases are
    /// expanded, globs matched, duplicates removed, order preserved. An
    /// empty input selects every registered task.
    ///
    /// # Errors
    ///
    /// Returns a `TaskError::NotFound` when a pattern matches nothing.
    pub fn resolve(&self, patterns: &[String]) -> Result<Vec<String>> {
        if patterns.is_empty() {
            return Ok(self.task_names.iter().cloned().collect());
        }

        let mut seen = BTreeSet::new();
        let mut result = Vec::new();

        for pattern in self.resolve_aliases(patterns) {
            let matched = self.match_pattern(&pattern)?;
            if matched.is_empty() {
                return Err(TaskError::NotFound(pattern).into());
            }

            for name in matched {
                if seen.insert(name.clone()) {
                    result.push(name);
                }
            }
        }

        Ok(result)
    }
}

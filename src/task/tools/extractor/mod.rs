// smelter: third-party dependency build orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Archive extraction via 7z.
//!
//! ```text
//! .zip | .7z | .tar --> 7z x -aoa -o<dir>
//! .tar.gz           --> 7z x -so | 7z x -si -ttar  (piped)
//!
//! Interruption marker: resumes an aborted extraction
//! Duplicate top-level dir: contents moved up one level
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::{debug, trace};

use super::{Tool, ToolContext};
use crate::core::process::{ArgFlags, Process};
use crate::error::Result;
use crate::utility::fs;

/// Marker file left in the output directory while an extraction runs.
/// Its presence on a later run means the previous one was aborted.
const INTERRUPT_MARKER: &str = ".smelter-extract";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtractorOperation {
    #[default]
    Extract,
    Clean,
}

/// Extracts an archive into an output directory using 7z.
#[derive(Debug, Clone, Default)]
pub struct ExtractorTool {
    archive: Option<PathBuf>,
    output: Option<PathBuf>,
    force: bool,
    operation: ExtractorOperation,
}

impl ExtractorTool {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.archive = Some(path.into());
        self
    }

    #[must_use]
    pub fn output(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output = Some(dir.into());
        self
    }

    /// Forces a re-extract even when the output directory exists.
    #[must_use]
    pub const fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    #[must_use]
    pub const fn extract_op(mut self) -> Self {
        self.operation = ExtractorOperation::Extract;
        self
    }

    #[must_use]
    pub const fn clean_op(mut self) -> Self {
        self.operation = ExtractorOperation::Clean;
        self
    }

    fn archive_required(&self) -> Result<&Path> {
        self.archive
            .as_deref()
            .context("extractor: archive file is required")
    }

    fn output_required(&self) -> Result<&Path> {
        self.output
            .as_deref()
            .context("extractor: output directory is required")
    }

    fn is_tar_gz(archive: &Path) -> bool {
        let name = archive
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        name.ends_with(".tar.gz") || name.ends_with(".tgz")
    }

    fn do_extract(&self, ctx: &ToolContext) -> Result<()> {
        let archive = self.archive_required()?;
        let output = self.output_required()?;
        let marker = output.join(INTERRUPT_MARKER);

        if marker.exists() {
            debug!(
                output = %output.display(),
                "previous extraction was interrupted; resuming"
            );
        } else if output.exists() {
            let force = self.force || ctx.config().global.reextract;
            if force {
                debug!(output = %output.display(), "deleting for re-extraction");
                if !ctx.is_dry_run() {
                    fs::delete_directory(output)?;
                }
            } else {
                debug!(output = %output.display(), "directory already exists, bypassing");
                return Ok(());
            }
        }

        debug!(
            archive = %archive.display(),
            output = %output.display(),
            "extracting"
        );

        if ctx.is_dry_run() {
            return Ok(());
        }

        fs::create_directories(output)?;
        std::fs::write(&marker, b"")
            .with_context(|| format!("failed to create {}", marker.display()))?;

        let sevenz = ctx.tool_binary(&ctx.config().tools.sevenz, "7z")?;

        let mut process = if Self::is_tar_gz(archive) {
            // tar in gz must be piped, 7z can't do it in one step
            trace!("this is a tar.gz, piping");

            let untar = ctx
                .process()
                .binary(&sevenz)
                .arg("x") // extract
                .arg("-so") // output to stdout
                .arg(archive);

            let ungz = ctx
                .process()
                .binary(&sevenz)
                .arg("x") // extract
                .arg("-aoa") // overwrite all without prompt
                .arg("-si") // read from stdin
                .arg("-ttar") // type is tar
                .arg_pair_flagged("-o", output, ArgFlags::NOSPACE);

            Process::pipe(untar, &ungz).name("extract")
        } else {
            ctx.process()
                .name("extract")
                .binary(&sevenz)
                .arg("x") // extract
                .arg("-aoa") // overwrite all without prompt
                .arg_flagged("-bd", ArgFlags::QUIET) // no progress indicator
                .arg_flagged("-bb0", ArgFlags::QUIET) // disable log
                .arg_pair_flagged("-o", output, ArgFlags::NOSPACE)
                .arg(archive)
        };

        process.execute()?;

        let interrupted = ctx.is_interrupted();
        if !interrupted {
            Self::flatten_duplicate_directory(output, &marker)?;
            fs::delete_file(&marker)?;
        }

        Ok(())
    }

    /// Some archives carry a top-level directory named like the output
    /// directory, others have their files directly at the root. When the
    /// duplicate exists, its contents are moved up one level.
    fn flatten_duplicate_directory(output: &Path, marker: &Path) -> Result<()> {
        let Some(dir_name) = output.file_name() else {
            return Ok(());
        };

        let duplicate = output.join(dir_name);
        if !duplicate.is_dir() {
            trace!("no duplicate subdir, leaving as-is");
            return Ok(());
        }

        trace!(
            subdir = %duplicate.display(),
            "found subdir named like the output dir; moving everything up one"
        );

        // stray files next to the duplicate are useless wrappers
        // (pax headers and the like); other directories are unexpected
        for entry in std::fs::read_dir(output)
            .with_context(|| format!("failed to list {}", output.display()))?
        {
            let path = entry?.path();

            if path == duplicate || path == marker {
                continue;
            }

            if path.is_dir() {
                anyhow::bail!(
                    "{} is yet another directory next to {}",
                    path.display(),
                    duplicate.display()
                );
            }

            trace!(file = %path.display(), "assuming stray file is useless, deleting");
            fs::delete_file(&path)?;
        }

        // temp name in case the duplicate contains yet another directory
        // with the same name
        let temp_dir = output.join(format!("_smelter_{}", dir_name.to_string_lossy()));
        fs::delete_directory(&temp_dir)?;
        fs::rename(&duplicate, &temp_dir)?;

        for entry in std::fs::read_dir(&temp_dir)
            .with_context(|| format!("failed to list {}", temp_dir.display()))?
        {
            fs::move_to_directory(&entry?.path(), output)?;
        }

        fs::delete_directory(&temp_dir)?;
        Ok(())
    }

    fn do_clean(&self, ctx: &ToolContext) -> Result<()> {
        let output = self.output_required()?;

        if ctx.is_dry_run() {
            debug!(output = %output.display(), "[dry-run] would delete");
            return Ok(());
        }

        fs::delete_directory(output)?;
        Ok(())
    }
}

impl Tool for ExtractorTool {
    type Output = ();

    fn name(&self) -> &'static str {
        "extract"
    }

    fn run(&self, ctx: &ToolContext) -> Result<()> {
        match self.operation {
            ExtractorOperation::Extract => self.do_extract(ctx),
            ExtractorOperation::Clean => self.do_clean(ctx),
        }
    }
}

#[cfg(test)]
mod tests;

// smelter: third-party dependency build orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Downloader tool: URL -> cached archive.
//!
//! ```text
//! URLs --> HTTP GET --> cache/<file>
//! Features: fallback URLs, cache bypass, force re-download, clean op
//! Uses: crate::net::Downloader + ProgressDisplay::Bar
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tracing::{debug, info};

use super::{Tool, ToolContext};
use crate::error::Result;
use crate::net::{Downloader, ProgressDisplay};
use crate::utility::fs;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DownloaderOperation {
    #[default]
    Download,
    Clean,
}

/// Downloads an archive into the cache directory, or deletes it again in
/// clean mode. Returns the cache file path either way.
#[derive(Debug, Clone, Default)]
pub struct DownloaderTool {
    urls: Vec<String>,
    file: Option<PathBuf>,
    force: bool,
    operation: DownloaderOperation,
}

impl DownloaderTool {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a URL to download from. Multiple URLs are tried in order.
    #[must_use]
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.urls.push(url.into());
        self
    }

    /// Sets the cache file explicitly. When unset, the name is derived
    /// from the first URL's last path segment.
    #[must_use]
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    /// Forces a re-download even when the cache file exists.
    #[must_use]
    pub const fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    #[must_use]
    pub const fn download_op(mut self) -> Self {
        self.operation = DownloaderOperation::Download;
        self
    }

    #[must_use]
    pub const fn clean_op(mut self) -> Self {
        self.operation = DownloaderOperation::Clean;
        self
    }

    /// Resolves the cache file this tool reads or writes.
    ///
    /// # Errors
    ///
    /// Returns an error when neither an explicit file nor a URL with a
    /// usable file name is available, or the cache path is unset.
    pub fn cache_file(&self, ctx: &ToolContext) -> Result<PathBuf> {
        if let Some(file) = &self.file {
            return Ok(file.clone());
        }

        let cache = ctx
            .config()
            .paths
            .cache
            .as_ref()
            .context("paths.cache not configured")?;

        let url = self.urls.first().context("no URLs provided")?;
        let name = url
            .rsplit('/')
            .next()
            .filter(|s| !s.is_empty())
            .with_context(|| format!("cannot derive a file name from '{url}'"))?;

        Ok(cache.join(name))
    }

    fn do_download(&self, ctx: &ToolContext) -> Result<PathBuf> {
        let file = self.cache_file(ctx)?;

        if ctx.is_interrupted() {
            anyhow::bail!("download interrupted");
        }

        let force = self.force || ctx.config().global.redownload;
        if file.exists() && !force {
            debug!(file = %file.display(), "already downloaded, bypassing");
            return Ok(file);
        }

        if self.urls.is_empty() {
            anyhow::bail!("no URLs provided for download");
        }

        if ctx.is_dry_run() {
            info!(
                urls = ?self.urls,
                file = %file.display(),
                "[dry-run] would download"
            );
            return Ok(file);
        }

        let mut downloader = Downloader::new()
            .file(&file)
            .progress(ProgressDisplay::Bar)
            .interrupt_flag(Arc::clone(ctx.interrupt()));
        for url in &self.urls {
            downloader = downloader.url(url);
        }

        downloader
            .download()
            .with_context(|| format!("failed to download to {}", file.display()))?;

        Ok(file)
    }

    fn do_clean(&self, ctx: &ToolContext) -> Result<PathBuf> {
        let file = self.cache_file(ctx)?;

        if ctx.is_dry_run() {
            info!(file = %file.display(), "[dry-run] would delete cached file");
            return Ok(file);
        }

        fs::delete_file(&file)?;
        Ok(file)
    }
}

impl Tool for DownloaderTool {
    type Output = PathBuf;

    fn name(&self) -> &'static str {
        "downloader"
    }

    fn run(&self, ctx: &ToolContext) -> Result<PathBuf> {
        match self.operation {
            DownloaderOperation::Download => self.do_download(ctx),
            DownloaderOperation::Clean => self.do_clean(ctx),
        }
    }
}

#[cfg(test)]
mod tests;

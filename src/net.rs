// smelter: third-party dependency build orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Network module: blocking HTTP downloads.
//!
//! ```text
//! Downloader::new()
//!   .url() .file() .progress() .interrupt_flag()
//!        |
//!        v
//!   download()
//!        |
//!        v
//!   Progress display
//!     Bar     [=====>     ] 50MB/100MB
//!     Silent  (none)
//!
//! Global client: OnceLock, connection pool, keep-alive
//! Interruption:  AtomicBool -> cleanup partial -> Interrupted
//! ```

use std::io::{Read, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use reqwest::blocking::Client;
use tracing::{debug, info};

use crate::error::NetworkError;

type NetResult<T> = std::result::Result<T, NetworkError>;

/// RAII guard that removes a partial download file on drop unless
/// explicitly kept, so error paths never leave half-written archives in
/// the cache.
struct PartialFileGuard {
    path: PathBuf,
    keep: bool,
}

impl PartialFileGuard {
    const fn new(path: PathBuf) -> Self {
        Self { path, keep: false }
    }

    /// Mark the download as complete - file will NOT be deleted on drop.
    const fn keep(&mut self) {
        self.keep = true;
    }
}

impl Drop for PartialFileGuard {
    fn drop(&mut self) {
        if !self.keep {
            let _ = std::fs::remove_file(&self.path);
        }
    }
}

/// Global HTTP client - initialized once, reused across all downloads.
/// Falls back to a basic client if custom configuration fails.
fn global_client() -> &'static Client {
    static CLIENT: OnceLock<Client> = OnceLock::new();
    CLIENT.get_or_init(|| {
        Client::builder()
            .user_agent(format!("smelter/{}", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default()
    })
}

/// How download progress is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProgressDisplay {
    /// A progress bar with byte counts.
    #[default]
    Bar,
    /// No progress output.
    Silent,
}

/// Blocking file downloader.
#[derive(Debug, Clone, Default)]
pub struct Downloader {
    urls: Vec<String>,
    file: Option<PathBuf>,
    progress: ProgressDisplay,
    interrupt: Option<Arc<AtomicBool>>,
}

impl Downloader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a URL; multiple URLs are tried in order.
    #[must_use]
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.urls.push(url.into());
        self
    }

    /// Sets the output file path.
    #[must_use]
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    /// Sets the progress display mode.
    #[must_use]
    pub const fn progress(mut self, progress: ProgressDisplay) -> Self {
        self.progress = progress;
        self
    }

    /// Adopts a shared interrupt flag checked between chunks.
    #[must_use]
    pub fn interrupt_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.interrupt = Some(flag);
        self
    }

    fn is_interrupted(&self) -> bool {
        self.interrupt
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }

    /// Downloads the first reachable URL to the output file.
    ///
    /// # Errors
    ///
    /// Returns the last URL's error when every URL fails, or
    /// `NetworkError::Interrupted` when the interrupt flag is raised
    /// mid-transfer.
    pub fn download(&self) -> NetResult<()> {
        let file = self
            .file
            .clone()
            .ok_or_else(|| NetworkError::DownloadFailed {
                url: String::new(),
                message: "no output file specified".to_string(),
            })?;

        if self.urls.is_empty() {
            return Err(NetworkError::DownloadFailed {
                url: String::new(),
                message: "no URLs provided".to_string(),
            });
        }

        if let Some(parent) = file.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut last_error = None;
        for url in &self.urls {
            if self.is_interrupted() {
                return Err(NetworkError::Interrupted);
            }

            debug!(url = %url, "attempting download");
            match self.download_one(url, &file) {
                Ok(()) => {
                    info!(url = %url, file = %file.display(), "download complete");
                    return Ok(());
                }
                Err(NetworkError::Interrupted) => return Err(NetworkError::Interrupted),
                Err(e) => {
                    debug!(url = %url, error = %e, "download attempt failed, trying next URL");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or(NetworkError::Interrupted))
    }

    fn download_one(&self, url: &str, file: &PathBuf) -> NetResult<()> {
        let response = global_client().get(url).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(NetworkError::HttpError {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let total = response.content_length();
        let bar = match (self.progress, total) {
            (ProgressDisplay::Bar, Some(len)) => {
                let bar = ProgressBar::new(len);
                bar.set_style(
                    ProgressStyle::with_template(
                        "[{bar:40}] {bytes}/{total_bytes} ({bytes_per_sec})",
                    )
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
                );
                Some(bar)
            }
            (ProgressDisplay::Bar, None) => Some(ProgressBar::new_spinner()),
            (ProgressDisplay::Silent, _) => None,
        };

        let mut guard = PartialFileGuard::new(file.clone());
        let mut output = std::fs::File::create(file)?;
        let mut reader = response;
        let mut buf = [0u8; 64 * 1024];

        loop {
            if self.is_interrupted() {
                return Err(NetworkError::Interrupted);
            }

            let n = reader.read(&mut buf)?;
            if n == 0 {
                break;
            }

            output.write_all(&buf[..n])?;
            if let Some(bar) = &bar {
                bar.inc(n as u64);
            }
        }

        output.flush()?;
        if let Some(bar) = &bar {
            bar.finish_and_clear();
        }

        guard.keep();
        Ok(())
    }
}

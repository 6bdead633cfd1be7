// smelter: third-party dependency build orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Filesystem operations with tracing and error context.
//!
//! ```text
//! create_directories / delete_directory / delete_file
//! rename / move_to_directory
//! All deletes tolerate absent targets.
//! ```

use std::path::Path;

use tracing::trace;

use crate::error::FsError;

type FsResult<T> = std::result::Result<T, FsError>;

fn io_error(path: &Path, source: std::io::Error) -> FsError {
    FsError::IoError {
        path: path.display().to_string(),
        source,
    }
}

/// Recursively creates a directory and all of its parents.
pub fn create_directories(path: &Path) -> FsResult<()> {
    trace!(path = %path.display(), "mkdir -p");
    std::fs::create_dir_all(path).map_err(|e| io_error(path, e))
}

/// Recursively deletes a directory. A missing directory is not an error.
pub fn delete_directory(path: &Path) -> FsResult<()> {
    if !path.exists() {
        trace!(path = %path.display(), "directory absent, nothing to delete");
        return Ok(());
    }

    trace!(path = %path.display(), "deleting directory");
    std::fs::remove_dir_all(path).map_err(|e| io_error(path, e))
}

/// Deletes a file. A missing file is not an error.
pub fn delete_file(path: &Path) -> FsResult<()> {
    if !path.exists() {
        trace!(path = %path.display(), "file absent, nothing to delete");
        return Ok(());
    }

    trace!(path = %path.display(), "deleting file");
    std::fs::remove_file(path).map_err(|e| io_error(path, e))
}

/// Renames `from` to `to`.
pub fn rename(from: &Path, to: &Path) -> FsResult<()> {
    trace!(from = %from.display(), to = %to.display(), "rename");
    std::fs::rename(from, to).map_err(|e| io_error(from, e))
}

/// Moves a file or directory into `dir`, keeping its file name.
pub fn move_to_directory(entry: &Path, dir: &Path) -> FsResult<()> {
    let name = entry
        .file_name()
        .ok_or_else(|| FsError::NotFound(entry.display().to_string()))?;
    rename(entry, &dir.join(name))
}

// smelter: third-party dependency build orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use super::DownloaderTool;
use crate::config::Config;
use crate::task::tools::{Tool, ToolContext};

fn context_with_cache(cache: PathBuf) -> ToolContext {
    let mut config = Config::default();
    config.paths.cache = Some(cache);
    ToolContext::new(Arc::new(config), Arc::new(AtomicBool::new(false)), false)
}

#[test]
fn test_cache_file_prefers_explicit_path() {
    let ctx = context_with_cache(PathBuf::from("/cache"));
    let tool = DownloaderTool::new()
        .url("https://example.com/a.zip")
        .file("/explicit/archive.zip");

    assert_eq!(
        tool.cache_file(&ctx).unwrap(),
        PathBuf::from("/explicit/archive.zip")
    );
}

#[test]
fn test_cache_file_derived_from_url() {
    let ctx = context_with_cache(PathBuf::from("/cache"));
    let tool = DownloaderTool::new()
        .url("https://github.com/org/repo/archive/refs/tags/2.0.6.zip");

    assert_eq!(
        tool.cache_file(&ctx).unwrap(),
        PathBuf::from("/cache/2.0.6.zip")
    );
}

#[test]
fn test_cache_file_requires_url_or_file() {
    let ctx = context_with_cache(PathBuf::from("/cache"));
    assert!(DownloaderTool::new().cache_file(&ctx).is_err());
}

#[test]
fn test_existing_file_bypasses_download() {
    let tmp = tempfile::tempdir().unwrap();
    let cached = tmp.path().join("a.zip");
    std::fs::write(&cached, b"cached bytes").unwrap();

    let ctx = context_with_cache(tmp.path().to_path_buf());
    let tool = DownloaderTool::new()
        .url("http://192.0.2.1/unreachable/a.zip")
        .file(&cached);

    // no network touched: the cached file short-circuits
    let path = tool.run(&ctx).unwrap();
    assert_eq!(path, cached);
    assert_eq!(std::fs::read(&cached).unwrap(), b"cached bytes");
}

#[test]
fn test_dry_run_skips_download() {
    let tmp = tempfile::tempdir().unwrap();
    let ctx = ToolContext::new(
        Arc::new(Config::default()),
        Arc::new(AtomicBool::new(false)),
        true,
    );

    let target = tmp.path().join("a.zip");
    let tool = DownloaderTool::new()
        .url("http://192.0.2.1/unreachable/a.zip")
        .file(&target);

    let path = tool.run(&ctx).unwrap();
    assert_eq!(path, target);
    assert!(!target.exists());
}

#[test]
fn test_clean_deletes_cached_file() {
    let tmp = tempfile::tempdir().unwrap();
    let cached = tmp.path().join("a.zip");
    std::fs::write(&cached, b"bytes").unwrap();

    let ctx = context_with_cache(tmp.path().to_path_buf());
    let tool = DownloaderTool::new().file(&cached).clean_op();

    tool.run(&ctx).unwrap();
    assert!(!cached.exists());
}

#[test]
fn test_clean_tolerates_missing_file() {
    let tmp = tempfile::tempdir().unwrap();
    let ctx = context_with_cache(tmp.path().to_path_buf());

    let tool = DownloaderTool::new()
        .file(tmp.path().join("never-downloaded.zip"))
        .clean_op();
    tool.run(&ctx).unwrap();
}

// smelter: third-party dependency build orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use super::{ExtractorTool, INTERRUPT_MARKER};
use crate::config::Config;
use crate::task::tools::{Tool, ToolContext};

fn context(dry: bool) -> ToolContext {
    ToolContext::new(Arc::new(Config::default()), Arc::new(AtomicBool::new(false)), dry)
}

#[test]
fn test_tar_gz_detection() {
    assert!(ExtractorTool::is_tar_gz(Path::new("openssl-1.1.1d.tar.gz")));
    assert!(ExtractorTool::is_tar_gz(Path::new("archive.TGZ")));
    assert!(!ExtractorTool::is_tar_gz(Path::new("source.zip")));
    assert!(!ExtractorTool::is_tar_gz(Path::new("plain.tar")));
}

#[test]
fn test_existing_output_bypasses_extraction() {
    let tmp = tempfile::tempdir().unwrap();
    let output = tmp.path().join("lib-1.0");
    std::fs::create_dir_all(output.join("keep")).unwrap();

    // no 7z configured; a bypass must not try to spawn anything
    let tool = ExtractorTool::new()
        .file(tmp.path().join("lib-1.0.zip"))
        .output(&output);

    tool.run(&context(false)).unwrap();
    assert!(output.join("keep").is_dir());
}

#[test]
fn test_dry_run_spawns_nothing() {
    let tmp = tempfile::tempdir().unwrap();
    let output = tmp.path().join("lib-1.0");

    let tool = ExtractorTool::new()
        .file(tmp.path().join("lib-1.0.zip"))
        .output(&output);

    tool.run(&context(true)).unwrap();
    assert!(!output.exists());
}

#[test]
fn test_clean_deletes_output_directory() {
    let tmp = tempfile::tempdir().unwrap();
    let output = tmp.path().join("lib-1.0");
    std::fs::create_dir_all(&output).unwrap();

    let tool = ExtractorTool::new().output(&output).clean_op();
    tool.run(&context(false)).unwrap();

    assert!(!output.exists());
}

#[test]
fn test_flatten_moves_duplicate_directory_up() {
    let tmp = tempfile::tempdir().unwrap();
    let output = tmp.path().join("lib-1.0");
    let duplicate = output.join("lib-1.0");
    std::fs::create_dir_all(duplicate.join("src")).unwrap();
    std::fs::write(duplicate.join("CMakeLists.txt"), b"project(lib)").unwrap();

    // stray wrapper file next to the duplicate, like a pax header
    std::fs::write(output.join("pax_global_header"), b"").unwrap();

    let marker = output.join(INTERRUPT_MARKER);
    std::fs::write(&marker, b"").unwrap();

    ExtractorTool::flatten_duplicate_directory(&output, &marker).unwrap();

    assert!(output.join("CMakeLists.txt").is_file());
    assert!(output.join("src").is_dir());
    assert!(!output.join("lib-1.0").exists());
    assert!(!output.join("pax_global_header").exists());
}

#[test]
fn test_flatten_leaves_flat_archives_alone() {
    let tmp = tempfile::tempdir().unwrap();
    let output = tmp.path().join("lib-1.0");
    std::fs::create_dir_all(output.join("src")).unwrap();
    std::fs::write(output.join("CMakeLists.txt"), b"").unwrap();

    let marker = output.join(INTERRUPT_MARKER);
    ExtractorTool::flatten_duplicate_directory(&output, &marker).unwrap();

    assert!(output.join("CMakeLists.txt").is_file());
    assert!(output.join("src").is_dir());
}

#[test]
fn test_flatten_rejects_unexpected_sibling_directory() {
    let tmp = tempfile::tempdir().unwrap();
    let output = tmp.path().join("lib-1.0");
    std::fs::create_dir_all(output.join("lib-1.0")).unwrap();
    std::fs::create_dir_all(output.join("unexpected")).unwrap();

    let marker = output.join(INTERRUPT_MARKER);
    let err = ExtractorTool::flatten_duplicate_directory(&output, &marker).unwrap_err();
    assert!(format!("{err}").contains("unexpected"));
}

// smelter: third-party dependency build orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use super::{BinaryIoTask, cache_file, solution_path, source_path, source_url};
use crate::config::Config;
use crate::task::{CleanFlags, TaskContext, Taskable};

fn config_with_prefix(prefix: &std::path::Path) -> Config {
    Config::parse(&format!(
        r#"
        [paths]
        prefix = "{}"
        "#,
        prefix.display().to_string().replace('\\', "/")
    ))
    .unwrap()
}

fn context(config: Config) -> TaskContext {
    TaskContext::new(Arc::new(config), Arc::new(AtomicBool::new(false)))
}

#[test]
fn test_source_url_format() {
    let mut config = Config::default();
    config.versions.set("binary_io", "2.0.6");

    let url = source_url(&config).unwrap();
    assert_eq!(
        url,
        "https://github.com/Ryan-rsm-McKenzie/binary_io/archive/refs/tags/2.0.6.zip"
    );
}

#[test]
fn test_source_path_derivation() {
    let mut config = Config::default();
    config.paths.build = Some(PathBuf::from("/work/build"));
    config.versions.set("binary_io", "2.0.6");

    assert_eq!(
        source_path(&config).unwrap(),
        PathBuf::from("/work/build/binary_io-2.0.6")
    );
}

#[test]
fn test_cache_file_carries_task_name() {
    let mut config = Config::default();
    config.paths.cache = Some(PathBuf::from("/work/downloads"));
    config.versions.set("binary_io", "2.0.6");

    assert_eq!(
        cache_file(&config).unwrap(),
        PathBuf::from("/work/downloads/binary_io-2.0.6.zip")
    );
}

#[test]
fn test_solution_path_under_vsbuild() {
    let mut config = Config::default();
    config.paths.build = Some(PathBuf::from("/work/build"));
    config.versions.set("binary_io", "2.0.6");

    assert_eq!(
        solution_path(&config).unwrap(),
        PathBuf::from("/work/build/binary_io-2.0.6/vsbuild/INSTALL.vcxproj")
    );
}

#[test]
fn test_task_name() {
    assert_eq!(BinaryIoTask::new().name(), "binary_io");
    assert!(!BinaryIoTask::new().prebuilt());
}

#[test]
fn test_clean_with_empty_flags_does_nothing() {
    let tmp = tempfile::tempdir().unwrap();
    let config = config_with_prefix(tmp.path());
    let src = source_path(&config).unwrap();
    std::fs::create_dir_all(&src).unwrap();

    BinaryIoTask::new()
        .do_clean(&context(config), CleanFlags::empty())
        .unwrap();

    assert!(src.exists());
}

#[test]
fn test_clean_reextract_deletes_source_and_stops() {
    let tmp = tempfile::tempdir().unwrap();
    let config = config_with_prefix(tmp.path());
    let src = source_path(&config).unwrap();
    std::fs::create_dir_all(&src).unwrap();

    // REBUILD is also set, but reextract must return early: no msbuild
    // exists here, so reaching the msbuild tool would fail
    BinaryIoTask::new()
        .do_clean(
            &context(config),
            CleanFlags::REEXTRACT | CleanFlags::REBUILD,
        )
        .unwrap();

    assert!(!src.exists());
}

#[test]
fn test_clean_redownload_deletes_cache_file() {
    let tmp = tempfile::tempdir().unwrap();
    let config = config_with_prefix(tmp.path());

    let cached = cache_file(&config).unwrap();
    std::fs::create_dir_all(cached.parent().unwrap()).unwrap();
    std::fs::write(&cached, b"zip bytes").unwrap();

    BinaryIoTask::new()
        .do_clean(&context(config), CleanFlags::REDOWNLOAD)
        .unwrap();

    assert!(!cached.exists());
}

#[test]
fn test_clean_reconfigure_deletes_build_tree() {
    let tmp = tempfile::tempdir().unwrap();
    let config = config_with_prefix(tmp.path());

    let build_tree = source_path(&config).unwrap().join("vsbuild");
    std::fs::create_dir_all(&build_tree).unwrap();

    BinaryIoTask::new()
        .do_clean(&context(config), CleanFlags::RECONFIGURE)
        .unwrap();

    assert!(!build_tree.exists());
}

// smelter: third-party dependency build orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use super::{BsaTask, cmake_tool, source_path, source_url};
use crate::config::Config;
use crate::task::Taskable;
use crate::task::tasks::{binary_io, directxtex, mmio};
use crate::task::tools::ToolContext;
use crate::task::tools::cmake::CmakeOperation;

fn config() -> Config {
    let mut config = Config::default();
    config.paths.build = Some(PathBuf::from("/work/build"));
    config.tools.cmake = PathBuf::from("cmake");
    config
}

#[test]
fn test_source_url_format() {
    let mut config = Config::default();
    config.versions.set("bsa", "4.1.0");

    assert_eq!(
        source_url(&config).unwrap(),
        "https://github.com/Ryan-rsm-McKenzie/bsa/archive/refs/tags/4.1.0.zip"
    );
}

#[test]
fn test_task_name() {
    assert_eq!(BsaTask::new().name(), "bsa");
}

#[test]
fn test_prefix_path_composed_from_dependencies() {
    let config = config();

    let tool = cmake_tool(&config, CmakeOperation::Generate).unwrap();
    let ctx = ToolContext::new(
        Arc::new(config.clone()),
        Arc::new(AtomicBool::new(false)),
        false,
    );
    let cmd = tool.generate_process(&ctx).unwrap().make_cmd();

    for dep_path in [
        binary_io::source_path(&config).unwrap(),
        directxtex::source_path(&config).unwrap(),
        mmio::source_path(&config).unwrap(),
    ] {
        let expected = dep_path.join("build").display().to_string();
        assert!(cmd.contains(&expected), "missing {expected} in: {cmd}");
    }
}

#[test]
fn test_dependency_paths_need_no_filesystem() {
    // bsa's tool wiring resolves before any dependency has been fetched
    let config = config();
    assert!(!source_path(&config).unwrap().exists());
    assert!(cmake_tool(&config, CmakeOperation::Generate).is_ok());
}

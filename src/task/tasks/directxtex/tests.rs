// smelter: third-party dependency build orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use super::{DirectXTexTask, cmake_tool, source_path, source_url};
use crate::config::Config;
use crate::task::tools::ToolContext;
use crate::task::tools::cmake::CmakeOperation;
use crate::task::Taskable;

#[test]
fn test_source_url_points_at_microsoft_repo() {
    let mut config = Config::default();
    config.versions.set("directxtex", "jun2024");

    assert_eq!(
        source_url(&config).unwrap(),
        "https://github.com/microsoft/DirectXTex/archive/refs/tags/jun2024.zip"
    );
}

#[test]
fn test_source_path_derivation() {
    let mut config = Config::default();
    config.paths.build = Some(PathBuf::from("/work/build"));
    config.versions.set("directxtex", "jun2024");

    assert_eq!(
        source_path(&config).unwrap(),
        PathBuf::from("/work/build/directxtex-jun2024")
    );
}

#[test]
fn test_task_name() {
    assert_eq!(DirectXTexTask::new().name(), "directxtex");
}

#[test]
fn test_cmake_definitions_disable_tools_and_samples() {
    let mut config = Config::default();
    config.paths.build = Some(PathBuf::from("/work/build"));
    config.tools.cmake = PathBuf::from("cmake");

    let tool = cmake_tool(&config, CmakeOperation::Generate).unwrap();
    let ctx = ToolContext::new(Arc::new(config), Arc::new(AtomicBool::new(false)), false);
    let cmd = tool.generate_process(&ctx).unwrap().make_cmd();

    assert!(cmd.contains("-DBUILD_TOOLS=OFF"), "cmd: {cmd}");
    assert!(cmd.contains("-DBUILD_SAMPLE=OFF"), "cmd: {cmd}");
}

// smelter: third-party dependency build orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use super::ToolContext;
use crate::config::Config;

fn context(config: Config) -> ToolContext {
    ToolContext::new(Arc::new(config), Arc::new(AtomicBool::new(false)), false)
}

#[test]
fn test_process_inherits_verbosity() {
    let mut config = Config::default();
    config.global.verbose = true;
    let ctx = context(config);

    // a QUIET argument disappears when the context is verbose
    let p = ctx
        .process()
        .binary("7z")
        .arg_flagged("-bb0", crate::core::process::ArgFlags::QUIET);
    assert!(!p.make_cmd().contains("-bb0"));
}

#[test]
fn test_process_inherits_interrupt_flag() {
    let ctx = context(Config::default());
    let p = ctx.process().binary("tool");

    ctx.interrupt().store(true, Ordering::SeqCst);
    assert!(p.interrupt_handle().is_interrupted());
}

#[test]
fn test_tool_binary_prefers_configured_path() {
    let ctx = context(Config::default());
    let configured = PathBuf::from("C:/tools/7z.exe");

    let resolved = ctx.tool_binary(&configured, "7z").unwrap();
    assert_eq!(resolved, configured);
}

#[test]
fn test_tool_binary_fails_for_unknown_executable() {
    let ctx = context(Config::default());
    let err = ctx
        .tool_binary(&PathBuf::new(), "smelter_no_such_tool_12345")
        .unwrap_err();
    assert!(format!("{err}").contains("not in PATH"));
}

#[test]
fn test_dry_run_propagates() {
    let ctx = ToolContext::new(
        Arc::new(Config::default()),
        Arc::new(AtomicBool::new(false)),
        true,
    );
    assert!(ctx.is_dry_run());

    // a dry process spawns nothing and joins cleanly
    let mut p = ctx.process().binary("definitely-not-a-real-binary");
    p.run().unwrap();
    p.join().unwrap();
}

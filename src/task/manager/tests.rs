// smelter: third-party dependency build orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::sync::Arc;

use super::TaskManager;
use crate::config::Config;
use crate::task::{CleanFlags, default_tasks};

fn dry_config(prefix: &std::path::Path) -> Config {
    Config::parse(&format!(
        r#"
        [paths]
        prefix = "{}"

        [tools]
        sevenz = "7z"
        cmake = "cmake"
        msbuild = "msbuild"
        "#,
        prefix.display().to_string().replace('\\', "/")
    ))
    .unwrap()
}

#[test]
fn test_dry_run_walks_all_tasks() {
    let tmp = tempfile::tempdir().unwrap();
    let config = dry_config(tmp.path());

    let mut manager = TaskManager::new(Arc::new(config)).with_dry_run(true);
    for task in default_tasks() {
        manager.add(task);
    }
    assert_eq!(manager.task_count(), 4);

    manager.run().expect("dry run should touch nothing and pass");
}

#[test]
fn test_interrupt_stops_before_next_task() {
    let tmp = tempfile::tempdir().unwrap();
    let config = dry_config(tmp.path());

    let mut manager = TaskManager::new(Arc::new(config)).with_dry_run(true);
    for task in default_tasks() {
        manager.add(task);
    }

    manager.interrupt();
    assert!(manager.is_interrupted());

    let err = manager.run().unwrap_err();
    assert!(format!("{err}").contains("interrupted"), "err: {err}");
}

#[test]
fn test_clean_flags_enable_clean_phase() {
    let manager = TaskManager::new(Arc::new(Config::default()))
        .with_clean_flags(CleanFlags::REEXTRACT);
    // phases are private; observable through a dry run over zero tasks
    manager.run().unwrap();
}

#[test]
fn test_interrupt_flag_is_shared() {
    let manager = TaskManager::new(Arc::new(Config::default()));
    let flag = manager.interrupt_flag();

    flag.store(true, std::sync::atomic::Ordering::SeqCst);
    assert!(manager.is_interrupted());
}

// smelter: third-party dependency build orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! End-to-end process runner checks through the public API.

use std::time::{Duration, Instant};

use smelter::core::process::{Process, ProcessFlags};

#[test]
fn spawns_and_joins_a_real_child() {
    let mut p = Process::raw("echo integration").name("echo");
    p.run().unwrap();
    p.join().unwrap();

    assert_eq!(p.exit_code(), 0);
    assert!(String::from_utf8_lossy(p.stdout()).contains("integration"));
}

#[test]
fn execute_returns_the_exit_code() {
    let code = Process::raw("exit 3")
        .name("failer")
        .flag(ProcessFlags::ALLOW_FAILURE)
        .execute()
        .unwrap();
    assert_eq!(code, 3);
}

#[test]
fn drop_joins_a_running_child() {
    let cmd = if cfg!(windows) {
        "ping -n 4 127.0.0.1"
    } else {
        "sleep 3"
    };

    let start = Instant::now();
    {
        let mut p = Process::raw(cmd).name("sleeper");
        p.run().unwrap();
        p.interrupt();
        // dropped while running: the destructor joins and swallows
    }
    assert!(start.elapsed() < Duration::from_secs(60));
}

#[test]
fn interrupted_children_do_not_fail_the_join() {
    let cmd = if cfg!(windows) {
        "ping -n 30 127.0.0.1"
    } else {
        "sleep 30"
    };

    let mut p = Process::raw(cmd)
        .name("sleeper")
        .interrupt_grace(Duration::from_secs(2));
    p.run().unwrap();

    let handle = p.interrupt_handle();
    std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(200));
        handle.interrupt();
    });

    p.join().unwrap();
}

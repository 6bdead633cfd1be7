// smelter: third-party dependency build orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::PathBuf;
use std::time::{Duration, Instant};

use super::builder::{ArgFlags, Env, Process, ProcessFlags};

// --- command rendering ---

#[test]
fn test_raw_cmd_is_verbatim() {
    let p = Process::raw("echo hello | sort");
    assert_eq!(p.make_cmd(), "echo hello | sort");
}

#[test]
fn test_make_cmd_quotes_binary() {
    let p = Process::new().binary("C:/tools/7z.exe").arg("x");
    assert_eq!(p.make_cmd(), "\"C:/tools/7z.exe\" x");
}

#[test]
fn test_empty_key_and_value_is_noop() {
    let with = Process::new().binary("tool").arg_pair("", "");
    let without = Process::new().binary("tool");
    assert_eq!(with.make_cmd(), without.make_cmd());
}

#[test]
fn test_arg_pair_rendering() {
    let p = Process::new().binary("tool").arg_pair("-G", "Ninja");
    assert_eq!(p.make_cmd(), "\"tool\" -G Ninja");
}

#[test]
fn test_nospace_concatenates() {
    let p = Process::new()
        .binary("7z")
        .arg_pair_flagged("-o", PathBuf::from("out dir"), ArgFlags::NOSPACE);
    assert_eq!(p.make_cmd(), "\"7z\" -o\"out dir\"");
}

#[test]
fn test_key_ending_in_equals_implies_nospace() {
    let p = Process::new().binary("cmake").arg_pair("-DBUILD_TESTING=", "OFF");
    assert_eq!(p.make_cmd(), "\"cmake\" -DBUILD_TESTING=OFF");
}

#[test]
fn test_quiet_arg_depends_on_verbose() {
    let quiet = Process::new()
        .binary("7z")
        .arg_flagged("-bb0", ArgFlags::QUIET);
    assert!(quiet.make_cmd().contains("-bb0"));

    let verbose = Process::new()
        .binary("7z")
        .verbose(true)
        .arg_flagged("-bb0", ArgFlags::QUIET);
    assert!(!verbose.make_cmd().contains("-bb0"));
}

#[test]
fn test_path_arg_is_always_quoted() {
    let p = Process::new()
        .binary("7z")
        .arg(PathBuf::from("C:/archive.zip"));
    assert_eq!(p.make_cmd(), "\"7z\" \"C:/archive.zip\"");
}

#[test]
fn test_stdout_is_verbose_redirects_when_not_verbose() {
    let null = if cfg!(windows) { " > NUL" } else { " > /dev/null" };

    let p = Process::new()
        .binary("msbuild")
        .flag(ProcessFlags::STDOUT_IS_VERBOSE);
    assert!(p.make_cmd().ends_with(null));

    let p = Process::new()
        .binary("msbuild")
        .verbose(true)
        .flag(ProcessFlags::STDOUT_IS_VERBOSE);
    assert!(!p.make_cmd().contains('>'));
}

#[test]
fn test_pipe_composes_raw_command() {
    let first = Process::new().binary("7z").arg("x").arg("-so");
    let second = Process::new().binary("7z").arg("x").arg("-si");

    let piped = Process::pipe(first, &second);
    assert_eq!(piped.make_cmd(), "\"7z\" x -so | \"7z\" x -si");
}

#[test]
fn test_make_name_falls_back_to_cmd() {
    let anonymous = Process::raw("echo hi");
    assert_eq!(anonymous.make_name(), "echo hi");

    let named = Process::raw("echo hi").name("greeter");
    assert_eq!(named.make_name(), "greeter");
}

#[test]
fn test_rendering_is_stable() {
    let build = || {
        Process::new()
            .binary("tool")
            .arg("x")
            .arg_pair("-k", "v")
            .arg_flagged("-bd", ArgFlags::QUIET)
    };
    assert_eq!(build().make_cmd(), build().make_cmd());
}

// --- behaviour ---

#[test]
fn test_echo_exits_zero_and_is_captured() {
    let mut p = Process::raw("echo hello").name("echo");
    p.run().expect("spawn should succeed");
    p.join().expect("join should succeed");

    assert_eq!(p.exit_code(), 0);
    let stdout = String::from_utf8_lossy(p.stdout()).to_string();
    assert!(stdout.contains("hello"), "captured: {stdout:?}");
}

#[test]
fn test_exit_code_with_allow_failure() {
    let mut p = Process::raw("exit 7")
        .name("failer")
        .flag(ProcessFlags::ALLOW_FAILURE);
    p.run().unwrap();
    p.join().expect("ALLOW_FAILURE tolerates non-zero exits");
    assert_eq!(p.exit_code(), 7);
}

#[test]
fn test_nonzero_exit_is_fatal_without_allow_failure() {
    let mut p = Process::raw("exit 5").name("failer");
    p.run().unwrap();

    let err = p.join().expect_err("exit 5 should be fatal");
    let message = format!("{err}");
    assert!(message.contains("failer"), "message: {message}");
    assert!(message.contains('5'), "message: {message}");
}

#[test]
fn test_join_without_run_is_noop() {
    let mut p = Process::raw("echo never spawned");
    p.join().unwrap();
    assert_eq!(p.exit_code(), 0);
}

#[test]
fn test_dry_run_does_not_spawn() {
    let mut p = Process::raw("exit 33").name("dry").dry(true);
    p.run().unwrap();
    p.join().unwrap();

    assert_eq!(p.exit_code(), 0);
    assert!(p.stdout().is_empty());
}

#[test]
fn test_environment_is_passed_to_child() {
    let mut env = Env::current();
    env.set("SMELTER_TEST_VAR", "it works");

    let cmd = if cfg!(windows) {
        "echo %SMELTER_TEST_VAR%"
    } else {
        "echo $SMELTER_TEST_VAR"
    };

    let mut p = Process::raw(cmd).name("env-echo").env(env);
    p.run().unwrap();
    p.join().unwrap();

    let stdout = String::from_utf8_lossy(p.stdout()).to_string();
    assert!(stdout.contains("it works"), "captured: {stdout:?}");
}

#[test]
fn test_interrupt_from_another_thread() {
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
    let interrupter = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(300));
        handle.interrupt();
    });

    let start = Instant::now();
    p.join().expect("interrupted exit is not an error");
    interrupter.join().unwrap();

    // interrupt observed within a couple of quanta, not after 30 s
    assert!(start.elapsed() < Duration::from_secs(15));
}

#[test]
fn test_interrupt_is_idempotent() {
    let p = Process::raw("echo hi");
    p.interrupt();
    p.interrupt();
    assert!(p.interrupt_handle().is_interrupted());
}

#[test]
fn test_cwd_is_created_and_used() {
    let tmp = tempfile::tempdir().unwrap();
    let workdir = tmp.path().join("nested/work");

    let cmd = if cfg!(windows) { "cd" } else { "pwd" };

    let mut p = Process::raw(cmd).name("pwd").cwd(&workdir);
    p.run().unwrap();
    p.join().unwrap();

    assert!(workdir.is_dir());
    let stdout = String::from_utf8_lossy(p.stdout()).to_string();
    assert!(stdout.contains("work"), "captured: {stdout:?}");
}

// smelter: third-party dependency build orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::AsyncPipe;
use crate::core::handle::OwnedHandle;
use windows::Win32::Storage::FileSystem::WriteFile;

fn write_all(handle: &OwnedHandle, data: &[u8]) {
    let mut written = 0u32;
    // SAFETY: the write side is a valid synchronous pipe handle.
    unsafe {
        WriteFile(handle.as_raw(), Some(data), Some(&mut written), None)
            .expect("WriteFile failed");
    }
    assert_eq!(written as usize, data.len());
}

/// Drains until data arrives or the attempt budget runs out.
fn read_some(pipe: &mut AsyncPipe) -> Vec<u8> {
    for _ in 0..20 {
        let chunk = pipe.read().expect("pipe read failed");
        if !chunk.is_empty() {
            return chunk;
        }
    }
    Vec::new()
}

#[test]
fn test_round_trip() {
    let (mut pipe, write_side) = AsyncPipe::create("test").unwrap();

    write_all(&write_side, b"hello pipe");
    assert_eq!(read_some(&mut pipe), b"hello pipe");
}

#[test]
fn test_read_before_write_stays_pending() {
    let (mut pipe, write_side) = AsyncPipe::create("test").unwrap();

    // nothing written yet: the read goes pending and returns empty
    let first = pipe.read().unwrap();
    assert!(first.is_empty());
    assert!(pipe.is_pending());

    write_all(&write_side, b"later");
    assert_eq!(read_some(&mut pipe), b"later");
    assert!(!pipe.is_pending());
}

#[test]
fn test_order_is_preserved_across_reads() {
    let (mut pipe, write_side) = AsyncPipe::create("test").unwrap();

    write_all(&write_side, b"one ");
    write_all(&write_side, b"two ");
    write_all(&write_side, b"three");

    let mut collected = Vec::new();
    while collected.len() < 13 {
        collected.extend(read_some(&mut pipe));
    }
    assert_eq!(collected, b"one two three");
}

#[test]
fn test_broken_pipe_reads_empty() {
    let (mut pipe, write_side) = AsyncPipe::create("test").unwrap();

    write_all(&write_side, b"last words");
    drop(write_side);

    assert_eq!(read_some(&mut pipe), b"last words");

    // writer is gone: every further read tolerates the broken pipe
    for _ in 0..3 {
        assert!(pipe.read().unwrap().is_empty());
    }
}

#[test]
fn test_unique_names_allow_concurrent_pipes() {
    let a = AsyncPipe::create("test").unwrap();
    let b = AsyncPipe::create("test").unwrap();
    drop(a);
    drop(b);
}

#[test]
fn test_drop_with_pending_read() {
    let (mut pipe, _write_side) = AsyncPipe::create("test").unwrap();
    let _ = pipe.read().unwrap();
    assert!(pipe.is_pending());
    // drop must cancel the outstanding read without touching freed memory
    drop(pipe);
}

// smelter: third-party dependency build orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::OwnedHandle;
use windows::Win32::Foundation::{HANDLE, INVALID_HANDLE_VALUE};
use windows::Win32::System::Threading::CreateEventW;

fn new_event() -> OwnedHandle {
    // SAFETY: plain event creation with no name and no security attributes.
    let raw = unsafe { CreateEventW(None, true, false, None) }.expect("CreateEventW failed");
    OwnedHandle::new(raw).expect("event handle should be valid")
}

#[test]
fn test_rejects_sentinels() {
    assert!(OwnedHandle::new(HANDLE::default()).is_none());
    assert!(OwnedHandle::new(INVALID_HANDLE_VALUE).is_none());
}

#[test]
fn test_owns_and_closes() {
    let event = new_event();
    assert!(!event.as_raw().is_invalid());
    drop(event);
}

#[test]
fn test_try_clone_yields_distinct_handle() {
    let event = new_event();
    let dup = event.try_clone().expect("duplicate should succeed");
    assert_ne!(event.as_raw(), dup.as_raw());
}

#[test]
fn test_release_transfers_ownership() {
    let event = new_event();
    let raw = event.release();

    // re-adopt so the handle is still closed exactly once
    let adopted = OwnedHandle::new(raw).expect("released handle should be valid");
    drop(adopted);
}

#[test]
fn test_reset_replaces_handle() {
    let mut event = new_event();
    let other = new_event();
    let other_raw = other.release();

    assert!(event.reset(other_raw));
    assert_eq!(event.as_raw(), other_raw);

    // resetting to a sentinel is refused and leaves the handle intact
    assert!(!event.reset(HANDLE::default()));
    assert_eq!(event.as_raw(), other_raw);
}

// smelter: third-party dependency build orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Owned kernel handle wrapper.
//!
//! ```text
//! OwnedHandle
//!   new(raw)     --> None for NULL / INVALID_HANDLE_VALUE
//!   as_raw()     --> observe
//!   reset(raw)   --> close old, adopt new
//!   release()    --> transfer out without closing
//!   try_clone()  --> DuplicateHandle
//!   drop()       --> CloseHandle exactly once
//! ```
//!
//! "No handle" is `Option<OwnedHandle>`; a live `OwnedHandle` always wraps
//! a closeable handle.

use windows::Win32::Foundation::{
    CloseHandle, DUPLICATE_SAME_ACCESS, DuplicateHandle, HANDLE, INVALID_HANDLE_VALUE,
};
use windows::Win32::System::Threading::GetCurrentProcess;

/// Converts a Windows API error to a `std::io::Error`.
pub(crate) fn windows_error_to_io(err: &windows::core::Error) -> std::io::Error {
    std::io::Error::from_raw_os_error(err.code().0)
}

/// A kernel handle with single ownership.
///
/// Closed exactly once on drop. Moving transfers ownership; duplication
/// only happens through the explicit [`OwnedHandle::try_clone`].
///
/// # Thread Safety
/// Kernel handles are process-global tokens; the wrapper adds no interior
/// mutability, so sending it across threads is sound.
#[derive(Debug)]
pub struct OwnedHandle(HANDLE);

// SAFETY: HANDLE is a pointer-sized kernel token, valid from any thread of
// the owning process.
unsafe impl Send for OwnedHandle {}
unsafe impl Sync for OwnedHandle {}

impl OwnedHandle {
    /// Adopts a raw handle.
    ///
    /// Returns `None` when `raw` is the null handle or
    /// `INVALID_HANDLE_VALUE`, so a constructed `OwnedHandle` is always
    /// closeable.
    #[must_use]
    pub fn new(raw: HANDLE) -> Option<Self> {
        if raw.is_invalid() || raw == INVALID_HANDLE_VALUE {
            None
        } else {
            Some(Self(raw))
        }
    }

    /// Returns the raw handle value.
    ///
    /// The handle stays owned; do not close it manually.
    #[must_use]
    pub const fn as_raw(&self) -> HANDLE {
        self.0
    }

    /// Closes the current handle and adopts `raw` instead.
    ///
    /// If `raw` is a sentinel the call is refused: `self` keeps its
    /// handle and `false` is returned.
    pub fn reset(&mut self, raw: HANDLE) -> bool {
        let Some(new) = Self::new(raw) else {
            return false;
        };

        // SAFETY: we own the old handle and it has not been closed yet.
        unsafe {
            let _ = CloseHandle(self.0);
        }
        self.0 = new.release();
        true
    }

    /// Transfers the handle out without closing it.
    #[must_use]
    pub fn release(self) -> HANDLE {
        let raw = self.0;
        std::mem::forget(self);
        raw
    }

    /// Duplicates the handle via `DuplicateHandle`.
    ///
    /// The duplicate is not inheritable.
    ///
    /// # Errors
    ///
    /// Returns the OS error if duplication fails.
    pub fn try_clone(&self) -> std::io::Result<Self> {
        let mut dup = HANDLE::default();

        // SAFETY: source and target process are the current process, the
        // source handle is owned and valid, and dup is a valid out pointer.
        unsafe {
            DuplicateHandle(
                GetCurrentProcess(),
                self.0,
                GetCurrentProcess(),
                &mut dup,
                0,
                false,
                DUPLICATE_SAME_ACCESS,
            )
            .map_err(|e| windows_error_to_io(&e))?;
        }

        Self::new(dup)
            .ok_or_else(|| std::io::Error::other("DuplicateHandle returned a sentinel"))
    }
}

impl Drop for OwnedHandle {
    fn drop(&mut self) {
        // SAFETY: construction guarantees a valid, still-open handle that
        // we exclusively own.
        unsafe {
            let _ = CloseHandle(self.0);
        }
    }
}

#[cfg(test)]
mod tests;

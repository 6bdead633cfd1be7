// smelter: third-party dependency build orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Overlapped named pipe with a non-blocking drain operation.
//!
//! ```text
//! AsyncPipe::create(hint)
//!   \\.\pipe\smelter-<hint>-<pid>-<serial>
//!   server (overlapped, byte stream, 1 instance, 50 KB buffers)
//!     --> duplicate: read side (parent, not inheritable)
//!     --> CreateFileW: write side (child, inheritable)
//!   manual-reset event bound to the OVERLAPPED
//!
//! read(): idle    --> one overlapped ReadFile
//!         pending --> wait event (bounded), query result
//! At most one read is ever outstanding.
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

use windows::Win32::Foundation::{
    ERROR_BROKEN_PIPE, ERROR_IO_INCOMPLETE, ERROR_IO_PENDING, HANDLE, WAIT_FAILED, WAIT_TIMEOUT,
    WIN32_ERROR,
};
use windows::Win32::Security::SECURITY_ATTRIBUTES;
use windows::Win32::Storage::FileSystem::{
    CreateFileW, FILE_ATTRIBUTE_NORMAL, FILE_FLAG_OVERLAPPED, FILE_SHARE_MODE, FILE_WRITE_DATA,
    OPEN_EXISTING, ReadFile, SYNCHRONIZE,
};
use windows::Win32::System::IO::{CancelIo, GetOverlappedResult, OVERLAPPED};
use windows::Win32::System::Pipes::{
    CreateNamedPipeW, PIPE_ACCESS_DUPLEX, PIPE_READMODE_BYTE, PIPE_TYPE_BYTE, PIPE_WAIT,
};
use windows::Win32::System::Threading::{CreateEventW, ResetEvent, WaitForSingleObject};
use windows::core::PCWSTR;

use crate::core::handle::{OwnedHandle, windows_error_to_io};
use crate::error::PipeError;

/// Internal buffer size of the named pipe, per direction.
const PIPE_BUFFER_SIZE: u32 = 50_000;

/// One `read()` returns at most this many bytes; callers loop.
const READ_BUFFER_SIZE: usize = 8192;

/// Bound for the completion wait and the pipe's default timeout.
const PIPE_TIMEOUT_MS: u32 = 500;

/// Serial number for pipe names, so concurrent processes never collide.
static PIPE_SERIAL: AtomicU64 = AtomicU64::new(0);

type PipeResult<T> = std::result::Result<T, PipeError>;

fn wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

/// One-direction overlapped pipe.
///
/// The parent keeps the read side and the event; the write side is handed
/// to the child's stdout or stderr slot. `read()` never blocks longer than
/// the pipe timeout, so a join loop can service both streams and its
/// interrupt flag from one thread.
pub struct AsyncPipe {
    read_handle: OwnedHandle,
    event: OwnedHandle,
    // boxed: the kernel writes through this pointer while a read is
    // pending, so its address must survive moves of the pipe itself
    overlapped: Box<OVERLAPPED>,
    buffer: Box<[u8; READ_BUFFER_SIZE]>,
    pending: bool,
}

impl AsyncPipe {
    /// Creates the pipe pair.
    ///
    /// Returns the pipe and the inheritable write-side handle destined for
    /// the child process.
    ///
    /// # Errors
    ///
    /// Any failing OS call is fatal and reported with its error code.
    pub fn create(hint: &str) -> PipeResult<(Self, OwnedHandle)> {
        let serial = PIPE_SERIAL.fetch_add(1, Ordering::Relaxed);
        let name = format!(
            r"\\.\pipe\smelter-{hint}-{pid}-{serial}",
            pid = std::process::id()
        );
        let name_w = wide(&name);

        let sa = SECURITY_ATTRIBUTES {
            nLength: u32::try_from(std::mem::size_of::<SECURITY_ATTRIBUTES>()).unwrap_or(0),
            lpSecurityDescriptor: std::ptr::null_mut(),
            bInheritHandle: true.into(),
        };

        // SAFETY: name_w is a valid, NUL-terminated wide string and sa
        // outlives the call.
        let server = unsafe {
            CreateNamedPipeW(
                PCWSTR(name_w.as_ptr()),
                PIPE_ACCESS_DUPLEX | FILE_FLAG_OVERLAPPED,
                PIPE_TYPE_BYTE | PIPE_READMODE_BYTE | PIPE_WAIT,
                1,
                PIPE_BUFFER_SIZE,
                PIPE_BUFFER_SIZE,
                PIPE_TIMEOUT_MS,
                Some(&sa),
            )
        }
        .map_err(|e| PipeError::CreateFailed {
            name: name.clone(),
            source: windows_error_to_io(&e),
        })?;

        let server = OwnedHandle::new(server).ok_or_else(|| PipeError::CreateFailed {
            name: name.clone(),
            source: std::io::Error::other("CreateNamedPipe returned a sentinel"),
        })?;

        // the parent reads through a non-inheritable duplicate; the
        // original server handle is dropped once both sides exist
        let read_handle = server.try_clone().map_err(PipeError::DuplicateFailed)?;

        // SAFETY: same string as above; sa marks the handle inheritable so
        // CreateProcess can wire it to the child.
        let write_handle = unsafe {
            CreateFileW(
                PCWSTR(name_w.as_ptr()),
                (FILE_WRITE_DATA | SYNCHRONIZE).0,
                FILE_SHARE_MODE(0),
                Some(&sa),
                OPEN_EXISTING,
                FILE_ATTRIBUTE_NORMAL,
                None,
            )
        }
        .map_err(|e| PipeError::OpenWriteFailed {
            name: name.clone(),
            source: windows_error_to_io(&e),
        })?;

        let write_handle = OwnedHandle::new(write_handle).ok_or_else(|| {
            PipeError::OpenWriteFailed {
                name: name.clone(),
                source: std::io::Error::other("CreateFileW returned a sentinel"),
            }
        })?;

        // SAFETY: manual-reset event, initially non-signalled, unnamed.
        let event_raw = unsafe { CreateEventW(None, true, false, None) }
            .map_err(|e| PipeError::EventFailed(windows_error_to_io(&e)))?;

        let event = OwnedHandle::new(event_raw)
            .ok_or_else(|| PipeError::EventFailed(std::io::Error::other("null event handle")))?;

        let mut overlapped = Box::new(OVERLAPPED::default());
        overlapped.hEvent = event.as_raw();

        drop(server);

        Ok((
            Self {
                read_handle,
                event,
                overlapped,
                buffer: Box::new([0u8; READ_BUFFER_SIZE]),
                pending: false,
            },
            write_handle,
        ))
    }

    /// Drains at most one buffer's worth of data without blocking beyond
    /// the pipe timeout.
    ///
    /// Returns an empty vector when no data is available yet, when the
    /// prior read is still in flight, or when the child has closed its end.
    ///
    /// # Errors
    ///
    /// Unexpected OS failures are fatal; transient conditions
    /// (`IO_PENDING`, `IO_INCOMPLETE`, timeouts, broken pipe) are not.
    pub fn read(&mut self) -> PipeResult<Vec<u8>> {
        if self.pending {
            self.check_pending()
        } else {
            self.try_read()
        }
    }

    /// Returns true while an overlapped read is outstanding.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending
    }

    /// Exposes the read-side handle for overlapped queries.
    const fn raw_read_handle(&self) -> HANDLE {
        self.read_handle.as_raw()
    }

    fn try_read(&mut self) -> PipeResult<Vec<u8>> {
        let mut bytes_read = 0u32;

        // SAFETY: buffer and overlapped are heap-allocated and owned by
        // self; the invariant that no other read is outstanding holds here.
        let result = unsafe {
            ReadFile(
                self.raw_read_handle(),
                Some(&mut self.buffer[..]),
                Some(&mut bytes_read),
                Some(std::ptr::from_mut(self.overlapped.as_mut())),
            )
        };

        match result {
            Ok(()) => Ok(self.buffer[..bytes_read as usize].to_vec()),
            Err(e) if e.code() == ERROR_IO_PENDING.to_hresult() => {
                self.pending = true;
                Ok(Vec::new())
            }
            // child closed its end; the stream is finished
            Err(e) if e.code() == ERROR_BROKEN_PIPE.to_hresult() => Ok(Vec::new()),
            Err(e) => Err(PipeError::ReadFailed(windows_error_to_io(&e))),
        }
    }

    fn check_pending(&mut self) -> PipeResult<Vec<u8>> {
        // SAFETY: the event handle is owned and valid.
        let wait = unsafe { WaitForSingleObject(self.event.as_raw(), PIPE_TIMEOUT_MS) };
        if wait == WAIT_FAILED {
            let e = windows::core::Error::from_win32();
            return Err(PipeError::WaitFailed(windows_error_to_io(&e)));
        }

        let mut bytes_read = 0u32;

        // SAFETY: the overlapped struct belongs to the read issued on this
        // handle; bWait=false keeps the call non-blocking.
        let result = unsafe {
            GetOverlappedResult(
                self.raw_read_handle(),
                std::ptr::from_ref(self.overlapped.as_ref()),
                &mut bytes_read,
                false,
            )
        };

        match result {
            Ok(()) => {
                // SAFETY: owned event handle.
                unsafe {
                    ResetEvent(self.event.as_raw())
                        .map_err(|e| PipeError::WaitFailed(windows_error_to_io(&e)))?;
                }
                self.pending = false;
                Ok(self.buffer[..bytes_read as usize].to_vec())
            }
            Err(e)
                if e.code() == ERROR_IO_INCOMPLETE.to_hresult()
                    || e.code() == WIN32_ERROR(WAIT_TIMEOUT.0).to_hresult() =>
            {
                // still in flight
                Ok(Vec::new())
            }
            Err(e) if e.code() == ERROR_BROKEN_PIPE.to_hresult() => {
                // drained; later reads keep tolerating the broken pipe
                Ok(Vec::new())
            }
            Err(e) => Err(PipeError::OverlappedFailed(windows_error_to_io(&e))),
        }
    }
}

impl Drop for AsyncPipe {
    fn drop(&mut self) {
        if !self.pending {
            return;
        }

        // a cancelled read must complete before buffer and OVERLAPPED are
        // freed, or the kernel would write through dangling pointers
        let mut bytes_read = 0u32;
        // SAFETY: handle and overlapped are still alive here; bWait=true
        // blocks until the cancelled operation has fully completed.
        unsafe {
            let _ = CancelIo(self.raw_read_handle());
            let _ = GetOverlappedResult(
                self.raw_read_handle(),
                std::ptr::from_ref(self.overlapped.as_ref()),
                &mut bytes_read,
                true,
            );
        }
    }
}

#[cfg(test)]
mod tests;

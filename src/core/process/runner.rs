// smelter: third-party dependency build orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Windows process execution: spawn via the shell, join with a bounded
//! wait quantum, drain overlapped pipes, deliver interrupts.
//!
//! ```text
//! run()
//!   AsyncPipe x2 --> child stdout/stderr
//!   COMSPEC /C "<command>"
//!   CreateProcessW (inherit handles, new process group)
//!        |
//!        v
//! join()            every 100 ms:
//!   exited?  -----> exit code, ALLOW_FAILURE / interrupt
//!   timeout  -----> drain pipes --> sink
//!                   interrupt? CTRL_BREAK once
//!                   grace over? TerminateProcess 0xFFFF
//! ```

use std::time::Instant;

use tracing::{debug, error, trace, warn};
use windows::Win32::Foundation::{CloseHandle, WAIT_FAILED, WAIT_OBJECT_0, WAIT_TIMEOUT};
use windows::Win32::System::Console::{CTRL_BREAK_EVENT, GenerateConsoleCtrlEvent};
use windows::Win32::System::Threading::{
    CREATE_NEW_PROCESS_GROUP, CREATE_UNICODE_ENVIRONMENT, CreateProcessW, GetExitCodeProcess,
    GetProcessId, PROCESS_INFORMATION, STARTF_USESTDHANDLES, STARTUPINFOW, TerminateProcess,
    WaitForSingleObject,
};
use windows::core::{PCWSTR, PWSTR};

use super::builder::{Env, Process, ProcessFlags};
use crate::core::handle::{OwnedHandle, windows_error_to_io};
use crate::core::pipe::AsyncPipe;
use crate::error::{ProcessError, Result};
use crate::utility::fs;

/// Wait quantum of the join loop.
const WAIT_QUANTUM_MS: u32 = 100;

/// Exit code used when the child has to be terminated forcibly.
const TERMINATE_EXIT_CODE: u32 = 0xFFFF;

/// Runtime state of one spawned child.
pub(crate) struct Child {
    handle: OwnedHandle,
    stdout_pipe: AsyncPipe,
    stderr_pipe: AsyncPipe,
}

fn wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

/// Renders the `CreateProcessW` environment block: each `KEY=value`
/// NUL-terminated, the whole block terminated by an extra NUL.
fn environment_block(env: &Env) -> Vec<u16> {
    if env.is_empty() {
        return vec![0, 0];
    }

    let mut block = Vec::new();
    for (key, value) in env.iter() {
        block.extend(format!("{key}={value}").encode_utf16());
        block.push(0);
    }
    block.push(0);
    block
}

impl Process {
    /// Spawns the child process.
    ///
    /// Logs the intended working directory and command line; in dry-run
    /// mode that is all that happens.
    ///
    /// # Errors
    ///
    /// Returns an error if pipe creation fails, `COMSPEC` is unset, the
    /// working directory cannot be created, or the spawn itself fails.
    pub fn run(&mut self) -> Result<()> {
        if let Some(cwd) = &self.cwd {
            debug!(cwd = %cwd.display(), "cd");
        }

        let what = self.make_cmd();
        debug!(cmd = %what, "exec");

        if self.dry {
            return Ok(());
        }

        self.spawn(&what)
    }

    fn spawn(&mut self, what: &str) -> Result<()> {
        let (stdout_pipe, stdout_write) = AsyncPipe::create("out")?;
        let (stderr_pipe, stderr_write) = AsyncPipe::create("err")?;

        let shell = std::env::var("COMSPEC").map_err(|_| ProcessError::SpawnFailed {
            shell: "%COMSPEC%".to_string(),
            source: std::io::Error::other("COMSPEC is not set"),
        })?;
        let args = format!("/C \"{what}\"");

        if let Some(cwd) = &self.cwd {
            fs::create_directories(cwd)?;
        }

        let shell_w = wide(&shell);
        let mut args_w = wide(&args);
        let cwd_w = self.cwd.as_ref().map(|p| wide(&p.display().to_string()));
        let env_block = self.env.as_ref().map(environment_block);

        let mut creation_flags = CREATE_NEW_PROCESS_GROUP;
        if env_block.is_some() {
            creation_flags |= CREATE_UNICODE_ENVIRONMENT;
        }

        let startup_info = STARTUPINFOW {
            cb: u32::try_from(std::mem::size_of::<STARTUPINFOW>()).unwrap_or(0),
            dwFlags: STARTF_USESTDHANDLES,
            hStdOutput: stdout_write.as_raw(),
            hStdError: stderr_write.as_raw(),
            ..STARTUPINFOW::default()
        };
        let mut process_info = PROCESS_INFORMATION::default();

        // SAFETY: all pointers are into locals that outlive the call; the
        // write-side pipe handles are inheritable by construction.
        unsafe {
            CreateProcessW(
                PCWSTR(shell_w.as_ptr()),
                PWSTR(args_w.as_mut_ptr()),
                None,
                None,
                true,
                creation_flags,
                env_block
                    .as_ref()
                    .map(|block| block.as_ptr().cast::<std::ffi::c_void>()),
                cwd_w.as_ref().map_or(PCWSTR::null(), |w| PCWSTR(w.as_ptr())),
                &startup_info,
                &mut process_info,
            )
            .map_err(|e| ProcessError::SpawnFailed {
                shell: shell.clone(),
                source: windows_error_to_io(&e),
            })?;

            // only the process handle is retained
            let _ = CloseHandle(process_info.hThread);
        }

        let handle = OwnedHandle::new(process_info.hProcess).ok_or_else(|| {
            ProcessError::SpawnFailed {
                shell,
                source: std::io::Error::other("CreateProcessW returned a null process handle"),
            }
        })?;

        trace!(process = %self.make_name(), pid = process_info.dwProcessId, "spawned");

        self.child = Some(Child {
            handle,
            stdout_pipe,
            stderr_pipe,
        });

        Ok(())
    }

    /// Waits for the child to terminate while draining its output streams
    /// and honoring interrupt requests.
    ///
    /// # Errors
    ///
    /// A non-zero exit code is fatal unless `ALLOW_FAILURE` is set or an
    /// interrupt was requested. Unexpected wait failures are fatal with
    /// the OS error.
    pub fn join(&mut self) -> Result<()> {
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };

        let name = self.make_name();
        let mut break_sent_at: Option<Instant> = None;
        let mut terminated = false;

        loop {
            // SAFETY: the process handle is owned and open until `child`
            // drops at the end of this function.
            let wait = unsafe { WaitForSingleObject(child.handle.as_raw(), WAIT_QUANTUM_MS) };

            if wait == WAIT_OBJECT_0 {
                let mut code = 0u32;
                // SAFETY: handle is valid and the process has exited.
                unsafe {
                    GetExitCodeProcess(child.handle.as_raw(), &mut code).map_err(|e| {
                        ProcessError::ExitCodeFailed {
                            name: name.clone(),
                            source: windows_error_to_io(&e),
                        }
                    })?;
                }
                #[allow(clippy::cast_possible_wrap)]
                {
                    self.exit_code = code as i32;
                }

                self.drain_remaining(&mut child);

                if self.flags.contains(ProcessFlags::ALLOW_FAILURE) || self.interrupt_requested() {
                    trace!(process = %name, exit_code = self.exit_code, "completed (tolerated)");
                    return Ok(());
                }

                if self.exit_code != 0 {
                    return Err(ProcessError::NonZeroExit {
                        name,
                        code: self.exit_code,
                    }
                    .into());
                }

                trace!(process = %name, exit_code = self.exit_code, "completed");
                return Ok(());
            }

            if wait == WAIT_TIMEOUT {
                self.drain_once(&mut child)?;

                if self.interrupt_requested() {
                    match break_sent_at {
                        None => {
                            deliver_break(&name, &child);
                            break_sent_at = Some(Instant::now());
                        }
                        Some(sent) if !terminated && sent.elapsed() >= self.interrupt_grace => {
                            warn!(process = %name, "grace period elapsed, terminating");
                            // SAFETY: owned, valid process handle.
                            unsafe {
                                let _ =
                                    TerminateProcess(child.handle.as_raw(), TERMINATE_EXIT_CODE);
                            }
                            terminated = true;
                        }
                        _ => {}
                    }
                }

                continue;
            }

            debug_assert_eq!(wait, WAIT_FAILED);
            let e = windows::core::Error::from_win32();
            return Err(ProcessError::WaitFailed {
                name,
                source: windows_error_to_io(&e),
            }
            .into());
        }
    }

    /// Drains whatever both pipes currently hold into the sink.
    fn drain_once(&mut self, child: &mut Child) -> Result<()> {
        loop {
            let chunk = child.stdout_pipe.read()?;
            if chunk.is_empty() {
                break;
            }
            trace!(stream = "stdout", bytes = chunk.len(), "drained");
            self.stdout_data.extend_from_slice(&chunk);
        }

        loop {
            let chunk = child.stderr_pipe.read()?;
            if chunk.is_empty() {
                break;
            }
            trace!(stream = "stderr", bytes = chunk.len(), "drained");
            self.stderr_data.extend_from_slice(&chunk);
        }

        Ok(())
    }

    /// After exit, pulls any bytes still buffered in the pipes so the
    /// captured output is complete.
    fn drain_remaining(&mut self, child: &mut Child) {
        let _ = self.drain_once(child);
    }
}

/// Sends one console break to the child's process group, falling back to
/// forced termination when no PID can be resolved.
fn deliver_break(name: &str, child: &Child) {
    // SAFETY: owned, valid process handle.
    let pid = unsafe { GetProcessId(child.handle.as_raw()) };

    if pid == 0 {
        error!(process = %name, "process id is 0, terminating instead");
        // SAFETY: owned, valid process handle.
        unsafe {
            let _ = TerminateProcess(child.handle.as_raw(), TERMINATE_EXIT_CODE);
        }
        return;
    }

    debug!(process = %name, pid, "sending console break");
    // SAFETY: pid addresses the process group created by the spawn.
    unsafe {
        if let Err(e) = GenerateConsoleCtrlEvent(CTRL_BREAK_EVENT, pid) {
            debug!(process = %name, error = %e.message(), "console break failed");
        }
    }
}

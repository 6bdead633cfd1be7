// smelter: third-party dependency build orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Portable fallback runner for non-Windows hosts.
//!
//! Mirrors the observable contract of the Windows runner: shell spawn,
//! 100 ms poll quantum, output drained to the sink, interrupt honored
//! within one quantum. Interrupts kill the child outright since there is
//! no console-group break to deliver.

use std::io::Read;
use std::process::{Command, Stdio};
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::{debug, trace};

use super::builder::{Process, ProcessFlags};
use crate::error::{ProcessError, Result};
use crate::utility::fs;

/// Wait quantum of the join loop.
const WAIT_QUANTUM: Duration = Duration::from_millis(100);

const SHELL: &str = "/bin/sh";

/// Runtime state of one spawned child.
pub(crate) struct Child {
    inner: std::process::Child,
    stdout_thread: Option<JoinHandle<Vec<u8>>>,
    stderr_thread: Option<JoinHandle<Vec<u8>>>,
}

fn spawn_reader<R: Read + Send + 'static>(stream: Option<R>) -> Option<JoinHandle<Vec<u8>>> {
    stream.map(|mut stream| {
        std::thread::spawn(move || {
            let mut data = Vec::new();
            let mut buf = [0u8; 8192];
            loop {
                match stream.read(&mut buf) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => data.extend_from_slice(&buf[..n]),
                }
            }
            data
        })
    })
}

impl Process {
    /// Spawns the child process via the shell.
    ///
    /// # Errors
    ///
    /// Returns an error if the working directory cannot be created or the
    /// spawn fails.
    pub fn run(&mut self) -> Result<()> {
        if let Some(cwd) = &self.cwd {
            debug!(cwd = %cwd.display(), "cd");
        }

        let what = self.make_cmd();
        debug!(cmd = %what, "exec");

        if self.dry {
            return Ok(());
        }

        let mut command = Command::new(SHELL);
        command.arg("-c").arg(&what);

        if let Some(cwd) = &self.cwd {
            fs::create_directories(cwd)?;
            command.current_dir(cwd);
        }

        if let Some(env) = &self.env {
            command.env_clear();
            for (key, value) in env.iter() {
                command.env(key, value);
            }
        }

        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut inner = command.spawn().map_err(|e| ProcessError::SpawnFailed {
            shell: SHELL.to_string(),
            source: e,
        })?;

        trace!(process = %self.make_name(), pid = inner.id(), "spawned");

        let stdout_thread = spawn_reader(inner.stdout.take());
        let stderr_thread = spawn_reader(inner.stderr.take());

        self.child = Some(Child {
            inner,
            stdout_thread,
            stderr_thread,
        });

        Ok(())
    }

    /// Waits for the child to terminate, polling on the wait quantum.
    ///
    /// # Errors
    ///
    /// A non-zero exit code is fatal unless `ALLOW_FAILURE` is set or an
    /// interrupt was requested.
    pub fn join(&mut self) -> Result<()> {
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };

        let name = self.make_name();
        let mut killed = false;

        loop {
            match child.inner.try_wait() {
                Ok(Some(status)) => {
                    self.exit_code = status.code().unwrap_or(-1);

                    if let Some(handle) = child.stdout_thread.take() {
                        if let Ok(data) = handle.join() {
                            self.stdout_data.extend_from_slice(&data);
                        }
                    }
                    if let Some(handle) = child.stderr_thread.take() {
                        if let Ok(data) = handle.join() {
                            self.stderr_data.extend_from_slice(&data);
                        }
                    }

                    if self.flags.contains(ProcessFlags::ALLOW_FAILURE)
                        || self.interrupt_requested()
                    {
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
                Ok(None) => {
                    if self.interrupt_requested() && !killed {
                        debug!(process = %name, "interrupt requested, killing child");
                        let _ = child.inner.kill();
                        killed = true;
                    }
                    std::thread::sleep(WAIT_QUANTUM);
                }
                Err(e) => {
                    return Err(ProcessError::WaitFailed { name, source: e }.into());
                }
            }
        }
    }
}

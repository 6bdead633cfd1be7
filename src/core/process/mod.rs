// smelter: third-party dependency build orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Process spawning and lifecycle management.
//!
//! ```text
//! Process::new("7z")
//!   .binary() .arg() .cwd() .env() .flags()
//!   .run() --> spawn via shell, wire async pipes
//!   .join() --> 100 ms wait quantum
//!       drain stdout/stderr --> sink
//!       interrupt --> CTRL_BREAK, grace, terminate
//!   .exit_code() / .stdout() / .stderr()
//! ```
//!
//! The Windows implementation drives overlapped pipes; other hosts get a
//! portable fallback with the same observable contract.

pub mod builder;

#[cfg(windows)]
mod runner;
#[cfg(windows)]
use runner as imp;

#[cfg(not(windows))]
mod portable;
#[cfg(not(windows))]
use portable as imp;

pub use builder::{ArgFlags, Env, InterruptHandle, Process, ProcessFlags};

#[cfg(test)]
mod tests;

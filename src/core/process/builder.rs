// smelter: third-party dependency build orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Process configuration and command-line rendering.
//!
//! ```text
//! Process
//!  • new/raw/pipe
//!  • name/binary/cwd/env/flags/verbose/dry/interrupt_grace
//!  • arg/arg_flagged/arg_pair/arg_pair_flagged
//!
//! ProcessFlags: ALLOW_FAILURE, STDOUT_IS_VERBOSE
//! ArgFlags:     QUIET (kept only when not verbose), NOSPACE
//!
//! make_cmd(): raw verbatim, else "<binary>" <args> [> NUL]
//! ```

use bitflags::bitflags;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

bitflags! {
    /// Flags controlling process execution behavior.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ProcessFlags: u32 {
        /// Don't fail if the process exits with a non-zero status.
        const ALLOW_FAILURE = 0x01;
        /// Redirect stdout to the null device unless verbose mode is on.
        const STDOUT_IS_VERBOSE = 0x02;
    }
}

bitflags! {
    /// Flags controlling how a single argument is appended.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ArgFlags: u32 {
        /// The argument silences the child; it is kept when verbose mode
        /// is off and dropped when verbose is on.
        const QUIET = 0x01;
        /// Concatenate key and value without a separator. Implied when
        /// the key ends with `=`.
        const NOSPACE = 0x02;
    }
}

/// Default grace between a delivered console break and forced termination.
const DEFAULT_INTERRUPT_GRACE: Duration = Duration::from_secs(10);

/// Renders a value into the composed command line.
pub trait ProcessArg {
    fn render(&self, force_quote: bool) -> String;
}

impl ProcessArg for &str {
    fn render(&self, force_quote: bool) -> String {
        if force_quote {
            format!("\"{self}\"")
        } else {
            (*self).to_string()
        }
    }
}

impl ProcessArg for String {
    fn render(&self, force_quote: bool) -> String {
        self.as_str().render(force_quote)
    }
}

impl ProcessArg for &String {
    fn render(&self, force_quote: bool) -> String {
        self.as_str().render(force_quote)
    }
}

// paths are always quoted, whatever the caller asked for
impl ProcessArg for &Path {
    fn render(&self, _force_quote: bool) -> String {
        format!("\"{}\"", self.display())
    }
}

impl ProcessArg for PathBuf {
    fn render(&self, force_quote: bool) -> String {
        self.as_path().render(force_quote)
    }
}

impl ProcessArg for &PathBuf {
    fn render(&self, force_quote: bool) -> String {
        self.as_path().render(force_quote)
    }
}

/// A set of environment variables handed to a child process.
///
/// `None` on the process means "inherit the parent environment"; a set
/// `Env` replaces it wholesale.
#[derive(Debug, Clone, Default)]
pub struct Env(BTreeMap<String, String>);

impl Env {
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Captures the parent process environment.
    #[must_use]
    pub fn current() -> Self {
        Self(std::env::vars().collect())
    }

    /// Sets a variable.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Looks up a variable.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Iterates over all variables in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.0.iter()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Cloneable handle that requests a cooperative interrupt.
///
/// The join loop observes the flag within one wait quantum and delivers a
/// console break to the child exactly once.
#[derive(Debug, Clone)]
pub struct InterruptHandle(Arc<AtomicBool>);

impl InterruptHandle {
    /// Requests the interrupt. Idempotent.
    pub fn interrupt(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Returns whether an interrupt has been requested.
    #[must_use]
    pub fn is_interrupted(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// An external command: immutable-after-spawn configuration plus the
/// runtime state of one spawn cycle.
///
/// Dropping a running process joins it defensively, swallowing failure,
/// so a task that errors out mid-way does not leak its child.
pub struct Process {
    pub(super) name: String,
    pub(super) bin: PathBuf,
    pub(super) cwd: Option<PathBuf>,
    pub(super) cmd: String,
    pub(super) raw: Option<String>,
    pub(super) flags: ProcessFlags,
    pub(super) env: Option<Env>,
    pub(super) verbose: bool,
    pub(super) dry: bool,
    pub(super) interrupt: Arc<AtomicBool>,
    pub(super) interrupt_grace: Duration,
    pub(super) exit_code: i32,
    pub(super) stdout_data: Vec<u8>,
    pub(super) stderr_data: Vec<u8>,
    pub(super) child: Option<super::imp::Child>,
}

impl Default for Process {
    fn default() -> Self {
        Self::new()
    }
}

impl Process {
    #[must_use]
    pub fn new() -> Self {
        Self {
            name: String::new(),
            bin: PathBuf::new(),
            cwd: None,
            cmd: String::new(),
            raw: None,
            flags: ProcessFlags::empty(),
            env: None,
            verbose: false,
            dry: false,
            interrupt: Arc::new(AtomicBool::new(false)),
            interrupt_grace: DEFAULT_INTERRUPT_GRACE,
            exit_code: 0,
            stdout_data: Vec::new(),
            stderr_data: Vec::new(),
            child: None,
        }
    }

    /// Creates a process from a raw command string, passed to the shell
    /// verbatim.
    #[must_use]
    pub fn raw(command: impl Into<String>) -> Self {
        let mut p = Self::new();
        p.raw = Some(command.into());
        p
    }

    /// Combines two processes into one shell pipeline (`a | b`), switching
    /// to raw mode.
    #[must_use]
    pub fn pipe(first: Self, second: &Self) -> Self {
        let raw = format!("{} | {}", first.make_cmd(), second.make_cmd());
        let mut p = first;
        p.raw = Some(raw);
        p
    }

    /// Sets the display name used in logs and error messages.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the binary to execute.
    #[must_use]
    pub fn binary(mut self, path: impl Into<PathBuf>) -> Self {
        self.bin = path.into();
        self
    }

    /// Sets the working directory; created recursively before the spawn.
    #[must_use]
    pub fn cwd(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Replaces the process flags.
    #[must_use]
    pub const fn flags(mut self, flags: ProcessFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Adds a process flag.
    #[must_use]
    pub fn flag(mut self, flag: ProcessFlags) -> Self {
        self.flags |= flag;
        self
    }

    /// Replaces the child environment.
    #[must_use]
    pub fn env(mut self, env: Env) -> Self {
        self.env = Some(env);
        self
    }

    /// Sets verbose mode, which controls `QUIET` arguments and the
    /// `STDOUT_IS_VERBOSE` redirection. Set this before adding arguments.
    #[must_use]
    pub const fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Sets dry-run mode: `run()` logs the command and skips the spawn.
    #[must_use]
    pub const fn dry(mut self, dry: bool) -> Self {
        self.dry = dry;
        self
    }

    /// Adopts a shared interrupt flag (e.g. the task runner's Ctrl-C
    /// flag) instead of the process-private one.
    #[must_use]
    pub fn interrupt_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.interrupt = flag;
        self
    }

    /// Sets the grace period between console break and forced
    /// termination.
    #[must_use]
    pub const fn interrupt_grace(mut self, grace: Duration) -> Self {
        self.interrupt_grace = grace;
        self
    }

    /// Appends a bare argument.
    #[must_use]
    pub fn arg(mut self, value: impl ProcessArg) -> Self {
        self.add_arg("", &value.render(false), ArgFlags::empty());
        self
    }

    /// Appends a bare argument with flags.
    #[must_use]
    pub fn arg_flagged(mut self, value: impl ProcessArg, flags: ArgFlags) -> Self {
        self.add_arg("", &value.render(false), flags);
        self
    }

    /// Appends a `key value` argument pair.
    #[must_use]
    pub fn arg_pair(mut self, key: &str, value: impl ProcessArg) -> Self {
        self.add_arg(key, &value.render(false), ArgFlags::empty());
        self
    }

    /// Appends a `key value` argument pair with flags.
    #[must_use]
    pub fn arg_pair_flagged(mut self, key: &str, value: impl ProcessArg, flags: ArgFlags) -> Self {
        self.add_arg(key, &value.render(false), flags);
        self
    }

    /// Appends a `key value` argument pair, force-quoting the value.
    #[must_use]
    pub fn arg_pair_quoted(mut self, key: &str, value: impl ProcessArg) -> Self {
        self.add_arg(key, &value.render(true), ArgFlags::empty());
        self
    }

    fn add_arg(&mut self, key: &str, value: &str, flags: ArgFlags) {
        if flags.contains(ArgFlags::QUIET) && self.verbose {
            return;
        }

        if key.is_empty() && value.is_empty() {
            return;
        }

        if key.is_empty() {
            self.cmd.push(' ');
            self.cmd.push_str(value);
        } else if flags.contains(ArgFlags::NOSPACE) || key.ends_with('=') {
            self.cmd.push(' ');
            self.cmd.push_str(key);
            self.cmd.push_str(value);
        } else {
            self.cmd.push(' ');
            self.cmd.push_str(key);
            self.cmd.push(' ');
            self.cmd.push_str(value);
        }
    }

    /// Renders the full command line handed to the shell.
    #[must_use]
    pub fn make_cmd(&self) -> String {
        if let Some(raw) = &self.raw {
            return raw.clone();
        }

        let mut s = format!("\"{}\"{}", self.bin.display(), self.cmd);

        if self.flags.contains(ProcessFlags::STDOUT_IS_VERBOSE) && !self.verbose {
            s.push_str(if cfg!(windows) {
                " > NUL"
            } else {
                " > /dev/null"
            });
        }

        s
    }

    /// Returns the display name, falling back to the rendered command.
    #[must_use]
    pub fn make_name(&self) -> String {
        if self.name.is_empty() {
            self.make_cmd()
        } else {
            self.name.clone()
        }
    }

    /// Requests a cooperative interrupt. Idempotent.
    pub fn interrupt(&self) {
        self.interrupt.store(true, Ordering::SeqCst);
    }

    /// Returns a cloneable handle that can interrupt this process from
    /// another thread.
    #[must_use]
    pub fn interrupt_handle(&self) -> InterruptHandle {
        InterruptHandle(Arc::clone(&self.interrupt))
    }

    /// Exit code of the joined child (0 before any spawn).
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        self.exit_code
    }

    /// Bytes drained from the child's stdout during the join loop.
    #[must_use]
    pub fn stdout(&self) -> &[u8] {
        &self.stdout_data
    }

    /// Bytes drained from the child's stderr during the join loop.
    #[must_use]
    pub fn stderr(&self) -> &[u8] {
        &self.stderr_data
    }

    /// Spawns, joins, and returns the exit code.
    ///
    /// # Errors
    ///
    /// Propagates spawn and join failures.
    pub fn execute(&mut self) -> crate::error::Result<i32> {
        self.run()?;
        self.join()?;
        Ok(self.exit_code)
    }

    pub(super) fn interrupt_requested(&self) -> bool {
        self.interrupt.load(Ordering::SeqCst)
    }
}

impl Drop for Process {
    fn drop(&mut self) {
        // never let a failing join escape a destructor
        let _ = self.join();
    }
}

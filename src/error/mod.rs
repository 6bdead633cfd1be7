// smelter: third-party dependency build orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!             SmelterError (~24 bytes)
//!                    |
//!   +------+----+----+----+-----+----+----+
//!   |      |    |    |    |     |    |    |
//!   v      v    v    v    v     v    v    v
//! Bail   Pipe Proc  Cfg  Task  Net  Fs  Io/Other
//!        Box  Box   Box  Box   Box  Box Box<str>
//!
//! Sub-errors (unboxed internally):
//!   Pipe    CreateFailed, ReadFailed, WaitFailed (Windows)
//!   Process SpawnFailed, NonZeroExit, WaitFailed
//!   Config  ParseError, MissingKey, InvalidValue
//!   Task    NotFound, ExecutionFailed, Interrupted
//!   Network DownloadFailed, HttpError, Interrupted
//!   Fs      NotFound, IoError
//!
//! All variants boxed => SmelterError fits in 24 bytes.
//! ```

use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`SmelterError`].
pub type SmelterResult<T> = std::result::Result<T, SmelterError>;

/// Top-level application error type.
///
/// All sub-errors are boxed to keep this enum small on the stack.
#[derive(Debug, Error)]
pub enum SmelterError {
    /// Fatal error that should terminate the application.
    #[error("fatal error: {0}")]
    Bailed(Box<str>),

    /// Overlapped pipe error (Windows).
    #[error("pipe error: {0}")]
    Pipe(#[from] Box<PipeError>),

    /// Process execution error.
    #[error("process error: {0}")]
    Process(#[from] Box<ProcessError>),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] Box<ConfigError>),

    /// Task execution error.
    #[error("task error: {0}")]
    Task(#[from] Box<TaskError>),

    /// Network operation failed.
    #[error("network error: {0}")]
    Network(#[from] Box<NetworkError>),

    /// Filesystem error.
    #[error("filesystem error: {0}")]
    Fs(#[from] Box<FsError>),

    /// I/O error.
    #[error("io error: {0}")]
    Io(Box<std::io::Error>),

    /// Generic error with message.
    #[error("{0}")]
    Other(Box<str>),
}

/// Create a fatal [`SmelterError::Bailed`] that terminates the current task.
pub fn bail_out(message: impl Into<String>) -> SmelterError {
    SmelterError::Bailed(message.into().into_boxed_str())
}

// --- From implementations for boxing ---

/// Macro to generate `From` implementations that box the source error.
macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for SmelterError {
                fn from(err: $error) -> Self {
                    SmelterError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    PipeError => Pipe,
    ProcessError => Process,
    ConfigError => Config,
    TaskError => Task,
    NetworkError => Network,
    FsError => Fs,
    std::io::Error => Io,
}

// --- Pipe Errors (Windows) ---

/// Overlapped named-pipe errors.
///
/// These carry the OS error as a source so the numeric code survives
/// up the chain.
#[derive(Debug, Error)]
pub enum PipeError {
    /// `CreateNamedPipe` failed.
    #[error("failed to create named pipe '{name}'")]
    CreateFailed {
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// Duplicating the read-side handle failed.
    #[error("failed to duplicate pipe handle")]
    DuplicateFailed(#[source] std::io::Error),

    /// Opening the write side of the pipe failed.
    #[error("failed to open write side of pipe '{name}'")]
    OpenWriteFailed {
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// Creating the completion event failed.
    #[error("failed to create pipe event")]
    EventFailed(#[source] std::io::Error),

    /// An overlapped read failed with an unexpected error.
    #[error("pipe read failed")]
    ReadFailed(#[source] std::io::Error),

    /// Waiting on the completion event failed.
    #[error("failed to wait on pipe event")]
    WaitFailed(#[source] std::io::Error),

    /// Querying the overlapped result failed with an unexpected error.
    #[error("failed to query overlapped result")]
    OverlappedFailed(#[source] std::io::Error),
}

// --- Process Errors ---

/// Process execution errors.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Executable not found in PATH.
    #[error("executable not found: '{name}' (not in PATH)")]
    ExecutableNotFound { name: String },

    /// Failed to spawn the child via the shell.
    #[error("failed to start '{shell}'")]
    SpawnFailed {
        shell: String,
        #[source]
        source: std::io::Error,
    },

    /// Process exited with a code outside the allowed set.
    #[error("{name} returned {code}")]
    NonZeroExit { name: String, code: i32 },

    /// Waiting on the process handle failed.
    #[error("failed to wait on process '{name}'")]
    WaitFailed {
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// Reading the exit code failed.
    #[error("failed to read exit code of '{name}'")]
    ExitCodeFailed {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

// --- Config Errors ---

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse configuration file.
    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: String, message: String },

    /// Missing required configuration key.
    #[error("missing required config key '{key}' in section '[{section}]'")]
    MissingKey { section: String, key: String },

    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },
}

// --- Task Errors ---

/// Task execution errors.
#[derive(Debug, Error)]
pub enum TaskError {
    /// Task was not found.
    #[error("task '{0}' not found")]
    NotFound(String),

    /// Task execution failed.
    #[error("task '{name}' failed: {message}")]
    ExecutionFailed { name: String, message: String },

    /// Task was interrupted.
    #[error("task '{0}' was interrupted")]
    Interrupted(String),
}

// --- Network Errors ---

/// Network operation errors.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// Download failed.
    #[error("download failed: {url} - {message}")]
    DownloadFailed { url: String, message: String },

    /// Download was interrupted by user or signal.
    #[error("download interrupted")]
    Interrupted,

    /// HTTP error response.
    #[error("http error {status}: {url}")]
    HttpError { status: u16, url: String },

    /// Error from reqwest library.
    #[error("reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),

    /// I/O error during download.
    #[error("io error during download: {0}")]
    Io(#[from] std::io::Error),
}

// --- Filesystem Errors ---

/// Filesystem operation errors.
#[derive(Debug, Error)]
pub enum FsError {
    /// Path not found.
    #[error("path not found: {0}")]
    NotFound(String),

    /// General I/O error.
    #[error("I/O error on '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

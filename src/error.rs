//! Error types shared across components
//!
//! Every component absorbs its own failures (logging and falling back to
//! defaults), so these types stay inside the seams that produce them.

use std::path::PathBuf;
use thiserror::Error;

/// Problems found while reading or interpreting the config file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found ({})", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid color value: {0:?}")]
    InvalidColor(String),

    #[error("palette index out of range: {0}")]
    PaletteIndex(i64),

    #[error("invalid number for {option}: {value:?}")]
    InvalidNumber { option: &'static str, value: String },
}

/// Failures starting a child process or cloning the window
#[derive(Debug, Error)]
pub enum SpawnError {
    #[error("SHELL is not set in the environment")]
    NoShell,

    #[error("unable to open pty: {0}")]
    Pty(String),

    #[error("unable to spawn {program}: {reason}")]
    Spawn { program: String, reason: String },

    #[error("cloning the terminal failed: {0}")]
    Clone(#[from] std::io::Error),
}

/// Returned when a binding names an action the dispatcher does not know
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ActionError {
    #[error("unknown action: {0}")]
    Unknown(String),
}

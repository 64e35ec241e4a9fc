//! tabterm - a small tabbed terminal
//!
//! Reads a line-oriented config file into settings and key bindings, runs a
//! shell per tab, and routes key chords to tab jumps, built-in actions or
//! injected text.

pub mod actions;
pub mod app;
pub mod bindings;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod session;
pub mod ui;

// Re-exports
pub use actions::Action;
pub use app::{AppContext, AppEvent, Options};
pub use bindings::{route, Binding, BindingTable, KeyPress, Route};
pub use config::{ConfigLoader, ConfigStore, Settings};
pub use core::{RenderSurface, SpawnRequest, TerminalFactory, WindowLauncher};
pub use error::{ActionError, ConfigError, SpawnError};
pub use session::{Session, SessionId, SessionManager, SessionState};

/// Result type alias
pub type Result<T> = anyhow::Result<T>;

//! Boundary to the terminal widget and process spawning
//!
//! The application never touches a PTY or a screen buffer directly; it only
//! talks to these traits. `core::pty` provides the real implementation.

use crate::config::{FontSpec, Palette, Settings};
use crate::error::SpawnError;
use crate::session::SessionId;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// One terminal widget with its child process
pub trait RenderSurface {
    /// Apply colors, cursor and word-char settings
    fn configure(&mut self, settings: &Settings, palette: &Palette);

    /// Switch font; returns `false` if the backend rejects it
    fn set_font(&mut self, font: &FontSpec) -> bool;

    /// Write raw bytes to the child's input
    fn feed_child(&mut self, data: &[u8]);

    /// Put the current selection on the clipboard. Surfaces without mouse
    /// selection copy the most recent non-empty output line instead.
    fn copy_clipboard(&mut self);

    /// Feed clipboard text to the child
    fn paste_clipboard(&mut self);

    /// Working directory of the child as a `file://` URI, if known
    fn current_directory_uri(&self) -> Option<String>;

    /// Title the child asked for, if any
    fn window_title(&self) -> Option<String>;

    fn resize(&mut self, cols: u16, rows: u16);

    /// Kill the child. Its exit is still reported afterwards.
    fn terminate(&mut self);
}

/// What to run inside a new surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnRequest {
    /// Empty when no shell could be determined; the spawn then fails
    pub argv: Vec<String>,
    pub working_dir: PathBuf,
    pub env: Vec<(String, String)>,
}

impl SpawnRequest {
    /// `$SHELL`, or `$SHELL -c <command>` when a command is given
    pub fn shell(shell: Option<String>, command: Option<&str>, working_dir: PathBuf) -> Self {
        let argv = match (shell, command) {
            (Some(shell), Some(command)) => vec![shell, "-c".to_string(), command.to_string()],
            (Some(shell), None) => vec![shell],
            (None, _) => Vec::new(),
        };
        Self {
            argv,
            working_dir,
            env: Vec::new(),
        }
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }
}

/// Creates surfaces. Spawning is asynchronous: `create` returns at once and
/// the outcome arrives later as an `AppEvent::SpawnFinished`.
pub trait TerminalFactory {
    type Surface: RenderSurface;

    fn create(&mut self, session: SessionId, request: &SpawnRequest) -> Self::Surface;
}

/// Starts a new top-level instance of the program
pub trait WindowLauncher {
    /// Start `argv` in `cwd` without waiting for it; returns the new PID
    fn launch(&mut self, argv: &[OsString], cwd: Option<&Path>) -> Result<u32, SpawnError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shell_request() {
        let req = SpawnRequest::shell(Some("/bin/zsh".into()), None, PathBuf::from("/tmp"));
        assert_eq!(req.argv, vec!["/bin/zsh"]);

        let req = SpawnRequest::shell(Some("/bin/zsh".into()), Some("htop"), PathBuf::from("/"));
        assert_eq!(req.argv, vec!["/bin/zsh", "-c", "htop"]);

        let req = SpawnRequest::shell(None, Some("htop"), PathBuf::from("/"));
        assert!(req.argv.is_empty());
    }
}

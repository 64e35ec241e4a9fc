//! Core engine - surface traits, PTY-backed surfaces, window cloning

mod launcher;
mod output;
mod pty;
mod surface;

pub use launcher::{uri_to_path, ProcessLauncher};
pub use output::OutputBuffer;
pub use pty::{PtyFactory, PtySurface, SurfaceColors};
pub use surface::{RenderSurface, SpawnRequest, TerminalFactory, WindowLauncher};

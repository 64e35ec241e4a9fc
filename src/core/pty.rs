//! PTY-backed surfaces - spawn a shell and collect its output

use super::output::OutputBuffer;
use super::surface::{RenderSurface, SpawnRequest, TerminalFactory};
use crate::app::AppEvent;
use crate::config::{CursorShape, FontSpec, Palette, Rgb, Settings};
use crate::error::SpawnError;
use crate::session::SessionId;
use portable_pty::{native_pty_system, Child, ChildKiller, CommandBuilder, MasterPty, PtySize};
use std::io::{ErrorKind, Read, Write};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;

/// State shared between a surface and its reader thread
struct PtyShared {
    master: Option<Box<dyn MasterPty + Send>>,
    writer: Option<Box<dyn Write + Send>>,
    child: Option<Box<dyn Child + Send + Sync>>,
    /// Input typed before the child was up
    pending_input: Vec<u8>,
    output: OutputBuffer,
    title: Option<String>,
    size: (u16, u16),
    terminated: bool,
}

impl Default for PtyShared {
    fn default() -> Self {
        Self {
            master: None,
            writer: None,
            child: None,
            pending_input: Vec::new(),
            output: OutputBuffer::new(),
            title: None,
            size: (80, 24),
            terminated: false,
        }
    }
}

fn lock(shared: &Mutex<PtyShared>) -> MutexGuard<'_, PtyShared> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

fn pty_size((cols, rows): (u16, u16)) -> PtySize {
    PtySize {
        rows,
        cols,
        pixel_width: 0,
        pixel_height: 0,
    }
}

/// Colors a surface draws with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceColors {
    pub foreground: Rgb,
    pub background: Rgb,
    pub cursor: Rgb,
    pub cursor_shape: CursorShape,
}

impl Default for SurfaceColors {
    fn default() -> Self {
        Self {
            foreground: Rgb::WHITE,
            background: Rgb::BLACK,
            cursor: Rgb::WHITE,
            cursor_shape: CursorShape::Block,
        }
    }
}

/// One shell in a PTY
pub struct PtySurface {
    session: SessionId,
    shared: Arc<Mutex<PtyShared>>,
    colors: SurfaceColors,
    font: Option<FontSpec>,
}

impl PtySurface {
    pub fn session(&self) -> SessionId {
        self.session
    }

    /// The last `n` lines of output
    pub fn lines(&self, n: usize) -> Vec<String> {
        lock(&self.shared).output.tail(n)
    }

    pub fn colors(&self) -> SurfaceColors {
        self.colors
    }

    pub fn font(&self) -> Option<&FontSpec> {
        self.font.as_ref()
    }

    fn pid(&self) -> Option<u32> {
        lock(&self.shared).child.as_ref().and_then(|c| c.process_id())
    }
}

impl RenderSurface for PtySurface {
    fn configure(&mut self, settings: &Settings, palette: &Palette) {
        self.colors = SurfaceColors {
            foreground: settings.foreground,
            background: settings.background,
            cursor: settings.cursor,
            cursor_shape: settings.cursor_shape,
        };
        log::debug!(
            "session {}: fg {} bg {} ({} palette overrides)",
            self.session,
            settings.foreground,
            settings.background,
            palette.override_count()
        );
    }

    fn set_font(&mut self, font: &FontSpec) -> bool {
        if font.size <= 0 {
            return false;
        }
        self.font = Some(font.clone());
        true
    }

    fn feed_child(&mut self, data: &[u8]) {
        let mut shared = lock(&self.shared);
        match shared.writer.as_mut() {
            Some(writer) => {
                if let Err(e) = writer.write_all(data).and_then(|_| writer.flush()) {
                    log::warn!("session {}: write failed: {}", self.session, e);
                }
            }
            None => shared.pending_input.extend_from_slice(data),
        }
    }

    fn copy_clipboard(&mut self) {
        let text = match lock(&self.shared).output.last_line() {
            Some(text) => text.to_string(),
            None => return,
        };
        let result = arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text));
        if let Err(e) = result {
            log::warn!("clipboard copy failed: {}", e);
        }
    }

    fn paste_clipboard(&mut self) {
        match arboard::Clipboard::new().and_then(|mut clipboard| clipboard.get_text()) {
            Ok(text) => self.feed_child(text.as_bytes()),
            Err(e) => log::warn!("clipboard paste failed: {}", e),
        }
    }

    fn current_directory_uri(&self) -> Option<String> {
        let pid = self.pid()?;
        let dir = std::fs::read_link(format!("/proc/{}/cwd", pid)).ok()?;
        Some(format!("file://{}", dir.display()))
    }

    fn window_title(&self) -> Option<String> {
        lock(&self.shared).title.clone()
    }

    fn resize(&mut self, cols: u16, rows: u16) {
        let mut shared = lock(&self.shared);
        shared.size = (cols, rows);
        if let Some(master) = shared.master.as_ref() {
            if let Err(e) = master.resize(pty_size((cols, rows))) {
                log::debug!("session {}: resize failed: {}", self.session, e);
            }
        }
    }

    fn terminate(&mut self) {
        let mut shared = lock(&self.shared);
        shared.terminated = true;
        shared.writer = None;
        if let Some(child) = shared.child.as_mut() {
            if let Err(e) = child.kill() {
                log::debug!("session {}: kill failed: {}", self.session, e);
            }
        }
    }
}

/// Spawns shells on the blocking pool and reports back over a channel
pub struct PtyFactory {
    runtime: Handle,
    events: UnboundedSender<AppEvent>,
}

impl PtyFactory {
    /// Must be called from inside a tokio runtime
    pub fn new(events: UnboundedSender<AppEvent>) -> anyhow::Result<Self> {
        Ok(Self {
            runtime: Handle::try_current()?,
            events,
        })
    }
}

impl TerminalFactory for PtyFactory {
    type Surface = PtySurface;

    fn create(&mut self, session: SessionId, request: &SpawnRequest) -> PtySurface {
        let shared = Arc::new(Mutex::new(PtyShared::default()));

        let thread_shared = Arc::clone(&shared);
        let request = request.clone();
        let events = self.events.clone();
        self.runtime.spawn_blocking(move || {
            let reader = match start_child(&request, &thread_shared) {
                Ok((pid, reader)) => {
                    let _ = events.send(AppEvent::SpawnFinished {
                        session,
                        result: Ok(pid),
                    });
                    reader
                }
                Err(e) => {
                    let _ = events.send(AppEvent::SpawnFinished {
                        session,
                        result: Err(e.to_string()),
                    });
                    return;
                }
            };
            pump_output(session, reader, &thread_shared, &events);
            let _ = events.send(AppEvent::ChildExited { session });
        });

        PtySurface {
            session,
            shared,
            colors: SurfaceColors::default(),
            font: None,
        }
    }
}

fn start_child(
    request: &SpawnRequest,
    shared: &Mutex<PtyShared>,
) -> Result<(u32, Box<dyn Read + Send>), SpawnError> {
    let (program, args) = request.argv.split_first().ok_or(SpawnError::NoShell)?;

    let mut cmd = CommandBuilder::new(program);
    cmd.args(args);
    cmd.cwd(&request.working_dir);
    cmd.env("TERM", "dumb");
    for (key, value) in &request.env {
        cmd.env(key, value);
    }

    let size = lock(shared).size;
    let pair = native_pty_system()
        .openpty(pty_size(size))
        .map_err(|e| SpawnError::Pty(e.to_string()))?;
    let mut child = pair
        .slave
        .spawn_command(cmd)
        .map_err(|e| SpawnError::Spawn {
            program: program.clone(),
            reason: e.to_string(),
        })?;
    drop(pair.slave);

    let reader = pair
        .master
        .try_clone_reader()
        .map_err(|e| SpawnError::Pty(e.to_string()))?;
    let mut writer = pair
        .master
        .take_writer()
        .map_err(|e| SpawnError::Pty(e.to_string()))?;
    let pid = child.process_id().unwrap_or(0);

    let mut guard = lock(shared);
    if guard.terminated {
        // Closed while still starting
        let _ = child.kill();
    } else if !guard.pending_input.is_empty() {
        let input = std::mem::take(&mut guard.pending_input);
        if let Err(e) = writer.write_all(&input) {
            log::warn!("early input lost: {}", e);
        }
    }
    if guard.size != size {
        let _ = pair.master.resize(pty_size(guard.size));
    }
    guard.master = Some(pair.master);
    guard.writer = Some(writer);
    guard.child = Some(child);
    Ok((pid, reader))
}

fn pump_output(
    session: SessionId,
    mut reader: Box<dyn Read + Send>,
    shared: &Mutex<PtyShared>,
    events: &UnboundedSender<AppEvent>,
) {
    let mut buf = [0u8; 4096];
    loop {
        match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => {
                let mut guard = lock(shared);
                if let Some(title) = guard.output.push_bytes(&buf[..n]) {
                    guard.title = Some(title);
                    drop(guard);
                    let _ = events.send(AppEvent::TitleChanged { session });
                }
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => {
                log::debug!("session {}: read ended: {}", session, e);
                break;
            }
        }
    }

    if let Some(child) = lock(shared).child.as_mut() {
        match child.try_wait() {
            Ok(Some(status)) => log::debug!("session {}: child exited ({:?})", session, status),
            Ok(None) => log::debug!("session {}: output closed, child still running", session),
            Err(e) => log::debug!("session {}: wait failed: {}", session, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::path::PathBuf;
    use std::time::Duration;
    use tokio::sync::mpsc;

    async fn next_event(rx: &mut mpsc::UnboundedReceiver<AppEvent>) -> AppEvent {
        tokio::time::timeout(Duration::from_secs(10), rx.recv())
            .await
            .expect("timed out waiting for event")
            .expect("channel closed")
    }

    #[tokio::test]
    async fn test_missing_shell_fails_spawn() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut factory = PtyFactory::new(tx).unwrap();
        let request = SpawnRequest::shell(None, None, PathBuf::from("/"));
        let _surface = factory.create(7, &request);

        match next_event(&mut rx).await {
            AppEvent::SpawnFinished { session, result } => {
                assert_eq!(session, 7);
                assert!(result.is_err());
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_command_output_and_exit() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut factory = PtyFactory::new(tx).unwrap();
        let request = SpawnRequest::shell(
            Some("/bin/sh".into()),
            Some("printf 'hello\\n'"),
            std::env::temp_dir(),
        );
        let surface = factory.create(1, &request);

        loop {
            match next_event(&mut rx).await {
                AppEvent::SpawnFinished { result, .. } => assert!(result.is_ok()),
                AppEvent::ChildExited { session } => {
                    assert_eq!(session, 1);
                    break;
                }
                _ => {}
            }
        }
        assert!(surface.lines(10).iter().any(|l| l == "hello"));
    }

    /// Hands out one queued chunk per read
    struct ChunkReader(VecDeque<Vec<u8>>);

    impl Read for ChunkReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            match self.0.pop_front() {
                Some(chunk) => {
                    buf[..chunk.len()].copy_from_slice(&chunk);
                    Ok(chunk.len())
                }
                None => Ok(0),
            }
        }
    }

    #[test]
    fn test_multibyte_char_split_between_reads() {
        let shared = Mutex::new(PtyShared::default());
        let (tx, _rx) = mpsc::unbounded_channel();
        let chunks = VecDeque::from(vec![b"caf\xc3".to_vec(), b"\xa9\r\n".to_vec()]);

        pump_output(3, Box::new(ChunkReader(chunks)), &shared, &tx);

        let guard = lock(&shared);
        let output = &guard.output;
        assert_eq!(output.tail(2), vec!["café", ""]);
        assert_eq!(output.last_line(), Some("café"));
    }

    #[test]
    fn test_font_size_must_be_positive() {
        let mut surface = PtySurface {
            session: 1,
            shared: Arc::new(Mutex::new(PtyShared::default())),
            colors: SurfaceColors::default(),
            font: None,
        };
        assert!(!surface.set_font(&Settings::default().font.with_size(0)));
        assert!(surface.set_font(&Settings::default().font.with_size(12)));
        assert_eq!(surface.font().map(|f| f.size), Some(12));

        // input before the child is up is held back
        surface.feed_child(b"ls\r");
        assert_eq!(lock(&surface.shared).pending_input, b"ls\r");
    }
}

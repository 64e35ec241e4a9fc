//! UI layer - TUI host and the terminal view

mod input;
mod view;

pub use input::encode_key;
pub use view::render;

use crate::app::{AppContext, AppEvent};
use crate::bindings::KeyPress;
use crate::core::{PtyFactory, RenderSurface};
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEvent, KeyEventKind},
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
    },
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;

const POLL_INTERVAL: Duration = Duration::from_millis(30);

/// Main TUI controller
pub struct TUI {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    title: String,
}

impl TUI {
    pub fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self {
            terminal,
            title: String::new(),
        })
    }

    pub fn terminal(&mut self) -> &mut Terminal<CrosstermBackend<io::Stdout>> {
        &mut self.terminal
    }

    /// Update the window title when it changed
    pub fn set_title(&mut self, title: &str) -> Result<()> {
        if self.title != title {
            execute!(self.terminal.backend_mut(), SetTitle(title))?;
            self.title = title.to_string();
        }
        Ok(())
    }

    /// Drive the application until it asks to quit
    pub fn run(
        &mut self,
        app: &mut AppContext<PtyFactory>,
        events: &mut UnboundedReceiver<AppEvent>,
    ) -> Result<()> {
        let size = self.terminal.size()?;
        app.handle(AppEvent::Resize {
            cols: size.width,
            rows: size.height,
        });

        while !app.should_quit {
            // Surface events first: spawn results, exits, titles
            while let Ok(event) = events.try_recv() {
                app.handle(event);
            }
            if app.should_quit {
                break;
            }

            self.set_title(app.title())?;
            self.terminal.draw(|f| render(f, app))?;

            if !event::poll(POLL_INTERVAL)? {
                continue;
            }
            match event::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => on_key(app, &key),
                Event::Resize(cols, rows) => {
                    app.handle(AppEvent::Resize { cols, rows });
                }
                _ => {}
            }
        }
        Ok(())
    }
}

/// Route a key press; anything that is not a chord goes to the child
fn on_key(app: &mut AppContext<PtyFactory>, key: &KeyEvent) {
    let handled = KeyPress::from_event(key)
        .map(|press| app.handle(AppEvent::KeyPress(press)))
        .unwrap_or(false);
    if handled {
        return;
    }
    let bytes = encode_key(key);
    if bytes.is_empty() {
        return;
    }
    if let Some(session) = app.sessions_mut().active_mut() {
        session.surface.feed_child(&bytes);
    }
}

impl Drop for TUI {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

//! Application state and event dispatch
//!
//! `AppContext` owns everything mutable: config, bindings and sessions.
//! The host feeds it [`AppEvent`]s one at a time from a single thread.

use crate::bindings::{route, BindingTable, KeyPress, Route};
use crate::config::{ConfigLoader, ConfigStore, OptionMatching, APP_NAME};
use crate::core::{RenderSurface, SpawnRequest, TerminalFactory, WindowLauncher};
use crate::session::{SessionId, SessionManager, TabStrip};
use std::collections::VecDeque;
use std::ffi::OsString;
use std::path::PathBuf;

/// Everything that can happen to the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    KeyPress(KeyPress),
    ChildExited { session: SessionId },
    /// Outcome of an asynchronous spawn: PID or a diagnostic
    SpawnFinished {
        session: SessionId,
        result: Result<u32, String>,
    },
    TitleChanged { session: SessionId },
    TabAdded { index: usize },
    TabSwitched { index: usize },
    Resize { cols: u16, rows: u16 },
}

/// Startup options, normally from the command line
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Explicit config file; `None` means the default location
    pub config_path: Option<PathBuf>,
    pub working_dir: Option<PathBuf>,
    /// Run this through `$SHELL -c` instead of an interactive shell
    pub command: Option<String>,
    /// Fixed window title; disables live title updates
    pub title: Option<String>,
    pub debug: bool,
    pub matching: OptionMatching,
    /// Arguments the program was started with, reused by new-window
    pub argv: Vec<OsString>,
}

/// State that outlives individual sessions
#[derive(Debug, Clone)]
pub(crate) struct ProcessState {
    pub(crate) config_path: Option<PathBuf>,
    pub(crate) working_dir: Option<PathBuf>,
    pub(crate) command: Option<String>,
    pub(crate) fixed_title: Option<String>,
    pub(crate) argv: Vec<OsString>,
}

/// Application context - the single owner of all mutable state
pub struct AppContext<F: TerminalFactory> {
    pub(crate) factory: F,
    pub(crate) launcher: Box<dyn WindowLauncher>,
    pub(crate) loader: ConfigLoader,
    pub(crate) store: ConfigStore,
    pub(crate) bindings: BindingTable,
    pub(crate) sessions: SessionManager<F::Surface>,
    pub(crate) process: ProcessState,
    /// Live font size, shared by all tabs
    pub(crate) font_size: i32,
    title: String,
    tab_strip: Option<TabStrip>,
    size: (u16, u16),
    pending: VecDeque<AppEvent>,
    pub should_quit: bool,
}

impl<F: TerminalFactory> AppContext<F> {
    /// Load the config and open the first session
    pub fn new(factory: F, launcher: Box<dyn WindowLauncher>, options: Options) -> Self {
        let loader = ConfigLoader::new(options.matching);
        let (store, bindings) = loader.load(options.config_path.as_deref());
        if options.debug {
            log::debug!("effective settings: {}", store.to_json());
        }

        let title = options
            .title
            .clone()
            .unwrap_or_else(|| APP_NAME.to_string());
        let font_size = store.settings.font.size;

        let mut app = Self {
            factory,
            launcher,
            loader,
            store,
            bindings,
            sessions: SessionManager::new(),
            process: ProcessState {
                config_path: options.config_path,
                working_dir: options.working_dir,
                command: options.command,
                fixed_title: options.title,
                argv: options.argv,
            },
            font_size,
            title,
            tab_strip: None,
            size: (80, 24),
            pending: VecDeque::new(),
            should_quit: false,
        };
        app.open_session();
        app.drain();
        app
    }

    /// Handle one event and everything it triggers.
    ///
    /// Returns `true` when a key press was consumed as a chord.
    pub fn handle(&mut self, event: AppEvent) -> bool {
        let handled = self.dispatch(event);
        self.drain();
        handled
    }

    /// Dispatch queued follow-up events until the queue is empty
    pub(crate) fn drain(&mut self) {
        while let Some(event) = self.pending.pop_front() {
            self.dispatch(event);
        }
    }

    fn dispatch(&mut self, event: AppEvent) -> bool {
        match event {
            AppEvent::KeyPress(press) => return self.on_key_press(&press),
            AppEvent::ChildExited { session } => self.on_child_exited(session),
            AppEvent::SpawnFinished { session, result } => match result {
                Ok(pid) => {
                    log::debug!("{} started. (PID: {})", APP_NAME, pid);
                    self.sessions.mark_running(session, pid);
                }
                Err(message) => log::error!("An error occurred: {}", message),
            },
            AppEvent::TitleChanged { session } => self.on_title_changed(session),
            AppEvent::TabAdded { index } => {
                if let Some(index) = self.sessions.select(index as i64) {
                    self.pending.push_back(AppEvent::TabSwitched { index });
                } else {
                    self.relabel();
                }
            }
            AppEvent::TabSwitched { .. } => self.relabel(),
            AppEvent::Resize { cols, rows } => {
                self.size = (cols, rows);
                self.resize_surfaces();
            }
        }
        false
    }

    fn on_key_press(&mut self, press: &KeyPress) -> bool {
        match route(press, self.store.settings.action_modifier, &self.bindings) {
            Route::Unhandled => false,
            Route::SwitchTab(index) => {
                if let Some(index) = self.sessions.select(index) {
                    self.pending.push_back(AppEvent::TabSwitched { index });
                }
                true
            }
            Route::Internal(name) => {
                if let Err(e) = self.dispatch_action(&name) {
                    log::warn!("{}", e);
                }
                true
            }
            Route::Inject(text) => {
                if let Some(session) = self.sessions.active_mut() {
                    session.surface.feed_child(text.as_bytes());
                }
                true
            }
        }
    }

    fn on_child_exited(&mut self, session: SessionId) {
        if self.sessions.take_pending_close(session) {
            return;
        }
        if self.sessions.get(session).is_none() {
            return;
        }
        if self.sessions.len() == 1 {
            log::debug!("last session exited");
            self.quit();
            return;
        }
        if let Some(index) = self.sessions.remove(session) {
            self.pending.push_back(AppEvent::TabSwitched { index });
        }
    }

    fn on_title_changed(&mut self, session: SessionId) {
        self.title = match &self.process.fixed_title {
            Some(fixed) => fixed.clone(),
            None => self
                .sessions
                .get(session)
                .and_then(|s| s.surface.window_title())
                .unwrap_or_else(|| APP_NAME.to_string()),
        };
    }

    /// Create a session, configure it and queue its activation
    pub(crate) fn open_session(&mut self) {
        let id = self.sessions.allocate_id();
        let request = self.spawn_request();
        log::debug!("shell: {:?}", request.argv);
        log::debug!("workdir: {}", request.working_dir.display());

        let mut surface = self.factory.create(id, &request);
        self.configure(&mut surface);
        let (cols, rows) = self.terminal_size();
        surface.resize(cols, rows);

        let index = self.sessions.push(id, surface);
        self.pending.push_back(AppEvent::TabAdded { index });
    }

    fn spawn_request(&mut self) -> SpawnRequest {
        // First spawn pins the working directory for later tabs
        let working_dir = self
            .process
            .working_dir
            .get_or_insert_with(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/")))
            .clone();
        let request = SpawnRequest::shell(
            std::env::var("SHELL").ok(),
            self.process.command.as_deref(),
            working_dir,
        );
        let locale = &self.store.settings.locale;
        if locale.is_empty() {
            request
        } else {
            request.with_env("LC_NUMERIC", locale.clone())
        }
    }

    /// Apply settings, palette and configured font size to a surface
    pub(crate) fn configure(&mut self, surface: &mut F::Surface) {
        if let Some(size) = configure_surface(&mut self.store, surface) {
            self.font_size = size;
        }
    }

    /// Re-run [`Self::configure`] on the active session only
    pub(crate) fn reconfigure_active(&mut self) {
        if let Some(session) = self.sessions.active_mut() {
            if let Some(size) = configure_surface(&mut self.store, &mut session.surface) {
                self.font_size = size;
            }
        }
    }

    /// Set the live font size on the active session
    pub(crate) fn set_font_size(&mut self, size: i32) {
        let font = self.store.settings.font.with_size(size);
        if let Some(session) = self.sessions.active_mut() {
            if session.surface.set_font(&font) {
                self.font_size = size;
            } else {
                log::debug!("font {:?} rejected", font.describe());
            }
        }
    }

    pub(crate) fn queue(&mut self, event: AppEvent) {
        self.pending.push_back(event);
    }

    fn relabel(&mut self) {
        let had_strip = self.tab_strip.is_some();
        self.tab_strip = self.sessions.tab_strip();
        if had_strip != self.tab_strip.is_some() {
            self.resize_surfaces();
        }
    }

    /// Rows left for terminals once the tab strip is placed
    pub fn terminal_size(&self) -> (u16, u16) {
        let (cols, rows) = self.size;
        let strip = u16::from(self.sessions.tab_strip().is_some());
        (cols, rows.saturating_sub(strip).max(1))
    }

    fn resize_surfaces(&mut self) {
        let (cols, rows) = self.terminal_size();
        for session in self.sessions.iter_mut() {
            session.surface.resize(cols, rows);
        }
    }

    pub(crate) fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Kill every child before the host exits
    pub fn shutdown(&mut self) {
        self.sessions.terminate_all();
    }

    pub fn settings(&self) -> &crate::config::Settings {
        &self.store.settings
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    pub fn bindings(&self) -> &BindingTable {
        &self.bindings
    }

    pub fn sessions(&self) -> &SessionManager<F::Surface> {
        &self.sessions
    }

    pub fn sessions_mut(&mut self) -> &mut SessionManager<F::Surface> {
        &mut self.sessions
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    pub fn font_size(&self) -> i32 {
        self.font_size
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn tab_strip(&self) -> Option<TabStrip> {
        self.tab_strip
    }
}

/// Returns the font size when the surface accepted the configured font
fn configure_surface<S: RenderSurface>(store: &mut ConfigStore, surface: &mut S) -> Option<i32> {
    store.palette.reapply();
    surface.configure(&store.settings, &store.palette);
    let font = &store.settings.font;
    surface.set_font(font).then_some(font.size)
}

//! Internal actions - the named behaviors a binding can trigger

use crate::app::{AppContext, AppEvent};
use crate::config::default_config_path;
use crate::core::{uri_to_path, RenderSurface, TerminalFactory};
use crate::error::ActionError;
use crate::session::CloseOutcome;
use std::fmt;
use std::str::FromStr;

/// Every action name the dispatcher recognizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Copy,
    Paste,
    ReloadConfig,
    DefaultConfig,
    NewTab,
    NewWindow,
    Exit,
    IncFontSize,
    DecFontSize,
    DefaultFontSize,
    NextTab,
    PrevTab,
    CloseTab,
}

impl Action {
    pub const ALL: [Action; 13] = [
        Action::Copy,
        Action::Paste,
        Action::ReloadConfig,
        Action::DefaultConfig,
        Action::NewTab,
        Action::NewWindow,
        Action::Exit,
        Action::IncFontSize,
        Action::DecFontSize,
        Action::DefaultFontSize,
        Action::NextTab,
        Action::PrevTab,
        Action::CloseTab,
    ];

    /// Name as written in `bindi` lines
    pub const fn as_str(self) -> &'static str {
        match self {
            Action::Copy => "copy",
            Action::Paste => "paste",
            Action::ReloadConfig => "reload-config",
            Action::DefaultConfig => "default-config",
            Action::NewTab => "new-tab",
            Action::NewWindow => "new-window",
            Action::Exit => "exit",
            Action::IncFontSize => "inc-font-size",
            Action::DecFontSize => "dec-font-size",
            Action::DefaultFontSize => "default-font-size",
            Action::NextTab => "next-tab",
            Action::PrevTab => "prev-tab",
            Action::CloseTab => "close-tab",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = ActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| ActionError::Unknown(s.to_string()))
    }
}

/// Action dispatcher: runs a named action against the active session
impl<F: TerminalFactory> AppContext<F> {
    /// Run `name`; unknown names are reported back so the caller may treat
    /// the text some other way
    pub fn dispatch_action(&mut self, name: &str) -> Result<(), ActionError> {
        let action = name.parse::<Action>()?;
        self.run_action(action);
        Ok(())
    }

    /// Run `action` and settle the tab events it queues
    pub fn run_action(&mut self, action: Action) {
        match action {
            Action::Copy => {
                if let Some(session) = self.sessions.active_mut() {
                    session.surface.copy_clipboard();
                }
            }
            Action::Paste => {
                if let Some(session) = self.sessions.active_mut() {
                    session.surface.paste_clipboard();
                }
            }
            Action::ReloadConfig => {
                log::debug!("Reloading configuration file...");
                let path = self.process.config_path.clone().or_else(default_config_path);
                if let Some(path) = path {
                    if let Err(e) = self.loader.load_file(&path, &mut self.store, &mut self.bindings)
                    {
                        log::debug!("{}", e);
                    }
                }
                self.reconfigure_active();
            }
            Action::DefaultConfig => {
                log::debug!("Loading the default configuration...");
                self.store.palette.reset_overrides();
                self.reconfigure_active();
            }
            Action::NewTab => self.open_session(),
            Action::NewWindow => self.clone_window(),
            Action::Exit => self.quit(),
            Action::IncFontSize => self.set_font_size(self.font_size.saturating_add(1)),
            Action::DecFontSize => self.set_font_size(self.font_size.saturating_sub(1)),
            Action::DefaultFontSize => self.set_font_size(self.store.settings.font.size),
            Action::NextTab => {
                if let Some(index) = self.sessions.next() {
                    self.queue(AppEvent::TabSwitched { index });
                }
            }
            Action::PrevTab => {
                if let Some(index) = self.sessions.prev() {
                    self.queue(AppEvent::TabSwitched { index });
                }
            }
            Action::CloseTab => match self.sessions.close_active() {
                CloseOutcome::Sole => log::debug!("refusing to close the last tab"),
                CloseOutcome::Closed { active } => {
                    self.queue(AppEvent::TabSwitched { index: active })
                }
            },
        }
        self.drain();
    }

    /// Start another instance in the active session's directory.
    /// A missing directory is logged and the clone starts anyway.
    fn clone_window(&mut self) {
        let cwd = self
            .sessions
            .active()
            .and_then(|s| s.surface.current_directory_uri())
            .map(|uri| uri_to_path(&uri));
        match &cwd {
            Some(dir) if !dir.is_dir() => {
                log::warn!("Unable to change pwd for new terminal: {}", dir.display())
            }
            None => log::warn!("Unable to fetch current working directory"),
            _ => {}
        }
        let cwd = cwd.filter(|dir| dir.is_dir());

        match self.launcher.launch(&self.process.argv, cwd.as_deref()) {
            Ok(pid) => log::debug!("new window started. (PID: {})", pid),
            Err(e) => log::error!("{}", e),
        }
    }
}

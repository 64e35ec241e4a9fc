//! Config loader - reads the line-oriented config file into settings,
//! palette overrides and user bindings
//!
//! Format, one option per line:
//! ```text
//! # comment
//! font Iosevka Term 12
//! key shift
//! bindx t~"echo hi"
//! bindi z~"copy"
//! color4 #3465a4
//! ```
//! Nothing here is fatal: unreadable files, unknown options and bad values
//! are logged at debug level and skipped.

use super::option::{BindKind, ConfigOption, OptionMatching};
use super::settings::{ActionModifier, ConfigStore, CursorShape, TabPosition};
use super::{default_config_path, leading_int, parse_color};
use crate::bindings::{Binding, BindingTable};
use crate::error::ConfigError;
use std::fs;
use std::path::{Path, PathBuf};

/// Lines shorter than this (counting the newline) are ignored
const MIN_LINE_LEN: usize = 4;

/// Parses config text into a [`ConfigStore`] and [`BindingTable`]
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigLoader {
    matching: OptionMatching,
}

impl ConfigLoader {
    pub fn new(matching: OptionMatching) -> Self {
        Self { matching }
    }

    pub fn matching(&self) -> OptionMatching {
        self.matching
    }

    /// Load from `path` (or the default location) on top of fresh defaults.
    ///
    /// A missing file yields the defaults unchanged.
    pub fn load(&self, path: Option<&Path>) -> (ConfigStore, BindingTable) {
        let mut store = ConfigStore::default();
        let mut bindings = BindingTable::new();

        match resolve_path(path) {
            Some(path) => {
                if let Err(e) = self.load_file(&path, &mut store, &mut bindings) {
                    log::debug!("{}", e);
                }
            }
            None => log::debug!("no home directory, using default settings"),
        }

        store.palette.reapply();
        (store, bindings)
    }

    /// Re-read a file into existing state.
    ///
    /// User bindings are replaced once the file is readable. Other settings,
    /// palette overrides and invalidated defaults carry over.
    pub fn load_file(
        &self,
        path: &Path,
        store: &mut ConfigStore,
        bindings: &mut BindingTable,
    ) -> Result<(), ConfigError> {
        log::debug!("reading config file {}", path.display());
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;

        bindings.clear_user();
        self.parse_str(&content, store, bindings);
        Ok(())
    }

    /// Apply every line of `content`
    pub fn parse_str(&self, content: &str, store: &mut ConfigStore, bindings: &mut BindingTable) {
        for raw in content.split_inclusive('\n') {
            if raw.starts_with('#') || raw.len() < MIN_LINE_LEN {
                continue;
            }
            self.parse_line(raw.trim_end_matches(['\n', '\r']), store, bindings);
        }
    }

    fn parse_line(&self, line: &str, store: &mut ConfigStore, bindings: &mut BindingTable) {
        let line = line.trim_start();
        let option_end = line.find(char::is_whitespace).unwrap_or(line.len());
        let option = &line[..option_end];
        if option.is_empty() {
            return;
        }
        // `rest` keeps inner spaces for bindings and font names
        let rest = line[option_end..].trim_start();
        let value = rest.split_whitespace().next().unwrap_or("");

        let Some(parsed) = self.matching.resolve(option) else {
            log::debug!("ignoring unknown option {:?}", option);
            return;
        };

        let settings = &mut store.settings;
        match parsed {
            ConfigOption::Locale => settings.locale = value.to_string(),
            ConfigOption::Char => settings.word_chars = strip_ends(value).to_string(),
            ConfigOption::Key => {
                settings.action_modifier = if self.matching.value_is(value, "alt") {
                    ActionModifier::Alt
                } else {
                    ActionModifier::Shift
                };
            }
            ConfigOption::Bind(kind) => self.parse_binding(kind, rest, bindings),
            ConfigOption::Tab => {
                settings.tab_position = if self.matching.value_is(value, "bottom") {
                    TabPosition::Bottom
                } else {
                    TabPosition::Top
                };
            }
            ConfigOption::Font => {
                // Size is whatever follows the last space
                if let Some(split) = rest.rfind(' ') {
                    let size = leading_int(&rest[split + 1..]);
                    settings.font.family = rest[..split].to_string();
                    settings.font.size = size.clamp(i32::MIN.into(), i32::MAX.into()) as i32;
                }
            }
            ConfigOption::Opacity => match value.parse::<f64>() {
                Ok(opacity) if opacity.is_finite() => settings.opacity = opacity.clamp(0.0, 1.0),
                _ => log::debug!(
                    "{}",
                    ConfigError::InvalidNumber {
                        option: "opacity",
                        value: value.to_string(),
                    }
                ),
            },
            ConfigOption::Cursor => set_color(value, &mut settings.cursor),
            ConfigOption::CursorForeground => set_color(value, &mut settings.cursor_foreground),
            ConfigOption::CursorShape => {
                settings.cursor_shape = if self.matching.value_is(value, "underline") {
                    CursorShape::Underline
                } else if self.matching.value_is(value, "ibeam") {
                    CursorShape::Ibeam
                } else {
                    CursorShape::Block
                };
            }
            ConfigOption::Foreground => set_color(value, &mut settings.foreground),
            ConfigOption::ForegroundBold => set_color(value, &mut settings.bold),
            ConfigOption::Background => set_color(value, &mut settings.background),
            ConfigOption::Color => {
                // Index is the number after the last 'r' of "color"
                let Some(at) = option.rfind('r') else {
                    return;
                };
                let index = leading_int(&option[at + 1..]);
                let result = parse_color(value)
                    .and_then(|color| store.palette.set_override(index, color));
                if let Err(e) = result {
                    log::debug!("skipping {}: {}", option, e);
                }
            }
        }
    }

    /// `<key>~<quoted command>`; the quote characters are the first and last
    /// characters of the command and are dropped
    fn parse_binding(&self, kind: BindKind, rest: &str, bindings: &mut BindingTable) {
        let Some((key, cmd)) = rest.trim_start_matches('~').split_once('~') else {
            return;
        };
        if cmd.is_empty() {
            return;
        }

        let mut command = strip_ends(cmd).to_string();
        if kind == BindKind::Execute {
            command.push('\r');
        }
        let binding = Binding {
            key: key.to_string(),
            command,
            internal: kind == BindKind::Internal,
        };

        log::debug!(
            "cmd {} = {} -> {:?}",
            bindings.user().len() + 1,
            binding.key,
            binding.command
        );
        bindings.push(binding);
    }
}

fn resolve_path(path: Option<&Path>) -> Option<PathBuf> {
    match path {
        Some(path) => Some(path.to_path_buf()),
        None => default_config_path(),
    }
}

fn set_color(value: &str, slot: &mut super::Rgb) {
    match parse_color(value) {
        Ok(color) => *slot = color,
        Err(e) => log::debug!("{}", e),
    }
}

/// Drop the first and last character
fn strip_ends(s: &str) -> &str {
    let mut chars = s.chars();
    chars.next();
    chars.next_back();
    chars.as_str()
}

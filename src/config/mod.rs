//! Configuration - settings, palette and the line-oriented config file

mod color;
mod loader;
mod option;
mod palette;
mod settings;

pub use color::{parse_color, Rgb, Rgba};
pub use loader::ConfigLoader;
pub use option::{BindKind, ConfigOption, OptionMatching};
pub use palette::{Palette, PALETTE_SIZE};
pub use settings::{
    ActionModifier, ConfigStore, CursorShape, FontSpec, Settings, TabPosition, DEFAULT_FONT,
    DEFAULT_FONT_SIZE, DEFAULT_OPACITY, DEFAULT_WORD_CHARS,
};

use std::path::PathBuf;

pub const APP_NAME: &str = "tabterm";

/// `$HOME/.config/tabterm/tabterm.conf`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| {
        home.join(".config")
            .join(APP_NAME)
            .join(format!("{}.conf", APP_NAME))
    })
}

/// Integer prefix of `s` in the manner of `atoi`: optional leading
/// whitespace and sign, then digits; anything else yields 0.
pub(crate) fn leading_int(s: &str) -> i64 {
    let s = s.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if end == 0 {
        return 0;
    }
    let value = rest[..end].parse::<i64>().unwrap_or(i64::MAX);
    if negative {
        -value
    } else {
        value
    }
}

//! Process-wide settings with hard-coded defaults

use super::color::Rgb;
use super::palette::Palette;
use crossterm::event::KeyModifiers;
use serde::Serialize;

pub const DEFAULT_FONT: &str = "Monospace";
pub const DEFAULT_FONT_SIZE: i32 = 9;
pub const DEFAULT_OPACITY: f64 = 0.98;
pub const DEFAULT_WORD_CHARS: &str = "-./?%&_=+@~:";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CursorShape {
    #[default]
    Block,
    Ibeam,
    Underline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TabPosition {
    #[default]
    Bottom,
    Top,
}

/// The extra modifier that, together with Control, prefixes every chord
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionModifier {
    #[default]
    Alt,
    Shift,
}

impl ActionModifier {
    /// Full modifier mask a chord must carry: this key plus Control
    pub fn chord_mask(self) -> KeyModifiers {
        let extra = match self {
            Self::Alt => KeyModifiers::ALT,
            Self::Shift => KeyModifiers::SHIFT,
        };
        extra | KeyModifiers::CONTROL
    }
}

/// Font family plus point size
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FontSpec {
    pub family: String,
    pub size: i32,
}

impl FontSpec {
    pub fn with_size(&self, size: i32) -> Self {
        Self {
            family: self.family.clone(),
            size,
        }
    }

    /// `"<family> <size>"` as font backends usually accept it
    pub fn describe(&self) -> String {
        format!("{} {}", self.family, self.size)
    }
}

/// User-tunable terminal settings
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settings {
    pub opacity: f64,
    pub foreground: Rgb,
    pub background: Rgb,
    pub bold: Rgb,
    pub cursor: Rgb,
    pub cursor_foreground: Rgb,
    pub cursor_shape: CursorShape,
    pub font: FontSpec,
    /// Empty means inherit the environment's numeric locale
    pub locale: String,
    pub word_chars: String,
    pub tab_position: TabPosition,
    pub action_modifier: ActionModifier,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            opacity: DEFAULT_OPACITY,
            foreground: Rgb::WHITE,
            background: Rgb::BLACK,
            bold: Rgb::WHITE,
            cursor: Rgb::WHITE,
            cursor_foreground: Rgb::BLACK,
            cursor_shape: CursorShape::default(),
            font: FontSpec {
                family: DEFAULT_FONT.to_string(),
                size: DEFAULT_FONT_SIZE,
            },
            locale: String::new(),
            word_chars: DEFAULT_WORD_CHARS.to_string(),
            tab_position: TabPosition::default(),
            action_modifier: ActionModifier::default(),
        }
    }
}

/// Settings plus palette - everything a surface needs to be configured
#[derive(Debug, Clone, Default)]
pub struct ConfigStore {
    pub settings: Settings,
    pub palette: Palette,
}

impl ConfigStore {
    /// JSON dump for debug logging
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.settings).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chord_mask() {
        assert_eq!(
            ActionModifier::Alt.chord_mask(),
            KeyModifiers::ALT | KeyModifiers::CONTROL
        );
        assert_eq!(
            ActionModifier::Shift.chord_mask(),
            KeyModifiers::SHIFT | KeyModifiers::CONTROL
        );
    }

    #[test]
    fn test_settings_json() {
        let store = ConfigStore::default();
        let json = store.to_json();
        assert!(json.contains("\"foreground\":\"#ffffff\""));
        assert!(json.contains("\"cursor_shape\":\"block\""));
        assert!(json.contains("Monospace"));
    }
}

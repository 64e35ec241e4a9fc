//! Key routing - decides whether a key press is a chord and what it does

use super::BindingTable;
use crate::config::{leading_int, ActionModifier};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// A key press reduced to modifier state and a symbolic key name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPress {
    pub modifiers: KeyModifiers,
    pub key: String,
}

impl KeyPress {
    pub fn new(modifiers: KeyModifiers, key: impl Into<String>) -> Self {
        Self {
            modifiers,
            key: key.into(),
        }
    }

    /// Translate a crossterm key event; keys without a name yield `None`
    pub fn from_event(event: &KeyEvent) -> Option<Self> {
        let key = match event.code {
            KeyCode::Char(' ') => "space".to_string(),
            KeyCode::Char('=') => "equals".to_string(),
            KeyCode::Char('+') => "plus".to_string(),
            KeyCode::Char('-') => "minus".to_string(),
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Enter => "return".to_string(),
            KeyCode::Backspace => "backspace".to_string(),
            KeyCode::Tab => "tab".to_string(),
            KeyCode::Esc => "escape".to_string(),
            KeyCode::Up => "up".to_string(),
            KeyCode::Down => "down".to_string(),
            KeyCode::Left => "left".to_string(),
            KeyCode::Right => "right".to_string(),
            KeyCode::PageUp => "page_up".to_string(),
            KeyCode::PageDown => "page_down".to_string(),
            KeyCode::Home => "home".to_string(),
            KeyCode::End => "end".to_string(),
            KeyCode::Insert => "insert".to_string(),
            KeyCode::Delete => "delete".to_string(),
            KeyCode::F(n) => format!("f{}", n),
            _ => return None,
        };
        Some(Self::new(event.modifiers, key))
    }
}

/// Outcome of routing one key press
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Not a chord we own; the key goes to the child as usual
    Unhandled,
    /// Zero-based tab index, possibly negative or past the end
    SwitchTab(i64),
    /// Action name for the dispatcher
    Internal(String),
    /// Literal text for the child's input
    Inject(String),
}

/// Resolve a key press: tab jump, then defaults, then user bindings.
///
/// A user binding on a key that also has an active default never fires;
/// the default wins.
pub fn route(event: &KeyPress, modifier: ActionModifier, bindings: &BindingTable) -> Route {
    let held = event.modifiers & (KeyModifiers::CONTROL | KeyModifiers::SHIFT | KeyModifiers::ALT);
    if held != modifier.chord_mask() {
        return Route::Unhandled;
    }

    let number = leading_int(&event.key);
    if number != 0 {
        return Route::SwitchTab(number - 1);
    }

    if let Some(def) = bindings.lookup_default(&event.key) {
        return Route::Internal(def.action.as_str().to_string());
    }

    match bindings.lookup_user(&event.key) {
        Some(binding) if binding.internal => Route::Internal(binding.command.clone()),
        Some(binding) => Route::Inject(binding.command.clone()),
        None => Route::Unhandled,
    }
}

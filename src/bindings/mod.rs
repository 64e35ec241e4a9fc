//! Key bindings - user bindings from the config plus a fixed default table

mod router;

pub use router::{route, KeyPress, Route};

use crate::actions::Action;

/// A user binding from a `bind`, `bindx` or `bindi` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    /// Symbolic key name, compared case-insensitively
    pub key: String,
    /// Action name when `internal`, otherwise literal text for the child
    pub command: String,
    pub internal: bool,
}

impl Binding {
    pub fn literal(key: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            command: command.into(),
            internal: false,
        }
    }

    pub fn internal(key: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            command: action.into(),
            internal: true,
        }
    }
}

/// A built-in chord. Every default is an internal action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultBinding {
    pub key: &'static str,
    pub action: Action,
}

const fn default(key: &'static str, action: Action) -> DefaultBinding {
    DefaultBinding { key, action }
}

/// Built-in chords in lookup order
pub const DEFAULT_BINDINGS: [DefaultBinding; 22] = [
    default("c", Action::Copy),
    default("v", Action::Paste),
    default("t", Action::NewTab),
    default("n", Action::NewWindow),
    default("return", Action::NewTab),
    default("r", Action::ReloadConfig),
    default("d", Action::DefaultConfig),
    default("q", Action::Exit),
    default("k", Action::IncFontSize),
    default("up", Action::IncFontSize),
    default("j", Action::DecFontSize),
    default("down", Action::DecFontSize),
    default("equals", Action::DefaultFontSize),
    default("plus", Action::DefaultFontSize),
    default("l", Action::NextTab),
    default("right", Action::NextTab),
    default("page_down", Action::NextTab),
    default("h", Action::PrevTab),
    default("left", Action::PrevTab),
    default("page_up", Action::PrevTab),
    default("w", Action::CloseTab),
    default("backspace", Action::CloseTab),
];

/// User bindings in config order plus the invalidation state of the defaults.
///
/// Keys are not unique: a later binding on the same key is shadowed by the
/// earlier one during lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindingTable {
    user: Vec<Binding>,
    /// Bit `i` set means `DEFAULT_BINDINGS[i]` is disabled
    invalidated: u32,
}

impl BindingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a user binding and disable every default it overrides.
    ///
    /// A default is overridden by any internal binding naming the same
    /// action, whatever key it sits on: `bindi z~copy` disables the `c` copy
    /// chord.
    pub fn push(&mut self, binding: Binding) {
        if binding.internal {
            for (index, def) in DEFAULT_BINDINGS.iter().enumerate() {
                if def.action.as_str() == binding.command {
                    self.invalidated |= 1 << index;
                }
            }
        }
        self.user.push(binding);
    }

    /// Drop all user bindings; invalidated defaults stay invalidated
    pub fn clear_user(&mut self) {
        self.user.clear();
    }

    pub fn user(&self) -> &[Binding] {
        &self.user
    }

    pub fn is_invalidated(&self, index: usize) -> bool {
        index < DEFAULT_BINDINGS.len() && self.invalidated & (1 << index) != 0
    }

    /// Defaults paired with whether they are still active
    pub fn defaults(&self) -> impl Iterator<Item = (&'static DefaultBinding, bool)> + '_ {
        DEFAULT_BINDINGS
            .iter()
            .enumerate()
            .map(|(index, def)| (def, !self.is_invalidated(index)))
    }

    /// First active default on `key`
    pub fn lookup_default(&self, key: &str) -> Option<&'static DefaultBinding> {
        self.defaults()
            .find(|(def, active)| *active && def.key.eq_ignore_ascii_case(key))
            .map(|(def, _)| def)
    }

    /// First user binding on `key`
    pub fn lookup_user(&self, key: &str) -> Option<&Binding> {
        self.user.iter().find(|b| b.key.eq_ignore_ascii_case(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_table() {
        let table = BindingTable::new();
        assert!(table.user().is_empty());
        assert_eq!(table.defaults().count(), DEFAULT_BINDINGS.len());
        assert!(table.defaults().all(|(_, active)| active));
    }

    #[test]
    fn test_invalidation_follows_action_not_key() {
        let mut table = BindingTable::new();
        table.push(Binding::internal("z", "copy"));

        assert!(table.lookup_default("c").is_none());
        assert_eq!(table.lookup_default("v").unwrap().action, Action::Paste);
        assert!(table.is_invalidated(0));
    }

    #[test]
    fn test_invalidation_covers_every_key_of_an_action() {
        let mut table = BindingTable::new();
        table.push(Binding::internal("x", "next-tab"));

        assert!(table.lookup_default("l").is_none());
        assert!(table.lookup_default("right").is_none());
        assert!(table.lookup_default("page_down").is_none());
        assert!(table.lookup_default("h").is_some());
    }

    #[test]
    fn test_literal_binding_does_not_invalidate() {
        let mut table = BindingTable::new();
        table.push(Binding::literal("z", "copy"));
        assert!(table.lookup_default("c").is_some());
    }

    #[test]
    fn test_case_insensitive_lookup() {
        let mut table = BindingTable::new();
        table.push(Binding::literal("F5", "make\r"));
        assert_eq!(table.lookup_user("f5").unwrap().command, "make\r");
        assert_eq!(
            table.lookup_default("RETURN").unwrap().action,
            Action::NewTab
        );
    }

    #[test]
    fn test_first_user_binding_shadows_later() {
        let mut table = BindingTable::new();
        table.push(Binding::literal("g", "first"));
        table.push(Binding::literal("G", "second"));
        assert_eq!(table.user().len(), 2);
        assert_eq!(table.lookup_user("g").unwrap().command, "first");
    }

    #[test]
    fn test_clear_user_keeps_invalidation() {
        let mut table = BindingTable::new();
        table.push(Binding::internal("z", "exit"));
        table.clear_user();
        assert!(table.user().is_empty());
        assert!(table.lookup_default("q").is_none());
    }
}

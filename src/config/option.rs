//! Config option names and how user-written names are matched against them
//!
//! The legacy format accepts abbreviations: a written option matches a
//! keyword when the keyword starts with it. Two rules compare fewer
//! characters than were written (`bind` one fewer, `color` two fewer) so that
//! `bindx`/`bindi` and `color<N>` reach them. Rules are tried in a fixed order
//! and the first hit wins, which means a lone letter like `t` never reaches
//! `tab`: it is claimed by `bind` first.

/// How a `bind*` line treats its command text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindKind {
    /// Inject the command text as typed
    Literal,
    /// Inject the command text followed by a carriage return
    Execute,
    /// Treat the command text as an action name
    Internal,
}

/// Every option the loader understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigOption {
    Locale,
    Char,
    Key,
    Bind(BindKind),
    Tab,
    Font,
    Opacity,
    Cursor,
    CursorForeground,
    CursorShape,
    Foreground,
    ForegroundBold,
    Background,
    Color,
}

/// Keyword table in match order. The `usize` is how many characters fewer
/// than the written option are compared.
const RULES: &[(&str, usize, ConfigOption)] = &[
    ("locale", 0, ConfigOption::Locale),
    ("char", 0, ConfigOption::Char),
    ("key", 0, ConfigOption::Key),
    ("bind", 1, ConfigOption::Bind(BindKind::Literal)),
    ("tab", 0, ConfigOption::Tab),
    ("font", 0, ConfigOption::Font),
    ("opacity", 0, ConfigOption::Opacity),
    ("cursor", 0, ConfigOption::Cursor),
    ("cursor_foreground", 0, ConfigOption::CursorForeground),
    ("cursor_shape", 0, ConfigOption::CursorShape),
    ("foreground", 0, ConfigOption::Foreground),
    ("foreground_bold", 0, ConfigOption::ForegroundBold),
    ("background", 0, ConfigOption::Background),
    ("color", 2, ConfigOption::Color),
];

/// Option and value matching policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OptionMatching {
    /// Abbreviations accepted (legacy behavior)
    #[default]
    Prefix,
    /// Only full keywords are recognized
    Exact,
}

impl OptionMatching {
    /// Resolve a written option name
    pub fn resolve(self, option: &str) -> Option<ConfigOption> {
        let found = match self {
            Self::Prefix => RULES.iter().find_map(|(keyword, shorter, opt)| {
                let n = option.len().saturating_sub(*shorter);
                (is_color_index(option) && *opt == ConfigOption::Color
                    || ncmp_eq(option, keyword, n))
                .then_some(*opt)
            }),
            Self::Exact => RULES.iter().find_map(|(keyword, _, opt)| {
                let hit = match opt {
                    ConfigOption::Bind(_) => matches!(option, "bind" | "bindx" | "bindi"),
                    ConfigOption::Color => is_color_index(option),
                    _ => option == *keyword,
                };
                hit.then_some(*opt)
            }),
        };

        match found? {
            ConfigOption::Bind(_) => Some(ConfigOption::Bind(match option {
                "bindx" => BindKind::Execute,
                "bindi" => BindKind::Internal,
                _ => BindKind::Literal,
            })),
            other => Some(other),
        }
    }

    /// Does a written value select `keyword`?
    pub fn value_is(self, value: &str, keyword: &str) -> bool {
        match self {
            Self::Prefix => ncmp_eq(value, keyword, value.len()),
            Self::Exact => value == keyword,
        }
    }
}

/// `color` followed by a decimal index
fn is_color_index(option: &str) -> bool {
    option
        .strip_prefix("color")
        .is_some_and(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
}

/// Compare at most `n` bytes, a shorter string ending as if NUL-terminated
fn ncmp_eq(a: &str, b: &str, n: usize) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    for i in 0..n {
        let ca = a.get(i).copied().unwrap_or(0);
        let cb = b.get(i).copied().unwrap_or(0);
        if ca != cb {
            return false;
        }
        if ca == 0 {
            break;
        }
    }
    true
}

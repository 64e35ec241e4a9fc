//! Color values - textual color specs and normalized RGBA

use crate::error::ConfigError;
use serde::{Serialize, Serializer};
use std::fmt;

/// A packed 24-bit `0xrrggbb` color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb(pub u32);

impl Rgb {
    pub const WHITE: Rgb = Rgb(0xffffff);
    pub const BLACK: Rgb = Rgb(0x000000);

    pub fn red(self) -> u8 {
        ((self.0 & 0xff0000) >> 16) as u8
    }

    pub fn green(self) -> u8 {
        ((self.0 & 0x00ff00) >> 8) as u8
    }

    pub fn blue(self) -> u8 {
        (self.0 & 0x0000ff) as u8
    }

    /// Normalize to floating point channels with the given alpha
    pub fn to_rgba(self, alpha: f64) -> Rgba {
        Rgba {
            red: f64::from(self.red()) / 255.0,
            green: f64::from(self.green()) / 255.0,
            blue: f64::from(self.blue()) / 255.0,
            alpha,
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.0)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Color with channels in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rgba {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Rgba {
    /// Quantize back to 8-bit channels, dropping alpha
    pub fn to_rgb(self) -> Rgb {
        let q = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u32;
        Rgb((q(self.red) << 16) | (q(self.green) << 8) | q(self.blue))
    }
}

/// Parse `#rrggbb`, `0xrrggbb` or bare hex digits.
///
/// Trailing garbage after the hex digits is ignored. Values wider than
/// 24 bits keep only their low 24 bits.
pub fn parse_color(value: &str) -> Result<Rgb, ConfigError> {
    let body = value
        .strip_prefix('#')
        .or_else(|| value.strip_prefix("0x"))
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value);

    let end = body
        .find(|c: char| !c.is_ascii_hexdigit())
        .unwrap_or(body.len());
    let digits = &body[..end];
    if digits.is_empty() {
        return Err(ConfigError::InvalidColor(value.to_string()));
    }

    // Overlong values saturate the same way strtol does
    let raw = u64::from_str_radix(digits, 16).unwrap_or(i64::MAX as u64);
    Ok(Rgb((raw & 0xffffff) as u32))
}

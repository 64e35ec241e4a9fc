//! 256-entry color palette (ANSI 0-15 + 216 color cube + 24 grayscale)

use super::color::{Rgb, Rgba};
use crate::error::ConfigError;

pub const PALETTE_SIZE: usize = 256;

/// Terminal palette with a user-overridable prefix.
///
/// `override_count` counts accepted `color<N>` lines, not the highest index
/// set. On [`Palette::reapply`] every entry at or past that count is rebuilt
/// from the formula, so an override only survives when it lands inside the
/// first `override_count` slots.
#[derive(Debug, Clone)]
pub struct Palette {
    entries: [Rgba; PALETTE_SIZE],
    override_count: usize,
}

impl Default for Palette {
    fn default() -> Self {
        let mut palette = Self {
            entries: [Rgba::default(); PALETTE_SIZE],
            override_count: 0,
        };
        palette.reapply();
        palette
    }
}

impl Palette {
    /// Formula color for an index; total over `0..256`
    pub fn formula(index: usize) -> Rgba {
        if index < 16 {
            let i = index as u32;
            let channel = |bit: u32| {
                let base = if i & bit != 0 { 0xc000 } else { 0 };
                let bright = if i > 7 { 0x3fff } else { 0 };
                f64::from(base + bright) / 65535.0
            };
            Rgba {
                red: channel(1),
                green: channel(2),
                blue: channel(4),
                alpha: 0.0,
            }
        } else if index < 232 {
            let j = (index - 16) as u32;
            let level = |v: u32| f64::from(if v == 0 { 0 } else { v * 40 + 55 }) / 255.0;
            Rgba {
                red: level(j / 36),
                green: level((j / 6) % 6),
                blue: level(j % 6),
                alpha: 0.0,
            }
        } else {
            let shade = 8 + (index as u32 - 232) * 10;
            let v = f64::from(shade | (shade << 8)) / 65535.0;
            Rgba {
                red: v,
                green: v,
                blue: v,
                alpha: 0.0,
            }
        }
    }

    /// Store a user color at `index`; out-of-range indices are rejected
    pub fn set_override(&mut self, index: i64, color: Rgb) -> Result<(), ConfigError> {
        let slot = usize::try_from(index)
            .ok()
            .filter(|i| *i < PALETTE_SIZE)
            .ok_or(ConfigError::PaletteIndex(index))?;
        self.entries[slot] = color.to_rgba(0.0);
        self.override_count = (self.override_count + 1).min(PALETTE_SIZE);
        Ok(())
    }

    /// Recompute every entry from `override_count` onward
    pub fn reapply(&mut self) {
        for index in self.override_count..PALETTE_SIZE {
            self.entries[index] = Self::formula(index);
        }
    }

    /// Forget all overrides (the entries are rebuilt on the next reapply)
    pub fn reset_overrides(&mut self) {
        self.override_count = 0;
    }

    pub fn override_count(&self) -> usize {
        self.override_count
    }

    pub fn get(&self, index: usize) -> Option<Rgba> {
        self.entries.get(index).copied()
    }

    pub fn entries(&self) -> &[Rgba; PALETTE_SIZE] {
        &self.entries
    }
}

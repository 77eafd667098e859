// SPDX-License-Identifier: MPL-2.0
//! Presentation filters for the displayed image.
//!
//! Mirrors the CSS `contrast()`, `brightness()` and `invert()` functions,
//! applied in that order to the colour channels of normalized pixels:
//!
//! - contrast `c`: `v' = (v - 0.5) * c + 0.5`
//! - brightness `b`: `v' = v * b`
//! - invert: `v' = 1 - v`
//!
//! Each stage clamps to `[0, 1]`. Alpha is never modified.

use crate::domain::viewing::FilterPercent;

/// Filter parameters derived from the current view adjustments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PresentationFilter {
    pub contrast: FilterPercent,
    pub brightness: FilterPercent,
    pub invert: bool,
}

impl Default for PresentationFilter {
    fn default() -> Self {
        Self {
            contrast: FilterPercent::default(),
            brightness: FilterPercent::default(),
            invert: false,
        }
    }
}

impl PresentationFilter {
    /// True when applying the filter would return the input unchanged.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.contrast.is_neutral() && self.brightness.is_neutral() && !self.invert
    }

    /// Maps one normalized channel value.
    #[must_use]
    pub fn map_channel(&self, value: f32) -> f32 {
        let contrasted = ((value - 0.5) * self.contrast.as_factor() + 0.5).clamp(0.0, 1.0);
        let brightened = (contrasted * self.brightness.as_factor()).clamp(0.0, 1.0);
        if self.invert {
            1.0 - brightened
        } else {
            brightened
        }
    }

    /// Precomputes the mapping for every 8-bit channel value.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // Clamped to 0..=255
    pub fn lookup_table(&self) -> [u8; 256] {
        let mut table = [0u8; 256];
        for (value, slot) in table.iter_mut().enumerate() {
            let mapped = self.map_channel(value as f32 / 255.0);
            *slot = (mapped * 255.0).round().clamp(0.0, 255.0) as u8;
        }
        table
    }

    /// Returns a filtered copy of an RGBA buffer.
    #[must_use]
    pub fn apply(&self, rgba: &[u8]) -> Vec<u8> {
        let table = self.lookup_table();
        let mut output = rgba.to_vec();
        for pixel in output.chunks_exact_mut(4) {
            pixel[0] = table[pixel[0] as usize];
            pixel[1] = table[pixel[1] as usize];
            pixel[2] = table[pixel[2] as usize];
        }
        output
    }
}

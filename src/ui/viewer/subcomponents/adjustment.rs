// SPDX-License-Identifier: MPL-2.0
//! Presentation adjustments: contrast, brightness, scale and invert.
//!
//! Values live in clamped newtypes, so every setter accepts any input and
//! the state can never leave its valid range.

use crate::config::defaults::SCALE_STEP;
use crate::domain::viewing::{FilterPercent, ScaleFactor};
use crate::media::PresentationFilter;

/// Adjustment sub-component state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct State {
    pub contrast: FilterPercent,
    pub brightness: FilterPercent,
    pub scale: ScaleFactor,
    pub invert: bool,
}

/// Messages for the adjustment sub-component.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    SetContrast(f32),
    SetBrightness(f32),
    SetScale(f32),
    ScaleUp,
    ScaleDown,
    ToggleInvert,
    Reset,
}

/// Effects produced by adjustment changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    /// The pixel filter changed; the displayed image must be re-rendered.
    FilterChanged,
    /// Only the display size changed.
    ScaleChanged,
}

impl State {
    pub fn handle(&mut self, msg: Message) -> Effect {
        let before = *self;
        match msg {
            Message::SetContrast(percent) => self.contrast = FilterPercent::new(percent),
            Message::SetBrightness(percent) => self.brightness = FilterPercent::new(percent),
            Message::SetScale(factor) => self.scale = ScaleFactor::new(factor),
            Message::ScaleUp => self.scale = self.scale.increase(SCALE_STEP),
            Message::ScaleDown => self.scale = self.scale.decrease(SCALE_STEP),
            Message::ToggleInvert => self.invert = !self.invert,
            Message::Reset => *self = Self::default(),
        }

        if self.filter() != before.filter() {
            Effect::FilterChanged
        } else if self.scale != before.scale {
            Effect::ScaleChanged
        } else {
            Effect::None
        }
    }

    /// Pixel filter for the current values.
    #[must_use]
    pub fn filter(&self) -> PresentationFilter {
        PresentationFilter {
            contrast: self.contrast,
            brightness: self.brightness,
            invert: self.invert,
        }
    }

    /// True when every value is at its default.
    #[must_use]
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

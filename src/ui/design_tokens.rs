// SPDX-License-Identifier: MPL-2.0
//! Design tokens shared by the viewer views.
//!
//! Spacing follows an 8px grid; typography is a small semantic scale.

use iced::Color;

// ============================================================================
// Color Palette
// ============================================================================

pub mod palette {
    use super::Color;

    pub const GRAY_400: Color = Color::from_rgb(0.4, 0.4, 0.4);
    pub const GRAY_200: Color = Color::from_rgb(0.75, 0.75, 0.75);

    pub const ERROR_500: Color = Color::from_rgb(0.9, 0.2, 0.2);
    pub const SUCCESS_500: Color = Color::from_rgb(0.2, 0.7, 0.3);
}

// ============================================================================
// Spacing Scale (8px grid)
// ============================================================================

pub mod spacing {
    pub const XXS: f32 = 4.0; // 0.5 unit
    pub const XS: f32 = 8.0; // 1 unit
    pub const SM: f32 = 12.0; // 1.5 units
    pub const MD: f32 = 16.0; // 2 units
    pub const LG: f32 = 24.0; // 3 units
}

// ============================================================================
// Sizing
// ============================================================================

pub mod sizing {
    /// Width of an adjustment slider column.
    pub const CONTROL_COLUMN: f32 = 180.0;

    /// Diameter of the loading spinner glyph.
    pub const SPINNER: f32 = 32.0;
}

// ============================================================================
// Typography Scale
// ============================================================================

pub mod typography {
    /// Study title in the header.
    pub const TITLE_MD: f32 = 20.0;

    /// Section headers (error heading).
    pub const TITLE_SM: f32 = 18.0;

    /// Standard body - most UI text, labels, descriptions
    pub const BODY: f32 = 14.0;

    /// Small body - hints, secondary labels
    pub const BODY_SM: f32 = 13.0;

    /// Caption - position indicator, technical details
    pub const CAPTION: f32 = 12.0;
}

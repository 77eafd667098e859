// SPDX-License-Identifier: MPL-2.0
//! User interface components and state management.
//!
//! Follows the Elm-style "state down, messages up" pattern.
//!
//! - [`viewer`] - Study viewer: header, image pane, navigation and adjustments
//! - [`widgets`] - Custom Iced widgets (loading spinner)
//! - [`design_tokens`] - Design system constants (colors, spacing, sizing)

pub mod design_tokens;
pub mod viewer;
pub mod widgets;

// SPDX-License-Identifier: MPL-2.0
//! Viewer domain types.
//!
//! - [`FilterPercent`]: Contrast or brightness level (50%–200%)
//! - [`ScaleFactor`]: Display scale (0.5×–2.0×)
//! - [`PrefetchRadius`]: Neighbours requested on each side (1–5)
//! - [`DebounceWindow`]: Wheel coalescing window (50–100 ms)
//! - [`CacheBudget`]: Decoded image memory budget (8–256 MB)

mod newtypes;

pub use newtypes::{CacheBudget, DebounceWindow, FilterPercent, PrefetchRadius, ScaleFactor};

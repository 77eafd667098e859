// SPDX-License-Identifier: MPL-2.0
//! Viewer newtypes.
//!
//! Every value is clamped on construction, so view state can never hold an
//! out-of-range adjustment and call sites never clamp by hand.

use crate::config::defaults::{
    DEFAULT_FILTER_PERCENT, DEFAULT_PREFETCH_CACHE_MB, DEFAULT_PREFETCH_RADIUS, DEFAULT_SCALE,
    DEFAULT_WHEEL_DEBOUNCE_MS, MAX_FILTER_PERCENT, MAX_PREFETCH_CACHE_MB, MAX_PREFETCH_RADIUS,
    MAX_SCALE, MAX_WHEEL_DEBOUNCE_MS, MIN_FILTER_PERCENT, MIN_PREFETCH_CACHE_MB,
    MIN_PREFETCH_RADIUS, MIN_SCALE, MIN_WHEEL_DEBOUNCE_MS,
};
use std::time::Duration;

// =============================================================================
// FilterPercent
// =============================================================================

/// Contrast or brightness level, guaranteed to be within 50%–200%.
///
/// 100% leaves the image unchanged.
///
/// # Example
///
/// ```
/// use study_lens::domain::viewing::FilterPercent;
///
/// assert_eq!(FilterPercent::new(250.0).value(), 200.0);
/// assert_eq!(FilterPercent::new(10.0).value(), 50.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterPercent(f32);

impl FilterPercent {
    /// Creates a new level, clamping the value to the valid range.
    ///
    /// NaN maps to the default level.
    #[must_use]
    pub fn new(percent: f32) -> Self {
        if percent.is_nan() {
            return Self::default();
        }
        Self(percent.clamp(MIN_FILTER_PERCENT, MAX_FILTER_PERCENT))
    }

    /// Returns the raw percentage value.
    #[must_use]
    pub fn value(self) -> f32 {
        self.0
    }

    /// Returns the level as a multiplier (e.g., 150% → 1.5).
    #[must_use]
    pub fn as_factor(self) -> f32 {
        self.0 / 100.0
    }

    #[must_use]
    pub fn is_min(self) -> bool {
        self.0 <= MIN_FILTER_PERCENT
    }

    #[must_use]
    pub fn is_max(self) -> bool {
        self.0 >= MAX_FILTER_PERCENT
    }

    /// Returns true when the level has no visual effect.
    #[must_use]
    pub fn is_neutral(self) -> bool {
        (self.0 - DEFAULT_FILTER_PERCENT).abs() < f32::EPSILON
    }
}

impl Default for FilterPercent {
    fn default() -> Self {
        Self(DEFAULT_FILTER_PERCENT)
    }
}

// =============================================================================
// ScaleFactor
// =============================================================================

/// Display scale, guaranteed to be within 0.5×–2.0×.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleFactor(f32);

impl ScaleFactor {
    /// Creates a new scale, clamping the value to the valid range.
    ///
    /// NaN maps to the natural size.
    #[must_use]
    pub fn new(factor: f32) -> Self {
        if factor.is_nan() {
            return Self::default();
        }
        Self(factor.clamp(MIN_SCALE, MAX_SCALE))
    }

    #[must_use]
    pub fn value(self) -> f32 {
        self.0
    }

    #[must_use]
    pub fn is_min(self) -> bool {
        self.0 <= MIN_SCALE
    }

    #[must_use]
    pub fn is_max(self) -> bool {
        self.0 >= MAX_SCALE
    }

    /// Increases the scale by the given step.
    #[must_use]
    pub fn increase(self, step: f32) -> Self {
        Self::new(self.0 + step)
    }

    /// Decreases the scale by the given step.
    #[must_use]
    pub fn decrease(self, step: f32) -> Self {
        Self::new(self.0 - step)
    }
}

impl Default for ScaleFactor {
    fn default() -> Self {
        Self(DEFAULT_SCALE)
    }
}

// =============================================================================
// PrefetchRadius
// =============================================================================

/// Number of images requested on each side of the current one (1–5).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrefetchRadius(usize);

impl PrefetchRadius {
    #[must_use]
    pub fn new(value: usize) -> Self {
        Self(value.clamp(MIN_PREFETCH_RADIUS, MAX_PREFETCH_RADIUS))
    }

    #[must_use]
    pub fn value(self) -> usize {
        self.0
    }
}

impl Default for PrefetchRadius {
    fn default() -> Self {
        Self(DEFAULT_PREFETCH_RADIUS)
    }
}

// =============================================================================
// DebounceWindow
// =============================================================================

/// Window during which wheel events collapse into one step (50–100 ms).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceWindow(u64);

impl DebounceWindow {
    #[must_use]
    pub fn new(millis: u64) -> Self {
        Self(millis.clamp(MIN_WHEEL_DEBOUNCE_MS, MAX_WHEEL_DEBOUNCE_MS))
    }

    /// Returns the window in milliseconds.
    #[must_use]
    pub fn millis(self) -> u64 {
        self.0
    }

    #[must_use]
    pub fn as_duration(self) -> Duration {
        Duration::from_millis(self.0)
    }
}

impl Default for DebounceWindow {
    fn default() -> Self {
        Self(DEFAULT_WHEEL_DEBOUNCE_MS)
    }
}

// =============================================================================
// CacheBudget
// =============================================================================

/// Memory budget for decoded images, in megabytes (8–256).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheBudget(u32);

impl CacheBudget {
    #[must_use]
    pub fn new(megabytes: u32) -> Self {
        Self(megabytes.clamp(MIN_PREFETCH_CACHE_MB, MAX_PREFETCH_CACHE_MB))
    }

    #[must_use]
    pub fn megabytes(self) -> u32 {
        self.0
    }

    /// Returns the budget in bytes.
    #[must_use]
    pub fn bytes(self) -> usize {
        self.0 as usize * 1024 * 1024
    }
}

impl Default for CacheBudget {
    fn default() -> Self {
        Self(DEFAULT_PREFETCH_CACHE_MB)
    }
}

// =============================================================================
// Tests
// =============================================================================

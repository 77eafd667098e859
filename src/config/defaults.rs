// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! This module serves as the single source of truth for default values
//! used across the application. Constants are organized by category.
//!
//! # Categories
//!
//! - **Presentation**: Contrast, brightness and scale bounds
//! - **Prefetch**: Neighbour window radius and decoded image budget
//! - **Wheel**: Scroll debounce window
//! - **Diagnostics**: Event buffer capacity

// ==========================================================================
// Presentation Defaults
// ==========================================================================

/// Default contrast and brightness level (100% = unchanged).
pub const DEFAULT_FILTER_PERCENT: f32 = 100.0;

/// Minimum contrast and brightness percentage.
pub const MIN_FILTER_PERCENT: f32 = 50.0;

/// Maximum contrast and brightness percentage.
pub const MAX_FILTER_PERCENT: f32 = 200.0;

/// Default display scale (1.0 = natural size).
pub const DEFAULT_SCALE: f32 = 1.0;

/// Minimum display scale.
pub const MIN_SCALE: f32 = 0.5;

/// Maximum display scale.
pub const MAX_SCALE: f32 = 2.0;

/// Scale increment for the zoom buttons.
pub const SCALE_STEP: f32 = 0.1;

// ==========================================================================
// Prefetch Defaults
// ==========================================================================

/// Default number of images requested on each side of the current one.
pub const DEFAULT_PREFETCH_RADIUS: usize = 3;

/// Minimum prefetch radius.
pub const MIN_PREFETCH_RADIUS: usize = 1;

/// Maximum prefetch radius.
pub const MAX_PREFETCH_RADIUS: usize = 5;

/// Default decoded image budget in megabytes.
pub const DEFAULT_PREFETCH_CACHE_MB: u32 = 64;

/// Minimum decoded image budget in megabytes.
pub const MIN_PREFETCH_CACHE_MB: u32 = 8;

/// Maximum decoded image budget in megabytes.
pub const MAX_PREFETCH_CACHE_MB: u32 = 256;

// ==========================================================================
// Wheel Defaults
// ==========================================================================

/// Default debounce window for wheel navigation (milliseconds).
pub const DEFAULT_WHEEL_DEBOUNCE_MS: u64 = 80;

/// Minimum debounce window (milliseconds).
pub const MIN_WHEEL_DEBOUNCE_MS: u64 = 50;

/// Maximum debounce window (milliseconds).
pub const MAX_WHEEL_DEBOUNCE_MS: u64 = 100;

// ==========================================================================
// Diagnostics Defaults
// ==========================================================================

/// Default number of diagnostic events kept in memory.
pub const DEFAULT_DIAGNOSTICS_BUFFER_CAPACITY: usize = 1000;

/// Minimum diagnostics buffer capacity.
pub const MIN_DIAGNOSTICS_BUFFER_CAPACITY: usize = 100;

/// Maximum diagnostics buffer capacity.
pub const MAX_DIAGNOSTICS_BUFFER_CAPACITY: usize = 10_000;

// ==========================================================================
// Compile-time Validation
// ==========================================================================

const _: () = {
    assert!(MIN_FILTER_PERCENT > 0.0);
    assert!(MIN_FILTER_PERCENT <= DEFAULT_FILTER_PERCENT);
    assert!(MAX_FILTER_PERCENT >= DEFAULT_FILTER_PERCENT);

    assert!(MIN_SCALE > 0.0);
    assert!(MIN_SCALE <= DEFAULT_SCALE);
    assert!(MAX_SCALE >= DEFAULT_SCALE);
    assert!(SCALE_STEP > 0.0);

    assert!(MIN_PREFETCH_RADIUS > 0);
    assert!(MAX_PREFETCH_RADIUS >= MIN_PREFETCH_RADIUS);
    assert!(DEFAULT_PREFETCH_RADIUS >= MIN_PREFETCH_RADIUS);
    assert!(DEFAULT_PREFETCH_RADIUS <= MAX_PREFETCH_RADIUS);

    assert!(MIN_PREFETCH_CACHE_MB > 0);
    assert!(MAX_PREFETCH_CACHE_MB >= MIN_PREFETCH_CACHE_MB);
    assert!(DEFAULT_PREFETCH_CACHE_MB >= MIN_PREFETCH_CACHE_MB);
    assert!(DEFAULT_PREFETCH_CACHE_MB <= MAX_PREFETCH_CACHE_MB);

    assert!(MIN_WHEEL_DEBOUNCE_MS > 0);
    assert!(MAX_WHEEL_DEBOUNCE_MS >= MIN_WHEEL_DEBOUNCE_MS);
    assert!(DEFAULT_WHEEL_DEBOUNCE_MS >= MIN_WHEEL_DEBOUNCE_MS);
    assert!(DEFAULT_WHEEL_DEBOUNCE_MS <= MAX_WHEEL_DEBOUNCE_MS);

    assert!(MIN_DIAGNOSTICS_BUFFER_CAPACITY > 0);
    assert!(MAX_DIAGNOSTICS_BUFFER_CAPACITY >= MIN_DIAGNOSTICS_BUFFER_CAPACITY);
    assert!(DEFAULT_DIAGNOSTICS_BUFFER_CAPACITY >= MIN_DIAGNOSTICS_BUFFER_CAPACITY);
    assert!(DEFAULT_DIAGNOSTICS_BUFFER_CAPACITY <= MAX_DIAGNOSTICS_BUFFER_CAPACITY);
};

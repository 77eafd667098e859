// SPDX-License-Identifier: MPL-2.0
//! Domain layer - value objects shared by the viewer, the config and the media code.
//!
//! These types carry no I/O and no toolkit dependencies. Bounds come from
//! [`crate::config::defaults`] so every clamp in the application agrees.
//!
//! # Modules
//!
//! - [`diagnostics`]: Diagnostics types ([`BufferCapacity`](diagnostics::BufferCapacity))
//! - [`viewing`]: Viewer value objects ([`FilterPercent`](viewing::FilterPercent),
//!   [`ScaleFactor`](viewing::ScaleFactor), [`PrefetchRadius`](viewing::PrefetchRadius),
//!   [`DebounceWindow`](viewing::DebounceWindow), [`CacheBudget`](viewing::CacheBudget))

pub mod diagnostics;
pub mod viewing;

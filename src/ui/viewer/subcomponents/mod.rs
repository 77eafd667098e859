// SPDX-License-Identifier: MPL-2.0
//! Nested TEA sub-components for the viewer.
//!
//! Each sub-component has its own State, Message, Effect, and handle() method.
//! The main component.rs orchestrates these sub-components.
//!
//! ## Architecture
//!
//! ```text
//! component.rs (orchestrator)
//!     ├── loading      - Sequence fetch spinner
//!     ├── error_state  - Error display with retry
//!     ├── navigation   - Clamped current index
//!     ├── adjustment   - Contrast, brightness, scale, invert
//!     └── wheel        - Scroll debouncing
//! ```

pub mod adjustment;
pub mod error_state;
pub mod loading;
pub mod navigation;
pub mod wheel;

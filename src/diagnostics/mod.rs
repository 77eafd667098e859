// SPDX-License-Identifier: MPL-2.0
//! In-memory activity log for the viewer.
//!
//! Events are stored in a memory-bounded circular buffer and can be exported
//! as a JSON report. Nothing is written to disk unless the caller asks for it.
//!
//! # Architecture
//!
//! - [`CircularBuffer`]: Generic ring buffer with configurable capacity
//! - [`DiagnosticEvent`]: Timestamped event with a [`DiagnosticEventKind`]
//! - [`DiagnosticsCollector`]: Owns the buffer, drains the channel
//! - [`DiagnosticsHandle`]: Cloneable non-blocking sender for async tasks

mod buffer;
mod collector;
mod events;

pub use buffer::CircularBuffer;
pub use collector::{DiagnosticReport, DiagnosticsCollector, DiagnosticsHandle, SerializableEvent};
pub use events::{DiagnosticEvent, DiagnosticEventKind, StudyOperation, UserAction};

pub use crate::domain::diagnostics::BufferCapacity;

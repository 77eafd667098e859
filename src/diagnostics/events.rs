// SPDX-License-Identifier: MPL-2.0
//! Diagnostic event types.

use std::time::Instant;

use serde::{Deserialize, Serialize};

/// User-initiated actions recorded for diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum UserAction {
    // ==========================================================================
    // Navigation
    // ==========================================================================
    NavigateNext,
    NavigatePrevious,

    /// Direct jump through the slider.
    JumpToImage { index: usize },

    /// One coalesced wheel burst.
    WheelStep {
        /// Net wheel delta accumulated during the burst.
        delta: f32,
    },

    // ==========================================================================
    // Presentation
    // ==========================================================================
    SetContrast { percent: f32 },
    SetBrightness { percent: f32 },
    SetScale { factor: f32 },
    ToggleInvert,
    ResetAdjustments,

    // ==========================================================================
    // Study
    // ==========================================================================
    /// Explicit reload from the error state.
    RetryLoad,

    ExportImage {
        /// Chosen file extension (`png`, `jpg`).
        format: String,
    },
}

/// Timed operations performed on behalf of the viewer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum StudyOperation {
    /// The image list was fetched.
    FetchSequence { image_count: usize, duration_ms: u64 },

    /// One image was retrieved and decoded.
    LoadImage {
        index: usize,
        size_bytes: usize,
        duration_ms: u64,
    },

    /// Original bytes were written to disk.
    ExportImage { size_bytes: usize },
}

/// A diagnostic event with timestamp.
#[derive(Debug, Clone)]
pub struct DiagnosticEvent {
    /// Monotonic timestamp, converted to an offset on export.
    pub timestamp: Instant,
    pub kind: DiagnosticEventKind,
}

impl DiagnosticEvent {
    #[must_use]
    pub fn new(kind: DiagnosticEventKind) -> Self {
        Self {
            timestamp: Instant::now(),
            kind,
        }
    }

    #[must_use]
    pub fn with_timestamp(kind: DiagnosticEventKind, timestamp: Instant) -> Self {
        Self { timestamp, kind }
    }
}

/// The type and associated data for a diagnostic event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DiagnosticEventKind {
    UserAction {
        action: UserAction,
        #[serde(skip_serializing_if = "Option::is_none")]
        details: Option<String>,
    },

    Operation { operation: StudyOperation },

    /// Non-critical issue (failed prefetch, ignored export).
    Warning { message: String },

    /// Failure visible to the user.
    Error { message: String },
}

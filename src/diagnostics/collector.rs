// SPDX-License-Identifier: MPL-2.0
//! Diagnostics collector for aggregating and storing diagnostic events.
//!
//! The UI thread owns the [`DiagnosticsCollector`] and logs to it directly.
//! Background tasks receive a [`DiagnosticsHandle`] and send over a bounded
//! channel that the collector drains on each update.

use std::path::Path;
use std::time::Instant;

use chrono::{DateTime, Utc};
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use serde::Serialize;

use super::{
    BufferCapacity, CircularBuffer, DiagnosticEvent, DiagnosticEventKind, StudyOperation,
    UserAction,
};
use crate::error::{Error, Result};

/// Channel slots between background tasks and the collector.
const DEFAULT_CHANNEL_CAPACITY: usize = 100;

/// Handle for sending diagnostic events to the collector.
///
/// Cheap to clone and `Send`. The `log_*` methods never block: when the
/// channel is full the event is dropped and reported on stderr.
#[derive(Clone, Debug)]
pub struct DiagnosticsHandle {
    event_tx: Sender<DiagnosticEvent>,
}

impl DiagnosticsHandle {
    pub fn log_action(&self, action: UserAction) {
        self.send(DiagnosticEventKind::UserAction {
            action,
            details: None,
        });
    }

    pub fn log_operation(&self, operation: StudyOperation) {
        self.send(DiagnosticEventKind::Operation { operation });
    }

    pub fn log_warning(&self, message: impl Into<String>) {
        self.send(DiagnosticEventKind::Warning {
            message: message.into(),
        });
    }

    pub fn log_error(&self, message: impl Into<String>) {
        self.send(DiagnosticEventKind::Error {
            message: message.into(),
        });
    }

    /// Sends an event without blocking.
    ///
    /// # Errors
    ///
    /// Returns `TrySendError::Full` if the channel buffer is full, or
    /// `TrySendError::Disconnected` if the collector has been dropped.
    pub fn try_log(&self, kind: DiagnosticEventKind) -> std::result::Result<(), TrySendError<DiagnosticEvent>> {
        self.event_tx.try_send(DiagnosticEvent::new(kind))
    }

    fn send(&self, kind: DiagnosticEventKind) {
        match self.try_log(kind) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                eprintln!("[diagnostics] channel full, dropped event: {:?}", event.kind);
            }
            // Collector gone: the application is shutting down
            Err(TrySendError::Disconnected(_)) => {}
        }
    }
}

/// Event with a timestamp relative to the start of collection.
#[derive(Debug, Clone, Serialize)]
pub struct SerializableEvent {
    pub timestamp_ms: u64,
    #[serde(flatten)]
    pub kind: DiagnosticEventKind,
}

/// JSON document produced by [`DiagnosticsCollector::export_json`].
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticReport {
    pub app_version: String,
    pub generated_at: String,
    pub collection_started_at: String,
    pub collection_duration_ms: u64,
    pub event_count: usize,
    pub events: Vec<SerializableEvent>,
}

/// Central collector for diagnostic events.
pub struct DiagnosticsCollector {
    buffer: CircularBuffer<DiagnosticEvent>,
    event_rx: Receiver<DiagnosticEvent>,
    event_tx: Sender<DiagnosticEvent>,
    collection_started_at: Instant,
    collection_started_at_utc: DateTime<Utc>,
}

impl DiagnosticsCollector {
    #[must_use]
    pub fn new(capacity: BufferCapacity) -> Self {
        let (event_tx, event_rx) = bounded(DEFAULT_CHANNEL_CAPACITY);

        Self {
            buffer: CircularBuffer::new(capacity),
            event_rx,
            event_tx,
            collection_started_at: Instant::now(),
            collection_started_at_utc: Utc::now(),
        }
    }

    /// Creates a handle for background tasks.
    #[must_use]
    pub fn handle(&self) -> DiagnosticsHandle {
        DiagnosticsHandle {
            event_tx: self.event_tx.clone(),
        }
    }

    /// Moves every pending channel event into the buffer.
    pub fn process_pending(&mut self) {
        while let Ok(event) = self.event_rx.try_recv() {
            self.buffer.push(event);
        }
    }

    pub fn log_action(&mut self, action: UserAction) {
        self.log_action_with_details(action, None);
    }

    pub fn log_action_with_details(&mut self, action: UserAction, details: Option<String>) {
        self.push(DiagnosticEventKind::UserAction { action, details });
    }

    pub fn log_operation(&mut self, operation: StudyOperation) {
        self.push(DiagnosticEventKind::Operation { operation });
    }

    pub fn log_warning(&mut self, message: impl Into<String>) {
        self.push(DiagnosticEventKind::Warning {
            message: message.into(),
        });
    }

    /// Records an error and mirrors it to stderr.
    pub fn log_error(&mut self, message: impl Into<String>) {
        let message = message.into();
        eprintln!("[study_lens] {message}");
        self.push(DiagnosticEventKind::Error { message });
    }

    fn push(&mut self, kind: DiagnosticEventKind) {
        self.buffer.push(DiagnosticEvent::new(kind));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Iterates stored events, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &DiagnosticEvent> {
        self.buffer.iter()
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// Serializes the buffer as a pretty-printed JSON report.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn export_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.build_report())
    }

    /// Writes the JSON report to `path`, creating parent directories.
    pub fn export_to_file(&self, path: &Path) -> Result<()> {
        let json = self
            .export_json()
            .map_err(|err| Error::Io(err.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)?;
        Ok(())
    }

    #[allow(clippy::cast_possible_truncation)] // Duration in ms fits comfortably in u64
    fn build_report(&self) -> DiagnosticReport {
        let events: Vec<SerializableEvent> = self
            .buffer
            .iter()
            .map(|event| SerializableEvent {
                timestamp_ms: event
                    .timestamp
                    .saturating_duration_since(self.collection_started_at)
                    .as_millis() as u64,
                kind: event.kind.clone(),
            })
            .collect();

        DiagnosticReport {
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            generated_at: Utc::now().to_rfc3339(),
            collection_started_at: self.collection_started_at_utc.to_rfc3339(),
            collection_duration_ms: self.collection_started_at.elapsed().as_millis() as u64,
            event_count: events.len(),
            events,
        }
    }
}

impl Default for DiagnosticsCollector {
    fn default() -> Self {
        Self::new(BufferCapacity::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_events_arrive_after_processing() {
        let mut collector = DiagnosticsCollector::default();
        let handle = collector.handle();

        handle.log_action(UserAction::NavigateNext);
        handle.log_warning("prefetch of image 4 failed");
        assert!(collector.is_empty());

        collector.process_pending();
        assert_eq!(collector.len(), 2);
    }

    #[test]
    fn full_channel_rejects_instead_of_blocking() {
        let mut collector = DiagnosticsCollector::default();
        let handle = collector.handle();

        for index in 0..DEFAULT_CHANNEL_CAPACITY {
            handle
                .try_log(DiagnosticEventKind::UserAction {
                    action: UserAction::JumpToImage { index },
                    details: None,
                })
                .expect("channel has room");
        }
        let overflow = handle.try_log(DiagnosticEventKind::Warning {
            message: "one too many".into(),
        });
        assert!(matches!(overflow, Err(TrySendError::Full(_))));

        // Dropping path must not panic either
        handle.log_warning("dropped");
        collector.process_pending();
        assert_eq!(collector.len(), DEFAULT_CHANNEL_CAPACITY);
    }

    #[test]
    fn dropped_collector_disconnects_handles() {
        let collector = DiagnosticsCollector::default();
        let handle = collector.handle();
        drop(collector);

        let result = handle.try_log(DiagnosticEventKind::Warning {
            message: "late".into(),
        });
        assert!(matches!(result, Err(TrySendError::Disconnected(_))));
        handle.log_error("late error");
    }

    #[test]
    fn handle_is_usable_from_other_threads() {
        let mut collector = DiagnosticsCollector::default();
        let handle = collector.handle();

        std::thread::spawn(move || {
            handle.log_operation(StudyOperation::LoadImage {
                index: 1,
                size_bytes: 2048,
                duration_ms: 3,
            });
        })
        .join()
        .expect("thread panicked");

        collector.process_pending();
        assert_eq!(collector.len(), 1);
    }

    #[test]
    fn export_json_contains_metadata_and_events() {
        let mut collector = DiagnosticsCollector::default();
        collector.log_action(UserAction::ToggleInvert);
        collector.log_operation(StudyOperation::FetchSequence {
            image_count: 5,
            duration_ms: 12,
        });

        let json = collector.export_json().expect("export should succeed");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");
        assert_eq!(value["event_count"], 2);
        assert_eq!(value["events"][0]["type"], "user_action");
        assert_eq!(value["events"][1]["operation"]["image_count"], 5);
        assert!(value["collection_started_at"].is_string());
    }

    #[test]
    fn export_to_file_writes_report() {
        let temp_dir = tempfile::tempdir().expect("failed to create temp dir");
        let path = temp_dir.path().join("reports").join("diagnostics.json");
        let mut collector = DiagnosticsCollector::default();
        collector.log_warning("export ignored: no image");

        collector.export_to_file(&path).expect("export should succeed");
        let content = std::fs::read_to_string(&path).expect("report should exist");
        assert!(content.contains("export ignored"));
    }
}

//! Status reporting for a generation run
//!
//! The orchestrator pushes each transition to a [`StatusSink`]. Sinks show
//! only the latest status; [`RecordingSink`] additionally keeps every
//! transition so tests can assert on the sequence.

use crate::models::{StatusKind, StatusMessage};
use std::sync::{Arc, Mutex};

pub const ENHANCING: &str = "Enhancing prompt...";
pub const GENERATING: &str = "Generating image...";
pub const GENERATED: &str = "Image generated successfully!";

pub trait StatusSink: Send + Sync {
    fn report(&self, status: StatusMessage);
}

/// Writes each transition to the log.
pub struct TracingSink;

impl StatusSink for TracingSink {
    fn report(&self, status: StatusMessage) {
        match status.kind {
            StatusKind::Info => tracing::info!("{}", status.text),
            StatusKind::Success => tracing::info!("✔ {}", status.text),
            StatusKind::Error => tracing::error!("✘ {}", status.text),
        }
    }
}

/// Holds the current status only; each report overwrites the previous one.
#[derive(Clone, Default)]
pub struct LatestStatus {
    current: Arc<Mutex<Option<StatusMessage>>>,
}

impl LatestStatus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<StatusMessage> {
        self.current.lock().ok().and_then(|current| current.clone())
    }
}

impl StatusSink for LatestStatus {
    fn report(&self, status: StatusMessage) {
        if let Ok(mut current) = self.current.lock() {
            *current = Some(status);
        }
    }
}

#[derive(Clone, Default)]
pub struct RecordingSink {
    history: Arc<Mutex<Vec<StatusMessage>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> Vec<StatusMessage> {
        self.history.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<StatusMessage> {
        self.history.lock().unwrap().last().cloned()
    }
}

impl StatusSink for RecordingSink {
    fn report(&self, status: StatusMessage) {
        self.history.lock().unwrap().push(status);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_status_overwrites() {
        let sink = LatestStatus::new();
        assert!(sink.current().is_none());

        sink.report(StatusMessage::info(GENERATING));
        sink.report(StatusMessage::error("invalid key"));

        assert_eq!(sink.current(), Some(StatusMessage::error("invalid key")));
    }

    #[test]
    fn test_recording_sink_keeps_order() {
        let sink = RecordingSink::new();
        sink.report(StatusMessage::info(ENHANCING));
        sink.report(StatusMessage::info(GENERATING));
        sink.report(StatusMessage::success(GENERATED));

        let kinds: Vec<StatusKind> = sink.history().iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![StatusKind::Info, StatusKind::Info, StatusKind::Success]
        );
        assert_eq!(sink.last(), Some(StatusMessage::success(GENERATED)));
    }
}

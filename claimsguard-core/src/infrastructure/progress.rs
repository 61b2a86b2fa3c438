// claimsguard-core/src/infrastructure/progress.rs

use std::sync::Mutex;
use tracing::{error, info, warn};

use crate::ports::progress::{ProgressLevel, ProgressSink};

/// Forwards progress to `tracing`, prefixed with the workflow id.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingProgress;

impl ProgressSink for TracingProgress {
    fn emit(&self, workflow_id: &str, level: ProgressLevel, message: &str) {
        match level {
            ProgressLevel::Info => info!("[{}] {}", workflow_id, message),
            ProgressLevel::Warning => warn!("[{}] {}", workflow_id, message),
            ProgressLevel::Error => error!("[{}] {}", workflow_id, message),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProgressEvent {
    pub workflow_id: String,
    pub level: ProgressLevel,
    pub message: String,
}

/// Keeps every event in memory so tests can assert on what operators would see.
#[derive(Debug, Default)]
pub struct RecordingProgress {
    events: Mutex<Vec<ProgressEvent>>,
}

impl RecordingProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    pub fn messages_at(&self, level: ProgressLevel) -> Vec<String> {
        self.events()
            .into_iter()
            .filter(|e| e.level == level)
            .map(|e| e.message)
            .collect()
    }
}

impl ProgressSink for RecordingProgress {
    fn emit(&self, workflow_id: &str, level: ProgressLevel, message: &str) {
        if let Ok(mut events) = self.events.lock() {
            events.push(ProgressEvent {
                workflow_id: workflow_id.to_string(),
                level,
                message: message.to_string(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_sink_keeps_order_and_level() {
        let sink = RecordingProgress::new();
        sink.emit("wf", ProgressLevel::Info, "Validating members...");
        sink.emit("wf", ProgressLevel::Warning, "Too many mismatches");

        let events = sink.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].message, "Validating members...");
        assert_eq!(
            sink.messages_at(ProgressLevel::Warning),
            vec!["Too many mismatches".to_string()]
        );
    }

    #[test]
    fn test_tracing_sink_does_not_panic_without_subscriber() {
        TracingProgress.emit("wf", ProgressLevel::Error, "boom");
    }
}

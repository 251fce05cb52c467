//! Frame history tracking for debugging and diagnostics.

use std::collections::VecDeque;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::serial::SerialCommand;

/// Outcome of one frame written to the serial link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrameOutcome {
    Sent,
    Failed,
}

/// A recorded frame in the history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameEntry {
    pub outcome: FrameOutcome,
    pub command: SerialCommand,
    /// Seconds since history creation
    pub timestamp: f64,
}

/// Bounded log of recent frames.
#[derive(Debug, Clone)]
pub struct FrameHistory {
    entries: VecDeque<FrameEntry>,
    sent: u64,
    failed: u64,
    last_error: Option<String>,
    last_sent: Option<Instant>,
    start_time: Instant,
    max_entries: usize,
}

impl Default for FrameHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameHistory {
    pub const DEFAULT_MAX_ENTRIES: usize = 100;

    pub fn new() -> Self {
        Self {
            entries: VecDeque::new(),
            sent: 0,
            failed: 0,
            last_error: None,
            last_sent: None,
            start_time: Instant::now(),
            max_entries: Self::DEFAULT_MAX_ENTRIES,
        }
    }

    pub fn with_max_entries(max_entries: usize) -> Self {
        Self {
            max_entries,
            ..Self::new()
        }
    }

    pub fn record_sent(&mut self, command: SerialCommand) {
        self.sent += 1;
        self.last_sent = Some(Instant::now());
        self.push(FrameOutcome::Sent, command);
    }

    pub fn record_error(&mut self, command: SerialCommand, error: &str) {
        self.failed += 1;
        self.last_error = Some(error.to_string());
        self.push(FrameOutcome::Failed, command);
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn entries(&self) -> impl Iterator<Item = &FrameEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.last_error = None;
    }

    pub fn summary(&self) -> SerialDiagnostics {
        SerialDiagnostics {
            frames_sent: self.sent,
            frames_failed: self.failed,
            time_since_last_frame: self.last_sent.map(|t| t.elapsed().as_secs_f64()),
            last_error: self.last_error.clone(),
        }
    }

    fn push(&mut self, outcome: FrameOutcome, command: SerialCommand) {
        self.entries.push_back(FrameEntry {
            outcome,
            command,
            timestamp: self.start_time.elapsed().as_secs_f64(),
        });
        while self.entries.len() > self.max_entries {
            self.entries.pop_front();
        }
    }
}

/// Diagnostics for the serial link.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerialDiagnostics {
    pub frames_sent: u64,
    pub frames_failed: u64,
    pub time_since_last_frame: Option<f64>,
    pub last_error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_frame() {
        let mut history = FrameHistory::new();
        history.record_sent(SerialCommand::new(1, 2, 3, 4));

        assert_eq!(history.len(), 1);
        let summary = history.summary();
        assert_eq!(summary.frames_sent, 1);
        assert!(summary.time_since_last_frame.is_some());
    }

    #[test]
    fn test_record_error() {
        let mut history = FrameHistory::new();
        history.record_error(SerialCommand::OFF, "broken pipe");
        assert_eq!(history.last_error(), Some("broken pipe"));
        assert_eq!(history.summary().frames_failed, 1);
        assert_eq!(history.summary().time_since_last_frame, None);
    }

    #[test]
    fn test_max_entries() {
        let mut history = FrameHistory::with_max_entries(2);
        for i in 0..5 {
            history.record_sent(SerialCommand::new(i, 0, 0, 0));
        }
        assert_eq!(history.len(), 2);
        let reds: Vec<u8> = history.entries().map(|e| e.command.red()).collect();
        assert_eq!(reds, vec![3, 4]);
        assert_eq!(history.summary().frames_sent, 5);
    }
}

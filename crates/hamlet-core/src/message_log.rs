//! Bounded log of committed speech and operator events.
//!
//! Oldest entries are evicted once the log is at capacity. Internal
//! diagnostics go to `tracing`, never here.

use std::collections::VecDeque;
use std::fmt;

use serde::Serialize;

/// One log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    /// Who said it, if anyone.
    pub speaker: Option<String>,
    /// What was said.
    pub text: String,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.speaker {
            Some(speaker) => write!(f, "{speaker}: {}", self.text),
            None => f.write_str(&self.text),
        }
    }
}

/// A fixed-capacity FIFO of [`LogEntry`] values.
#[derive(Debug, Clone)]
pub struct MessageLog {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl MessageLog {
    /// Create an empty log. A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append an entry, evicting the oldest when full.
    pub fn push(&mut self, speaker: Option<&str>, text: impl Into<String>) {
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(LogEntry {
            speaker: speaker.map(str::to_owned),
            text: text.into(),
        });
    }

    /// Entries from oldest to newest.
    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    /// Entries rendered as `speaker: text`, oldest first.
    pub fn lines(&self) -> Vec<String> {
        self.entries.iter().map(ToString::to_string).collect()
    }

    /// Number of entries currently held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the log holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of entries retained.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evicts_oldest_at_capacity() {
        let mut log = MessageLog::new(3);
        for i in 0..5 {
            log.push(Some("Ada"), format!("line {i}"));
        }
        assert_eq!(log.len(), 3);
        assert_eq!(log.lines(), vec!["Ada: line 2", "Ada: line 3", "Ada: line 4"]);
    }

    #[test]
    fn speakerless_entry_renders_bare() {
        let mut log = MessageLog::new(2);
        log.push(None, "Dawn breaks.");
        assert_eq!(log.lines(), vec!["Dawn breaks."]);
    }

    #[test]
    fn zero_capacity_keeps_latest() {
        let mut log = MessageLog::new(0);
        log.push(Some("Gus"), "one");
        log.push(Some("Gus"), "two");
        assert_eq!(log.capacity(), 1);
        assert_eq!(log.lines(), vec!["Gus: two"]);
    }
}

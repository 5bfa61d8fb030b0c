//! Bounded trace of human-readable game events.

use im::Vector;
use serde::{Deserialize, Serialize};

/// Ring buffer of log lines. The oldest line is evicted on overflow.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLog {
    capacity: usize,
    entries: Vector<String>,
}

impl EventLog {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: Vector::new(),
        }
    }

    /// Append a line, evicting from the front past capacity.
    pub fn push(&mut self, line: impl Into<String>) {
        self.entries.push_back(line.into());
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    /// The last `n` lines, oldest first.
    #[must_use]
    pub fn recent(&self, n: usize) -> Vec<String> {
        let skip = self.entries.len().saturating_sub(n);
        self.entries.iter().skip(skip).cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_recent() {
        let mut log = EventLog::new(5);
        assert!(log.is_empty());

        log.push("a");
        log.push("b");
        log.push("c");

        assert_eq!(log.len(), 3);
        assert_eq!(log.recent(2), vec!["b", "c"]);
        assert_eq!(log.recent(10), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_evicts_oldest() {
        let mut log = EventLog::new(3);
        for i in 0..7 {
            log.push(format!("line {}", i));
        }

        assert_eq!(log.len(), 3);
        let lines: Vec<_> = log.iter().cloned().collect();
        assert_eq!(lines, vec!["line 4", "line 5", "line 6"]);
    }

    #[test]
    fn test_zero_capacity_clamped() {
        let mut log = EventLog::new(0);
        log.push("x");
        log.push("y");
        assert_eq!(log.capacity(), 1);
        assert_eq!(log.recent(5), vec!["y"]);
    }
}

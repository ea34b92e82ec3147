//! Recently issued commands.

use std::collections::VecDeque;

/// Commands that never enter the history.
const UNRECORDED: &[&str] = &["help", "history"];

/// The most recent distinct command names, newest last.
///
/// Re-issuing a command moves it to the end instead of adding a second
/// entry, so the history always shows `capacity` different commands.
#[derive(Debug, Clone)]
pub struct History {
    capacity: usize,
    entries: VecDeque<String>,
}

impl History {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    /// Record a successfully executed command.
    pub fn record(&mut self, command: &str) {
        if self.capacity == 0 || UNRECORDED.contains(&command) {
            return;
        }
        if let Some(pos) = self.entries.iter().position(|c| c == command) {
            self.entries.remove(pos);
        }
        self.entries.push_back(command.to_string());
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    /// Oldest first.
    pub fn entries(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(history: &History) -> Vec<&str> {
        history.entries().collect()
    }

    #[test]
    fn test_records_in_order() {
        let mut history = History::new(15);
        history.record("add");
        history.record("show");
        assert_eq!(names(&history), vec!["add", "show"]);
    }

    #[test]
    fn test_help_and_history_are_skipped() {
        let mut history = History::new(15);
        history.record("help");
        history.record("history");
        assert!(history.is_empty());
    }

    #[test]
    fn test_repeat_moves_to_end() {
        let mut history = History::new(15);
        history.record("add");
        history.record("show");
        history.record("add");
        assert_eq!(names(&history), vec!["show", "add"]);
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let mut history = History::new(2);
        history.record("info");
        history.record("show");
        history.record("clear");
        assert_eq!(names(&history), vec!["show", "clear"]);
        assert_eq!(history.len(), 2);
    }
}

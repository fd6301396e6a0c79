// ── Bounded log store ──
//
// Append-only FIFO of `LogEntry` values. Every operation holds the lock for
// a single push, copy or clear, so readers never see a half-applied append
// and never wait on device I/O.

use std::collections::VecDeque;

use parking_lot::Mutex;

use crate::model::{LogEntry, LogLevel};

/// Entries retained before the oldest are evicted.
pub const LOG_CAPACITY: usize = 500;

/// Thread-safe bounded log. Shared between the session and log readers.
#[derive(Debug)]
pub struct LogStore {
    entries: Mutex<VecDeque<LogEntry>>,
    capacity: usize,
}

impl Default for LogStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LogStore {
    pub fn new() -> Self {
        Self::with_capacity(LOG_CAPACITY)
    }

    /// Store holding at most `capacity` entries (minimum 1).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    pub fn append(&self, entry: LogEntry) {
        let mut entries = self.entries.lock();
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.append(LogEntry::new(LogLevel::Info, message));
    }

    pub fn error(&self, message: impl Into<String>) {
        self.append(LogEntry::new(LogLevel::Error, message));
    }

    /// Snapshot of every entry, oldest first.
    pub fn list(&self) -> Vec<LogEntry> {
        self.entries.lock().iter().cloned().collect()
    }

    /// The newest `n` entries, oldest first.
    pub fn recent(&self, n: usize) -> Vec<LogEntry> {
        let entries = self.entries.lock();
        let skip = entries.len().saturating_sub(n);
        entries.iter().skip(skip).cloned().collect()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use pretty_assertions::assert_eq;

    fn messages(store: &LogStore) -> Vec<String> {
        store.list().into_iter().map(|e| e.message).collect()
    }

    #[test]
    fn evicts_oldest_first() {
        let store = LogStore::with_capacity(3);
        for i in 0..5 {
            store.info(format!("entry {i}"));
        }
        assert_eq!(store.len(), 3);
        assert_eq!(messages(&store), vec!["entry 2", "entry 3", "entry 4"]);
    }

    #[test]
    fn default_capacity_is_bounded() {
        let store = LogStore::new();
        for i in 0..(LOG_CAPACITY + 25) {
            store.error(format!("e{i}"));
        }
        let entries = store.list();
        assert_eq!(entries.len(), LOG_CAPACITY);
        assert_eq!(entries.first().unwrap().message, "e25");
        assert_eq!(entries.last().unwrap().message, format!("e{}", LOG_CAPACITY + 24));
    }

    #[test]
    fn recent_returns_tail_in_order() {
        let store = LogStore::with_capacity(10);
        for i in 0..6 {
            store.info(format!("{i}"));
        }
        let tail: Vec<String> = store.recent(2).into_iter().map(|e| e.message).collect();
        assert_eq!(tail, vec!["4", "5"]);
        assert_eq!(store.recent(50).len(), 6);
    }

    #[test]
    fn clear_empties_store() {
        let store = LogStore::new();
        store.info("a");
        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.capacity(), LOG_CAPACITY);
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let store = LogStore::with_capacity(0);
        store.info("a");
        store.info("b");
        assert_eq!(messages(&store), vec!["b"]);
    }

    #[test]
    fn concurrent_appends_are_not_lost() {
        let store = Arc::new(LogStore::with_capacity(1000));
        let writers: Vec<_> = (0..4)
            .map(|t| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for i in 0..100 {
                        store.info(format!("{t}-{i}"));
                    }
                })
            })
            .collect();
        for w in writers {
            w.join().unwrap();
        }

        let entries = store.list();
        assert_eq!(entries.len(), 400);
        let mut unique: Vec<_> = entries.iter().map(|e| e.message.clone()).collect();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), 400);
    }
}

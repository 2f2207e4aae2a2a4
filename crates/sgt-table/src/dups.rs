//! Back-references for Hall symbols that recur in the table.

use std::collections::HashMap;

/// First sequence index of every Hall symbol seen so far.
#[derive(Debug, Clone, Default)]
pub struct DuplicateTracker {
    first: HashMap<String, usize>,
}

impl DuplicateTracker {
    /// Records `hall` at `sequence_index`.
    ///
    /// Returns the index of the earlier row with the same symbol, if any.
    pub fn check(&mut self, hall: &str, sequence_index: usize) -> Option<usize> {
        let first = *self
            .first
            .entry(hall.trim().to_string())
            .or_insert(sequence_index);
        (first != sequence_index).then_some(first)
    }

    /// Number of distinct symbols.
    pub fn len(&self) -> usize {
        self.first.len()
    }

    /// Whether no symbol has been recorded.
    pub fn is_empty(&self) -> bool {
        self.first.is_empty()
    }
}

//! The list value type: a double-ended sequence of byte strings.

use std::collections::VecDeque;

use bytes::Bytes;

/// Backing value for list keys. Supports push/pop at both ends and the
/// inclusive index-range read LRANGE needs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListValue {
    items: VecDeque<Bytes>,
}

impl ListValue {
    pub fn new() -> Self {
        ListValue {
            items: VecDeque::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn push_front(&mut self, value: Bytes) {
        self.items.push_front(value);
    }

    pub fn push_back(&mut self, value: Bytes) {
        self.items.push_back(value);
    }

    pub fn pop_front(&mut self) -> Option<Bytes> {
        self.items.pop_front()
    }

    pub fn pop_back(&mut self) -> Option<Bytes> {
        self.items.pop_back()
    }

    /// Inclusive slice with Redis index semantics.
    ///
    /// Negative indexes count from the tail (`-1` is the last element).
    /// After resolution, `start` is clamped to the head and `end` to the
    /// tail; an empty vector is returned when `start` lands past the end of
    /// the list or past `end`.
    pub fn range(&self, start: i64, end: i64) -> Vec<Bytes> {
        let len = self.items.len() as i64;
        if len == 0 {
            return Vec::new();
        }

        let mut start = if start < 0 { len + start } else { start };
        let mut end = if end < 0 { len + end } else { end };

        start = start.max(0);
        end = end.min(len - 1);

        if start >= len || start > end {
            return Vec::new();
        }

        self.items
            .range(start as usize..=end as usize)
            .cloned()
            .collect()
    }
}

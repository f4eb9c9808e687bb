use std::collections::VecDeque;

/// Append-only sequence with an optional cap. Once full, the oldest entry
/// is evicted; `total_appended` keeps counting across evictions.
#[derive(Debug, Clone)]
pub struct Retained<T> {
    items: VecDeque<T>,
    /// 0 = unbounded.
    capacity: usize,
    total_appended: u64,
}

impl<T: Clone> Retained<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
            total_appended: 0,
        }
    }

    pub fn push(&mut self, item: T) {
        self.items.push_back(item);
        self.total_appended += 1;
        if self.capacity > 0 {
            while self.items.len() > self.capacity {
                self.items.pop_front();
            }
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn total_appended(&self) -> u64 {
        self.total_appended
    }

    pub fn last(&self) -> Option<&T> {
        self.items.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    /// Oldest-first copy of what is retained.
    pub fn to_vec(&self) -> Vec<T> {
        self.items.iter().cloned().collect()
    }

    /// The most recent `limit` entries, oldest first.
    pub fn recent(&self, limit: usize) -> Vec<T> {
        let start = self.items.len().saturating_sub(limit);
        self.items.iter().skip(start).cloned().collect()
    }
}

//! Facilitator-curated top-N ranking

use serde::{Deserialize, Serialize};

/// Ranks carried into the goal texts unless configured otherwise
pub const DEFAULT_TOP_N: usize = 3;

/// Ordered list of at most `capacity` cluster ids; position 0 is rank 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ranking {
    capacity: usize,
    entries: Vec<String>,
}

impl Default for Ranking {
    fn default() -> Self {
        Self::new(DEFAULT_TOP_N)
    }
}

impl Ranking {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Vec::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|e| e == id)
    }

    /// 1-based rank of an entry
    pub fn rank_of(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|e| e == id).map(|i| i + 1)
    }

    /// Append at the lowest rank. No-op when full or already ranked.
    pub fn add(&mut self, id: impl Into<String>) -> bool {
        let id = id.into();
        if self.is_full() || self.contains(&id) {
            return false;
        }
        self.entries.push(id);
        true
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e != id);
        self.entries.len() != before
    }

    pub fn move_up(&mut self, id: &str) -> bool {
        match self.entries.iter().position(|e| e == id) {
            Some(i) if i > 0 => {
                self.entries.swap(i, i - 1);
                true
            }
            _ => false,
        }
    }

    pub fn move_down(&mut self, id: &str) -> bool {
        match self.entries.iter().position(|e| e == id) {
            Some(i) if i + 1 < self.entries.len() => {
                self.entries.swap(i, i + 1);
                true
            }
            _ => false,
        }
    }

    /// Drop `id` onto the position currently held by `target`.
    pub fn move_onto(&mut self, id: &str, target: &str) -> bool {
        let (Some(from), Some(to)) = (
            self.entries.iter().position(|e| e == id),
            self.entries.iter().position(|e| e == target),
        ) else {
            return false;
        };
        if from == to {
            return false;
        }
        let moved = self.entries.remove(from);
        self.entries.insert(to, moved);
        true
    }

    /// `(rank, id)` pairs, rank starting at 1
    pub fn ranked(&self) -> impl Iterator<Item = (usize, &str)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, id)| (i + 1, id.as_str()))
    }
}

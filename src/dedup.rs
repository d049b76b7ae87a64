// src/dedup.rs
use std::collections::{HashSet, VecDeque};

/// Dedup keys are trimmed and case-folded so that cosmetic differences
/// (stray whitespace, capitalization) don't produce duplicate deliveries.
pub fn normalize_key(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Bounded set of already-emitted identifiers for one logical stream
/// (news keys, social-post ids, match-event keys).
///
/// Once capacity is reached the oldest key is evicted, keeping memory flat
/// over a long-running process. Each instance is owned by exactly one
/// component; no locking.
#[derive(Debug)]
pub struct SeenSet {
    cap: usize,
    order: VecDeque<String>,
    keys: HashSet<String>,
}

impl SeenSet {
    pub fn with_capacity(cap: usize) -> Self {
        let cap = cap.max(1);
        Self {
            cap,
            order: VecDeque::with_capacity(cap),
            keys: HashSet::with_capacity(cap),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(&normalize_key(key))
    }

    /// Record `key` as seen. Returns `true` when the key was new
    /// (i.e. the caller should emit), `false` when already seen.
    pub fn insert(&mut self, key: &str) -> bool {
        let k = normalize_key(key);
        if self.keys.contains(&k) {
            return false;
        }
        if self.order.len() == self.cap {
            if let Some(oldest) = self.order.pop_front() {
                self.keys.remove(&oldest);
            }
        }
        self.order.push_back(k.clone());
        self.keys.insert(k);
        true
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_is_idempotent() {
        let mut seen = SeenSet::with_capacity(8);
        assert!(seen.insert("Gol de Curro"));
        assert!(!seen.insert("Gol de Curro"));
        assert!(!seen.insert("  gol de curro  ")); // normalized collision
        assert_eq!(seen.len(), 1);
    }

    #[test]
    fn capacity_evicts_oldest_first() {
        let mut seen = SeenSet::with_capacity(2);
        assert!(seen.insert("a"));
        assert!(seen.insert("b"));
        assert!(seen.insert("c")); // evicts "a"
        assert!(!seen.contains("a"));
        assert!(seen.contains("b"));
        assert!(seen.contains("c"));
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let mut seen = SeenSet::with_capacity(0);
        assert!(seen.insert("x"));
        assert!(!seen.insert("x"));
    }
}

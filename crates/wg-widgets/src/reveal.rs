//! One-shot reveal tracking for scroll-in fade effects

use std::hash::Hash;
use ahash::AHashSet;

pub const DEFAULT_REVEAL_THRESHOLD: f64 = 0.1;

/// Tracks which elements have been revealed.
///
/// An element is revealed the first time its visible fraction reaches the
/// threshold, after which it is no longer observed.
#[derive(Debug, Clone)]
pub struct RevealTracker<K: Hash + Eq> {
    threshold: f64,
    observed: AHashSet<K>,
    revealed: AHashSet<K>,
}

impl<K: Hash + Eq> Default for RevealTracker<K> {
    fn default() -> Self {
        Self::new(DEFAULT_REVEAL_THRESHOLD)
    }
}

impl<K: Hash + Eq> RevealTracker<K> {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
            observed: AHashSet::new(),
            revealed: AHashSet::new(),
        }
    }

    /// Start watching `key`; already revealed keys are ignored
    pub fn observe(&mut self, key: K) {
        if !self.revealed.contains(&key) {
            self.observed.insert(key);
        }
    }

    /// Report `key`'s visible fraction; returns `true` when this reveals it
    pub fn on_intersection(&mut self, key: &K, ratio: f64) -> bool {
        if !(ratio > 0.0 && ratio >= self.threshold) {
            return false;
        }

        match self.observed.take(key) {
            Some(key) => {
                self.revealed.insert(key);
                true
            }
            None => false,
        }
    }

    pub fn is_revealed(&self, key: &K) -> bool {
        self.revealed.contains(key)
    }

    pub fn is_observed(&self, key: &K) -> bool {
        self.observed.contains(key)
    }

    /// Keys still waiting to come into view
    pub fn pending(&self) -> usize {
        self.observed.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reveals_once() {
        let mut tracker = RevealTracker::default();
        tracker.observe("card-1");
        tracker.observe("card-2");

        assert!(!tracker.on_intersection(&"card-1", 0.05));
        assert!(tracker.on_intersection(&"card-1", 0.1));
        assert!(!tracker.on_intersection(&"card-1", 0.9));

        assert!(tracker.is_revealed(&"card-1"));
        assert!(!tracker.is_observed(&"card-1"));
        assert_eq!(tracker.pending(), 1);
    }

    #[test]
    fn test_unobserved_keys_are_ignored() {
        let mut tracker = RevealTracker::new(0.5);
        assert!(!tracker.on_intersection(&7u32, 1.0));
        assert!(!tracker.is_revealed(&7));

        tracker.observe(7);
        assert!(tracker.on_intersection(&7, 0.5));

        tracker.observe(7);
        assert_eq!(tracker.pending(), 0);
    }

    #[test]
    fn test_zero_threshold_needs_some_visibility() {
        let mut tracker = RevealTracker::new(0.0);
        tracker.observe('a');
        assert!(!tracker.on_intersection(&'a', 0.0));
        assert!(tracker.on_intersection(&'a', 0.01));
    }

    #[test]
    fn test_nan_ratio_does_not_reveal() {
        let mut tracker = RevealTracker::default();
        tracker.observe("banner");
        assert!(!tracker.on_intersection(&"banner", f64::NAN));
        assert!(tracker.is_observed(&"banner"));
        assert!(tracker.on_intersection(&"banner", 0.4));
    }
}

//! Named deferred jobs
//!
//! A job is a key with a deadline. Starting a job that is already pending
//! replaces its deadline; stopping it cancels it. The owner polls with the
//! current time and acts on the keys that came due, so no callback ever runs
//! behind the owner's back.

use std::hash::Hash;
use std::time::{Duration, Instant};

use rustc_hash::FxHashMap;

/// A set of pending named jobs
#[derive(Clone, Debug)]
pub struct JobQueue<K> {
    pending: FxHashMap<K, Instant>,
}

impl<K> Default for JobQueue<K> {
    fn default() -> Self {
        Self {
            pending: FxHashMap::default(),
        }
    }
}

impl<K: Eq + Hash + Clone> JobQueue<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `key` to come due `delay` after `now`, replacing any pending run
    pub fn start(&mut self, key: K, delay: Duration, now: Instant) {
        self.pending.insert(key, now + delay);
    }

    /// Cancel a pending job. Returns true if one was pending.
    pub fn stop(&mut self, key: &K) -> bool {
        self.pending.remove(key).is_some()
    }

    pub fn is_pending(&self, key: &K) -> bool {
        self.pending.contains_key(key)
    }

    /// Deadline of a pending job
    pub fn deadline(&self, key: &K) -> Option<Instant> {
        self.pending.get(key).copied()
    }

    /// Remove and return every job whose deadline is at or before `now`,
    /// earliest first
    pub fn take_due(&mut self, now: Instant) -> Vec<K> {
        let mut due: Vec<(K, Instant)> = self
            .pending
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(key, deadline)| (key.clone(), *deadline))
            .collect();
        due.sort_by_key(|(_, deadline)| *deadline);
        for (key, _) in &due {
            self.pending.remove(key);
        }
        due.into_iter().map(|(key, _)| key).collect()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

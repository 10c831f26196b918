//! Scheduled-task state with cancel-on-supersede semantics.
//!
//! Each timer kind has at most one deadline. Scheduling a kind again replaces
//! its deadline, so a burst of triggers collapses into one firing. Deadlines
//! use `tokio::time::Instant`, which lets tests drive them with a paused clock.

use std::collections::BTreeMap;
use std::time::Duration;

use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimerKind {
    /// Startup stabilization before listeners are registered.
    Startup,
    /// The single deferred style insertion retry.
    InsertRetry,
    /// Delayed re-apply after the page removed the style node.
    Reapply,
}

#[derive(Debug, Clone)]
pub struct Timers<K> {
    deadlines: BTreeMap<K, Instant>,
}

impl<K: Ord + Copy> Default for Timers<K> {
    fn default() -> Self {
        Self {
            deadlines: BTreeMap::new(),
        }
    }
}

impl<K: Ord + Copy> Timers<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire `kind` after `delay`, replacing any earlier deadline for it.
    pub fn schedule(&mut self, kind: K, delay: Duration) {
        self.schedule_at(kind, Instant::now() + delay);
    }

    pub fn schedule_at(&mut self, kind: K, deadline: Instant) {
        self.deadlines.insert(kind, deadline);
    }

    /// Returns whether `kind` was pending.
    pub fn cancel(&mut self, kind: K) -> bool {
        self.deadlines.remove(&kind).is_some()
    }

    pub fn is_scheduled(&self, kind: K) -> bool {
        self.deadlines.contains_key(&kind)
    }

    /// The earliest pending deadline.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.deadlines.values().min().copied()
    }

    /// Remove and return every kind due at `now`, earliest first.
    pub fn take_due(&mut self, now: Instant) -> Vec<K> {
        let mut due: Vec<(Instant, K)> = self
            .deadlines
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(kind, deadline)| (*deadline, *kind))
            .collect();
        due.sort();

        for (_, kind) in &due {
            self.deadlines.remove(kind);
        }
        due.into_iter().map(|(_, kind)| kind).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.deadlines.is_empty()
    }
}

//! Short-term perception memory.
//!
//! Remembers which object labels the robot has seen recently and across how
//! many observation frames each one has persisted.
//!
//! ## Model
//!
//! Each remembered label owns a [`MemoryEntry`]:
//!
//! * `frames_seen` – number of distinct observation calls in which the label
//!   appeared since it was last forgotten.  Duplicate detections inside one
//!   frame count once.
//! * `last_seen` – observation time of the most recent sighting.
//!
//! ### Forgetting
//!
//! [`MemoryStore::purge`] drops every entry whose `last_seen` is older than
//! `now - memory_length`.  Callers purge *before* applying the current
//! frame, so a label sitting on the window boundary is judged by its previous
//! sighting:
//!
//! ```text
//! forget(label)  ⇔  last_seen < now − memory_length
//! ```
//!
//! # Example
//!
//! ```rust
//! use chrono::{TimeDelta, TimeZone, Utc};
//! use sightline_memory::MemoryStore;
//! use sightline_types::Label;
//!
//! let mut memory = MemoryStore::new(TimeDelta::seconds(10));
//! let cup = Label::new("cup").unwrap();
//! let t0 = Utc.timestamp_opt(0, 0).unwrap();
//!
//! memory.update(&cup, t0);
//! memory.update(&cup, t0 + TimeDelta::seconds(1));
//! assert_eq!(memory.frames_seen(&cup), 2);
//!
//! // Twenty seconds of silence: the cup is forgotten.
//! memory.purge(t0 + TimeDelta::seconds(21));
//! assert_eq!(memory.frames_seen(&cup), 0);
//! ```

use std::collections::HashMap;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use sightline_types::Label;
use tracing::debug;

// ─────────────────────────────────────────────────────────────────────────────
// MemoryEntry
// ─────────────────────────────────────────────────────────────────────────────

/// What the robot remembers about a single label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryEntry {
    /// Number of observation frames the label appeared in (always ≥ 1).
    pub frames_seen: u32,
    /// Time of the most recent sighting.
    pub last_seen: DateTime<Utc>,
}

// ─────────────────────────────────────────────────────────────────────────────
// MemoryStore
// ─────────────────────────────────────────────────────────────────────────────

/// Time-bounded map of label → [`MemoryEntry`].
///
/// The store performs no I/O and never reads the clock; every time-dependent
/// call takes the observation time from the caller.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    /// Length of the sliding memory window.
    memory_length: TimeDelta,
    entries: HashMap<Label, MemoryEntry>,
}

impl MemoryStore {
    /// Create an empty store.  Negative windows are clamped to zero.
    pub fn new(memory_length: TimeDelta) -> Self {
        Self {
            memory_length: memory_length.max(TimeDelta::zero()),
            entries: HashMap::new(),
        }
    }

    /// Length of the sliding memory window.
    pub fn memory_length(&self) -> TimeDelta {
        self.memory_length
    }

    /// Forget every label whose last sighting is older than
    /// `now - memory_length`.
    ///
    /// Returns the forgotten labels, sorted.  A window reaching back past the
    /// earliest representable time forgets nothing.
    pub fn purge(&mut self, now: DateTime<Utc>) -> Vec<Label> {
        let Some(forget_before) = now.checked_sub_signed(self.memory_length) else {
            return Vec::new();
        };
        let mut forgotten: Vec<Label> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.last_seen < forget_before)
            .map(|(label, _)| label.clone())
            .collect();
        for label in &forgotten {
            self.entries.remove(label);
        }
        forgotten.sort();
        if !forgotten.is_empty() {
            debug!(count = forgotten.len(), %forget_before, "purged stale memory entries");
        }
        forgotten
    }

    /// Record one sighting of `label` at `now`.
    ///
    /// A label not yet in memory starts at `frames_seen = 1`; a remembered
    /// one is incremented and its `last_seen` refreshed.  Returns the new
    /// `frames_seen`.
    pub fn update(&mut self, label: &Label, now: DateTime<Utc>) -> u32 {
        match self.entries.get_mut(label) {
            Some(entry) => {
                entry.frames_seen = entry.frames_seen.saturating_add(1);
                entry.last_seen = now;
                entry.frames_seen
            }
            None => {
                self.entries.insert(
                    label.clone(),
                    MemoryEntry {
                        frames_seen: 1,
                        last_seen: now,
                    },
                );
                1
            }
        }
    }

    /// Number of frames `label` has been seen in, or `0` if it is not
    /// remembered.
    pub fn frames_seen(&self, label: &Label) -> u32 {
        self.entries.get(label).map_or(0, |e| e.frames_seen)
    }

    pub fn entry(&self, label: &Label) -> Option<&MemoryEntry> {
        self.entries.get(label)
    }

    /// All remembered labels, sorted.
    pub fn labels(&self) -> Vec<&Label> {
        let mut labels: Vec<&Label> = self.entries.keys().collect();
        labels.sort();
        labels
    }

    /// Forget everything.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn label(s: &str) -> Label {
        Label::new(s).unwrap()
    }

    fn store(secs: i64) -> MemoryStore {
        MemoryStore::new(TimeDelta::seconds(secs))
    }

    // ── update ───────────────────────────────────────────────────────────────

    #[test]
    fn first_update_creates_entry() {
        let mut memory = store(10);
        assert_eq!(memory.update(&label("cup"), at(0)), 1);

        let entry = memory.entry(&label("cup")).unwrap();
        assert_eq!(entry.frames_seen, 1);
        assert_eq!(entry.last_seen, at(0));
    }

    #[test]
    fn repeated_update_increments_and_refreshes() {
        let mut memory = store(10);
        memory.update(&label("cup"), at(0));
        memory.update(&label("cup"), at(3));
        assert_eq!(memory.update(&label("cup"), at(5)), 3);

        let entry = memory.entry(&label("cup")).unwrap();
        assert_eq!(entry.last_seen, at(5));
    }

    #[test]
    fn frames_seen_is_zero_for_unknown_label() {
        let memory = store(10);
        assert_eq!(memory.frames_seen(&label("ghost")), 0);
    }

    // ── purge ────────────────────────────────────────────────────────────────

    #[test]
    fn purge_forgets_entries_outside_window() {
        let mut memory = store(10);
        memory.update(&label("cup"), at(0));
        memory.update(&label("book"), at(15));

        let forgotten = memory.purge(at(20));
        assert_eq!(forgotten, vec![label("cup")]);
        assert_eq!(memory.frames_seen(&label("cup")), 0);
        assert_eq!(memory.frames_seen(&label("book")), 1);
    }

    #[test]
    fn purge_keeps_entry_exactly_on_boundary() {
        let mut memory = store(10);
        memory.update(&label("cup"), at(0));
        assert!(memory.purge(at(10)).is_empty());
        assert_eq!(memory.frames_seen(&label("cup")), 1);

        assert_eq!(memory.purge(at(11)).len(), 1);
        assert!(memory.is_empty());
    }

    #[test]
    fn forgotten_label_starts_over() {
        let mut memory = store(10);
        memory.update(&label("cup"), at(0));
        memory.update(&label("cup"), at(1));
        memory.purge(at(20));
        assert_eq!(memory.update(&label("cup"), at(20)), 1);
    }

    #[test]
    fn purge_on_empty_store_is_noop() {
        let mut memory = store(10);
        assert!(memory.purge(at(100)).is_empty());
    }

    #[test]
    fn zero_window_forgets_anything_older_than_now() {
        let mut memory = store(0);
        memory.update(&label("cup"), at(0));
        assert!(memory.purge(at(0)).is_empty());
        assert_eq!(memory.purge(at(1)), vec![label("cup")]);
    }

    #[test]
    fn negative_window_is_clamped() {
        let memory = store(-5);
        assert_eq!(memory.memory_length(), TimeDelta::zero());
    }

    #[test]
    fn unbounded_window_never_forgets() {
        let mut memory = MemoryStore::new(TimeDelta::MAX);
        memory.update(&label("cup"), at(0));
        assert!(memory.purge(at(0)).is_empty());
        assert!(memory.purge(at(1_000_000)).is_empty());
        assert_eq!(memory.frames_seen(&label("cup")), 1);
    }

    // ── introspection ────────────────────────────────────────────────────────

    #[test]
    fn labels_are_sorted() {
        let mut memory = store(10);
        memory.update(&label("pen"), at(0));
        memory.update(&label("book"), at(0));
        memory.update(&label("cup"), at(0));
        let labels: Vec<&str> = memory.labels().into_iter().map(Label::as_str).collect();
        assert_eq!(labels, vec!["book", "cup", "pen"]);
    }

    #[test]
    fn clear_and_len() {
        let mut memory = store(10);
        memory.update(&label("pen"), at(0));
        memory.update(&label("book"), at(0));
        assert_eq!(memory.len(), 2);
        memory.clear();
        assert!(memory.is_empty());
    }
}

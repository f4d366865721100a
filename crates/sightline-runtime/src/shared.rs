//! [`SharedNarrator`] – a [`Narrator`] that several callers can drive.
//!
//! A periodic perception loop and an on-demand request (e.g. a dialog asking
//! "what do you see?") may hit the same session concurrently.  Each call here
//! holds the lock for the whole purge → update → compose sequence, so the
//! memory is never observed half-updated.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use sightline_types::{Label, Language, Narration, SightlineError};

use crate::narrator::Narrator;

/// Cheaply clonable handle to one narration session.
#[derive(Debug, Clone)]
pub struct SharedNarrator {
    inner: Arc<Mutex<Narrator>>,
}

impl SharedNarrator {
    pub fn new(narrator: Narrator) -> Self {
        Self {
            inner: Arc::new(Mutex::new(narrator)),
        }
    }

    // A panic inside a previous call cannot leave the memory map in a torn
    // state, so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, Narrator> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn narrate(&self, labels: &[Label], now: DateTime<Utc>) -> Narration {
        self.lock().narrate(labels, now)
    }

    pub fn narrate_raw<S: AsRef<str>>(
        &self,
        labels: &[S],
        now: DateTime<Utc>,
    ) -> Result<Narration, SightlineError> {
        self.lock().narrate_raw(labels, now)
    }

    pub fn compose(&self, labels: &[Label], now: DateTime<Utc>) -> String {
        self.lock().compose(labels, now)
    }

    pub fn no_data(&self) -> String {
        self.lock().no_data()
    }

    pub fn set_language(&self, language: impl Into<Language>) {
        self.lock().set_language(language);
    }

    pub fn language(&self) -> Language {
        self.lock().language().clone()
    }

    /// Run `f` with exclusive access to the underlying narrator.
    pub fn with<R>(&self, f: impl FnOnce(&mut Narrator) -> R) -> R {
        f(&mut self.lock())
    }
}

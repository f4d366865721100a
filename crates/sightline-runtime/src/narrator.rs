//! [`Narrator`] – turns a stream of recognized labels into sentences.
//!
//! One call to [`Narrator::narrate`] handles one observation frame:
//!
//! 1. An empty frame yields a `NO_DATA` sentence and leaves memory untouched.
//! 2. Duplicate labels are counted (`n_in_frame`) and collapsed, keeping the
//!    order in which labels were first encountered.
//! 3. Memory is purged at `now`, then updated once per unique label.
//! 4. A single label type is classified with
//!    [`classify_single`][crate::classifier::classify_single] and rendered
//!    with `{obj}`, `{count}` and `{count_word}`.
//! 5. Several label types are joined into one list (`"cup, book and pen"`),
//!    classified with [`classify_multi`][crate::classifier::classify_multi]
//!    and rendered with `{objs}`.  A mixed frame gets one extra
//!    `MULTI_DETAIL` clause about the first label seen more than once.
//!
//! # Example
//!
//! ```rust
//! use chrono::{TimeDelta, TimeZone, Utc};
//! use sightline_language::FixedPicker;
//! use sightline_runtime::{Narrator, NarratorConfig};
//! use sightline_types::{Label, PhraseCategory};
//!
//! let mut narrator =
//!     Narrator::with_bundled_tables(NarratorConfig::default(), Box::new(FixedPicker(0))).unwrap();
//! let cup = [Label::new("cup").unwrap()];
//! let t0 = Utc.timestamp_opt(0, 0).unwrap();
//!
//! let first = narrator.narrate(&cup, t0);
//! assert_eq!(first.category, PhraseCategory::SingleFirstTime);
//!
//! narrator.narrate(&cup, t0 + TimeDelta::seconds(1));
//! let third = narrator.narrate(&cup, t0 + TimeDelta::seconds(2));
//! assert_eq!(third.category, PhraseCategory::SingleAgain);
//! assert!(third.text.contains("third"));
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use sightline_language::{
    LanguageTables, NumberWordResolver, PhraseBank, TableError, TemplateArgs, VariantPicker,
};
use sightline_memory::MemoryStore;
use sightline_types::{Label, Language, Narration, PhraseCategory, SightlineError};
use tracing::{debug, info, instrument, warn};

use crate::classifier::{MultiClass, classify_multi, classify_single};

// ─────────────────────────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Session parameters for a [`Narrator`].
#[derive(Debug, Clone)]
pub struct NarratorConfig {
    /// How long a label is remembered after its last sighting.
    pub memory_length: TimeDelta,
    /// Language sentences are composed in.
    pub language: Language,
}

impl Default for NarratorConfig {
    fn default() -> Self {
        Self {
            memory_length: TimeDelta::seconds(10),
            language: Language::default(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Label list formatting
// ─────────────────────────────────────────────────────────────────────────────

/// Join labels into a natural-language list.
///
/// One label is returned as is, two are joined with the conjunction, and
/// longer lists are comma-separated with the conjunction before the last
/// item: `"cup, book and pen"`.
pub fn join_labels(labels: &[&str], conjunction: &str) -> String {
    match labels {
        [] => String::new(),
        [only] => (*only).to_string(),
        [init @ .., last] => format!("{} {conjunction} {last}", init.join(", ")),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Narrator
// ─────────────────────────────────────────────────────────────────────────────

/// Stateful narration engine for one conversational session.
///
/// The narrator owns its memory and never reads the clock: callers pass the
/// observation time, so a given sequence of `(labels, now)` with a given
/// picker always produces the same sentences.
#[derive(Debug)]
pub struct Narrator {
    language: Language,
    tables: Arc<LanguageTables>,
    memory: MemoryStore,
    phrases: PhraseBank,
    numbers: NumberWordResolver,
}

impl Narrator {
    pub fn new(
        config: NarratorConfig,
        tables: Arc<LanguageTables>,
        picker: Box<dyn VariantPicker>,
    ) -> Self {
        warn_if_unsupported(&tables, &config.language);
        Self {
            language: config.language,
            memory: MemoryStore::new(config.memory_length),
            phrases: PhraseBank::new(tables.clone(), picker),
            numbers: NumberWordResolver::new(tables.clone()),
            tables,
        }
    }

    /// Narrator backed by the bundled English and Czech tables.
    pub fn with_bundled_tables(
        config: NarratorConfig,
        picker: Box<dyn VariantPicker>,
    ) -> Result<Self, TableError> {
        Ok(Self::new(config, Arc::new(LanguageTables::bundled()?), picker))
    }

    pub fn language(&self) -> &Language {
        &self.language
    }

    /// Switch the narration language.  Memory is kept.
    pub fn set_language(&mut self, language: impl Into<Language>) {
        let language = language.into();
        warn_if_unsupported(&self.tables, &language);
        self.language = language;
    }

    /// Replace the randomness source used for variant selection.
    pub fn set_picker(&mut self, picker: Box<dyn VariantPicker>) {
        self.phrases.set_picker(picker);
    }

    pub fn memory(&self) -> &MemoryStore {
        &self.memory
    }

    /// Forget every remembered label.
    pub fn forget_all(&mut self) {
        info!(count = self.memory.len(), "forgetting all labels");
        self.memory.clear();
    }

    /// A `NO_DATA` sentence, for when no frame could be captured at all.
    pub fn no_data(&mut self) -> String {
        self.phrases
            .get_phrase(&self.language, PhraseCategory::NoData)
            .render(&TemplateArgs::default())
    }

    /// Validate raw label text, then [`narrate`][Self::narrate] it.
    ///
    /// This is the ingestion boundary for label text arriving from outside
    /// the process: any invalid label rejects the whole frame and leaves
    /// memory untouched.
    pub fn narrate_raw<S: AsRef<str>>(
        &mut self,
        labels: &[S],
        now: DateTime<Utc>,
    ) -> Result<Narration, SightlineError> {
        let labels = labels
            .iter()
            .map(|l| Label::new(l.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.narrate(&labels, now))
    }

    /// Compose the sentence for one observation frame.
    pub fn compose(&mut self, labels: &[Label], now: DateTime<Utc>) -> String {
        self.narrate(labels, now).text
    }

    /// Compose the sentence for one observation frame, with its category.
    #[instrument(skip(self, labels), fields(labels = labels.len(), language = %self.language))]
    pub fn narrate(&mut self, labels: &[Label], now: DateTime<Utc>) -> Narration {
        if labels.is_empty() {
            debug!("empty frame");
            let text = self.no_data();
            return Narration::new(now, self.language.clone(), PhraseCategory::NoData, text);
        }

        let frame = count_frame(labels);
        self.remember(&frame, now);

        let (category, text) = match frame.as_slice() {
            [(label, n_in_frame)] => self.compose_single(label, *n_in_frame),
            _ => self.compose_multi(&frame),
        };
        debug!(%category, %text, "composed");
        Narration::new(now, self.language.clone(), category, text)
    }

    /// Purge stale labels, then record every unique label of the frame.
    fn remember(&mut self, frame: &[(&Label, u32)], now: DateTime<Utc>) {
        let forgotten = self.memory.purge(now);
        if !forgotten.is_empty() {
            info!(labels = ?forgotten, "forgetting labels");
        }

        let mut newly_seen: Vec<&Label> = Vec::new();
        for (label, _) in frame {
            if self.memory.update(label, now) == 1 {
                newly_seen.push(*label);
            }
        }
        if !newly_seen.is_empty() {
            info!(labels = ?newly_seen, "seeing labels for the first time");
        }
        debug!(remembered = self.memory.len(), "memory updated");
    }

    fn compose_single(&mut self, label: &Label, n_in_frame: u32) -> (PhraseCategory, String) {
        let frames_seen = self.memory.frames_seen(label);
        let category = classify_single(n_in_frame, frames_seen);

        let count = self.numbers.cardinal(&self.language, i64::from(n_in_frame));
        let count_word = self.numbers.ordinal(&self.language, i64::from(frames_seen));
        let text = self
            .phrases
            .get_phrase(&self.language, category)
            .render(&TemplateArgs {
                obj: Some(label.as_str()),
                count: Some(count),
                count_word: Some(count_word),
                ..Default::default()
            });
        (category, text)
    }

    fn compose_multi(&mut self, frame: &[(&Label, u32)]) -> (PhraseCategory, String) {
        let names: Vec<&str> = frame.iter().map(|(label, _)| label.as_str()).collect();
        let conjunction = &self.tables.resolve(&self.language).conjunction;
        let objs = join_labels(&names, conjunction);

        let seen: Vec<u32> = frame
            .iter()
            .map(|(label, _)| self.memory.frames_seen(label))
            .collect();
        let class = classify_multi(seen.iter().copied());
        let category = class.category();

        let mut text = self
            .phrases
            .get_phrase(&self.language, category)
            .render(&TemplateArgs {
                objs: Some(&objs),
                ..Default::default()
            });

        if class == MultiClass::Mix {
            let known = frame
                .iter()
                .zip(&seen)
                .find(|(_, frames_seen)| **frames_seen > 1);
            if let Some(((label, _), frames_seen)) = known {
                let count_word = self.numbers.ordinal(&self.language, i64::from(*frames_seen));
                let detail = self
                    .phrases
                    .get_phrase(&self.language, PhraseCategory::MultiDetail)
                    .render(&TemplateArgs {
                        obj: Some(label.as_str()),
                        count_word: Some(count_word),
                        ..Default::default()
                    });
                text.push(' ');
                text.push_str(&detail);
            }
        }
        (category, text)
    }
}

/// Unknown languages narrate with the default table; say so once, when the
/// language is chosen, rather than on every frame.
fn warn_if_unsupported(tables: &LanguageTables, language: &Language) {
    if !tables.supports(language) {
        warn!(
            %language,
            fallback = %tables.default_language(),
            "no table for requested language, default will be used"
        );
    }
}

/// Count duplicate labels, keeping first-encounter order.
fn count_frame(labels: &[Label]) -> Vec<(&Label, u32)> {
    let mut frame: Vec<(&Label, u32)> = Vec::new();
    let mut index: HashMap<&Label, usize> = HashMap::new();
    for label in labels {
        match index.get(label) {
            Some(&i) => frame[i].1 += 1,
            None => {
                index.insert(label, frame.len());
                frame.push((label, 1));
            }
        }
    }
    frame
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

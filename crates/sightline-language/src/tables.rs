//! Language tables – the data behind [`PhraseBank`][crate::PhraseBank] and
//! [`NumberWordResolver`][crate::NumberWordResolver].
//!
//! Tables are TOML documents keyed by language code:
//!
//! ```toml
//! default_language = "en"
//!
//! [languages.en]
//! conjunction = "and"
//!
//! [languages.en.numbers]
//! cardinal = ["one", "two", "three"]
//! cardinal_many = "many"
//! ordinal = ["first", "second", "third"]
//! ordinal_many = "manyth"
//!
//! [languages.en.phrases]
//! SINGLE_FIRST_TIME = ["I see a {obj} for the first time!"]
//! # ... one array per phrase category
//! ```
//!
//! A document is validated as a whole when it is loaded: every language must
//! list every phrase category with at least one variant, templates may only
//! use the placeholders their category is composed with, and the default
//! language must be present.  Nothing about a table is checked again at
//! composition time.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use sightline_types::{Language, NumeralType, PhraseCategory};
use tracing::debug;

use crate::TableError;
use crate::template::{Placeholder, Template};

/// Tables shipped with the crate (English and Czech).
pub const BUNDLED_TABLES: &str = include_str!("../data/default_tables.toml");

// ─────────────────────────────────────────────────────────────────────────────
// Per-language data
// ─────────────────────────────────────────────────────────────────────────────

/// Cardinal and ordinal words for small counts.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NumberTable {
    /// Words for 1, 2, 3, ... in order.
    pub cardinal: Vec<String>,
    /// Cardinal used past the end of `cardinal`.
    pub cardinal_many: String,
    /// Words for first, second, third, ... in order.
    pub ordinal: Vec<String>,
    /// Ordinal used past the end of `ordinal`.
    pub ordinal_many: String,
}

impl NumberTable {
    /// Word for `count` (1-based).  Counts outside the table map to the
    /// "many" word.
    pub fn word(&self, numeral: NumeralType, count: u32) -> &str {
        let (words, many) = match numeral {
            NumeralType::Cardinal => (&self.cardinal, &self.cardinal_many),
            NumeralType::Ordinal => (&self.ordinal, &self.ordinal_many),
        };
        (count as usize)
            .checked_sub(1)
            .and_then(|i| words.get(i))
            .unwrap_or(many)
    }
}

/// Sentence templates for every [`PhraseCategory`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", deny_unknown_fields)]
pub struct PhraseTable {
    single_first_time: Vec<Template>,
    single_first_time_multiple: Vec<Template>,
    single_second_time: Vec<Template>,
    single_again: Vec<Template>,
    single_again_multiple: Vec<Template>,
    multi_all_new: Vec<Template>,
    multi_all_known: Vec<Template>,
    multi_mix: Vec<Template>,
    multi_detail: Vec<Template>,
    no_data: Vec<Template>,
}

impl PhraseTable {
    pub fn variants(&self, category: PhraseCategory) -> &[Template] {
        match category {
            PhraseCategory::SingleFirstTime => &self.single_first_time,
            PhraseCategory::SingleFirstTimeMultiple => &self.single_first_time_multiple,
            PhraseCategory::SingleSecondTime => &self.single_second_time,
            PhraseCategory::SingleAgain => &self.single_again,
            PhraseCategory::SingleAgainMultiple => &self.single_again_multiple,
            PhraseCategory::MultiAllNew => &self.multi_all_new,
            PhraseCategory::MultiAllKnown => &self.multi_all_known,
            PhraseCategory::MultiMix => &self.multi_mix,
            PhraseCategory::MultiDetail => &self.multi_detail,
            PhraseCategory::NoData => &self.no_data,
        }
    }
}

/// Placeholders a template of `category` is rendered with.
pub fn allowed_placeholders(category: PhraseCategory) -> &'static [Placeholder] {
    match category {
        PhraseCategory::SingleFirstTime
        | PhraseCategory::SingleFirstTimeMultiple
        | PhraseCategory::SingleSecondTime
        | PhraseCategory::SingleAgain
        | PhraseCategory::SingleAgainMultiple => {
            &[Placeholder::Obj, Placeholder::Count, Placeholder::CountWord]
        }
        PhraseCategory::MultiAllNew | PhraseCategory::MultiAllKnown | PhraseCategory::MultiMix => {
            &[Placeholder::Objs]
        }
        PhraseCategory::MultiDetail => &[Placeholder::Obj, Placeholder::CountWord],
        PhraseCategory::NoData => &[],
    }
}

/// Everything needed to narrate in one language.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LanguageTable {
    /// Word joining the last two items of a list ("and", "a").
    pub conjunction: String,
    pub numbers: NumberTable,
    pub phrases: PhraseTable,
}

impl LanguageTable {
    fn validate(&self, language: &Language) -> Result<(), TableError> {
        for category in PhraseCategory::ALL {
            let variants = self.phrases.variants(category);
            if variants.is_empty() {
                return Err(TableError::NoVariants {
                    language: language.clone(),
                    category,
                });
            }
            let allowed = allowed_placeholders(category);
            for template in variants {
                if let Some(bad) = template.placeholders().find(|p| !allowed.contains(p)) {
                    return Err(TableError::PlaceholderNotAllowed {
                        language: language.clone(),
                        category,
                        placeholder: bad.name(),
                    });
                }
            }
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// LanguageTables
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawTables {
    #[serde(default)]
    default_language: Option<Language>,
    #[serde(default)]
    languages: HashMap<Language, LanguageTable>,
}

/// Validated, immutable set of language tables with a guaranteed default.
#[derive(Debug, Clone)]
pub struct LanguageTables {
    default_language: Language,
    default_table: LanguageTable,
    others: HashMap<Language, LanguageTable>,
}

impl LanguageTables {
    /// The English and Czech tables shipped with the crate.
    pub fn bundled() -> Result<Self, TableError> {
        Self::from_toml_str(BUNDLED_TABLES)
    }

    /// Parse and validate a complete table document.
    ///
    /// `default_language` defaults to `"en"` when omitted.
    pub fn from_toml_str(raw: &str) -> Result<Self, TableError> {
        let raw: RawTables = toml::from_str(raw)?;
        Self::build(raw.default_language.unwrap_or_default(), raw.languages)
    }

    /// Read and validate a complete table document from disk.
    pub fn from_path(path: &Path) -> Result<Self, TableError> {
        Self::from_toml_str(&read_tables(path)?)
    }

    /// Layer the document at `path` over these tables.
    ///
    /// Languages in the file replace (or add to) the existing ones as whole
    /// tables; a `default_language` key in the file switches the default.
    pub fn with_overrides_from_path(self, path: &Path) -> Result<Self, TableError> {
        self.with_overrides_from_str(&read_tables(path)?)
    }

    /// Same as [`with_overrides_from_path`][Self::with_overrides_from_path],
    /// from an in-memory document.
    pub fn with_overrides_from_str(self, raw: &str) -> Result<Self, TableError> {
        let overrides: RawTables = toml::from_str(raw)?;
        let (current_default, mut languages) = self.into_parts();
        for (language, table) in overrides.languages {
            debug!(%language, "language table overridden");
            languages.insert(language, table);
        }
        let default_language = overrides.default_language.unwrap_or(current_default);
        Self::build(default_language, languages)
    }

    fn build(
        default_language: Language,
        mut languages: HashMap<Language, LanguageTable>,
    ) -> Result<Self, TableError> {
        for (language, table) in &languages {
            table.validate(language)?;
        }
        let default_table = languages
            .remove(&default_language)
            .ok_or_else(|| TableError::MissingDefaultLanguage(default_language.clone()))?;
        Ok(Self {
            default_language,
            default_table,
            others: languages,
        })
    }

    fn into_parts(self) -> (Language, HashMap<Language, LanguageTable>) {
        let mut languages = self.others;
        languages.insert(self.default_language.clone(), self.default_table);
        (self.default_language, languages)
    }

    /// Language used when a requested language has no table.
    pub fn default_language(&self) -> &Language {
        &self.default_language
    }

    /// Table for `language`, falling back to the default language.
    pub fn resolve(&self, language: &Language) -> &LanguageTable {
        if *language == self.default_language {
            return &self.default_table;
        }
        match self.others.get(language) {
            Some(table) => table,
            None => {
                debug!(%language, fallback = %self.default_language, "no table for language, using default");
                &self.default_table
            }
        }
    }

    /// Whether `language` has its own table.
    pub fn supports(&self, language: &Language) -> bool {
        *language == self.default_language || self.others.contains_key(language)
    }

    /// All languages with a table, sorted.
    pub fn languages(&self) -> Vec<&Language> {
        let mut languages: Vec<&Language> = self.others.keys().collect();
        languages.push(&self.default_language);
        languages.sort();
        languages
    }
}

fn read_tables(path: &Path) -> Result<String, TableError> {
    std::fs::read_to_string(path).map_err(|source| TableError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

//! `sightline-language` – phrase and number tables.
//!
//! Everything language-specific lives in data, not code: adding a language
//! means adding a table, never touching the narration engine.
//!
//! # Modules
//!
//! - [`tables`] – [`LanguageTables`][tables::LanguageTables]: validated TOML
//!   tables keyed by language code, with the bundled English and Czech set
//!   and a guaranteed default-language fallback.
//! - [`template`] – [`Template`][template::Template]: sentence patterns with
//!   `{obj}`, `{objs}`, `{count}` and `{count_word}` placeholders.
//! - [`phrase_bank`] – [`PhraseBank`][phrase_bank::PhraseBank]: picks one
//!   template variant per `(language, category)`.
//! - [`numbers`] – [`NumberWordResolver`][numbers::NumberWordResolver]:
//!   cardinal and ordinal number words.
//! - [`picker`] – [`VariantPicker`][picker::VariantPicker]: the injectable
//!   randomness source used for variant selection.

use std::path::PathBuf;

use sightline_types::{Language, PhraseCategory};
use thiserror::Error;

pub mod numbers;
pub mod phrase_bank;
pub mod picker;
pub mod tables;
pub mod template;

pub use numbers::NumberWordResolver;
pub use phrase_bank::PhraseBank;
pub use picker::{FixedPicker, SeededPicker, VariantPicker};
pub use tables::{LanguageTable, LanguageTables, NumberTable, PhraseTable};
pub use template::{Placeholder, Template, TemplateArgs};

/// Errors raised while loading or validating language tables.
#[derive(Error, Debug)]
pub enum TableError {
    #[error("Failed to read language tables at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse language tables: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Default language '{0}' has no table")]
    MissingDefaultLanguage(Language),

    #[error("Language '{language}' has no variants for {category}")]
    NoVariants {
        language: Language,
        category: PhraseCategory,
    },

    #[error("Placeholder {{{placeholder}}} cannot be used in {category} templates (language '{language}')")]
    PlaceholderNotAllowed {
        language: Language,
        category: PhraseCategory,
        placeholder: &'static str,
    },

    #[error("Unknown placeholder {{{name}}} in template {template:?}")]
    UnknownPlaceholder { name: String, template: String },

    #[error("Unterminated placeholder in template {0:?}")]
    UnterminatedPlaceholder(String),
}

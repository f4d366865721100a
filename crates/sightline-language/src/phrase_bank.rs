//! Per-language sentence templates with injectable variant selection.

use std::sync::Arc;

use sightline_types::{Language, PhraseCategory};

use crate::picker::VariantPicker;
use crate::tables::LanguageTables;
use crate::template::Template;

/// Picks a sentence template for a `(language, category)` pair.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use sightline_language::{FixedPicker, LanguageTables, PhraseBank};
/// use sightline_types::{Language, PhraseCategory};
///
/// let tables = Arc::new(LanguageTables::bundled().unwrap());
/// let mut bank = PhraseBank::new(tables, Box::new(FixedPicker(0)));
///
/// let template = bank.get_phrase(&Language::new("en"), PhraseCategory::NoData);
/// assert_eq!(template.source(), "I can't see anything.");
/// ```
pub struct PhraseBank {
    tables: Arc<LanguageTables>,
    picker: Box<dyn VariantPicker>,
}

impl PhraseBank {
    pub fn new(tables: Arc<LanguageTables>, picker: Box<dyn VariantPicker>) -> Self {
        Self { tables, picker }
    }

    /// Replace the randomness source.
    pub fn set_picker(&mut self, picker: Box<dyn VariantPicker>) {
        self.picker = picker;
    }

    pub fn tables(&self) -> &Arc<LanguageTables> {
        &self.tables
    }

    /// Choose one of the configured variants for `category` in `language`.
    ///
    /// Unknown languages use the default language.  Every category is
    /// guaranteed to have at least one variant by table validation.
    pub fn get_phrase(&mut self, language: &Language, category: PhraseCategory) -> &Template {
        let variants = self.tables.resolve(language).phrases.variants(category);
        let index = self.picker.pick(variants.len());
        // Out-of-range picks from a custom picker wrap around.
        &variants[index % variants.len()]
    }
}

impl std::fmt::Debug for PhraseBank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhraseBank")
            .field("languages", &self.tables.languages())
            .finish_non_exhaustive()
    }
}

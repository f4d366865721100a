//! Number words ("one", "third", "potřetí") for the supported languages.

use std::sync::Arc;

use sightline_types::{Language, NumeralType};
use tracing::warn;

use crate::tables::LanguageTables;

/// Looks up cardinal and ordinal words in the language tables.
#[derive(Debug, Clone)]
pub struct NumberWordResolver {
    tables: Arc<LanguageTables>,
}

impl NumberWordResolver {
    pub fn new(tables: Arc<LanguageTables>) -> Self {
        Self { tables }
    }

    /// Word for `count` in `language`.
    ///
    /// Counts below 1 are clamped to 1 and logged: a zero sighting reaching
    /// this point means the caller classified a label it never recorded.
    /// Counts past the end of the table map to the language's "many" word.
    /// Unknown languages use the default language.
    pub fn word(&self, language: &Language, numeral: NumeralType, count: i64) -> &str {
        let count = if count < 1 {
            warn!(count, ?numeral, "number word requested for a count below one, clamping to 1");
            1
        } else {
            u32::try_from(count).unwrap_or(u32::MAX)
        };
        self.tables.resolve(language).numbers.word(numeral, count)
    }

    pub fn cardinal(&self, language: &Language, count: i64) -> &str {
        self.word(language, NumeralType::Cardinal, count)
    }

    pub fn ordinal(&self, language: &Language, count: i64) -> &str {
        self.word(language, NumeralType::Ordinal, count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> NumberWordResolver {
        NumberWordResolver::new(Arc::new(LanguageTables::bundled().unwrap()))
    }

    #[test]
    fn english_words() {
        let r = resolver();
        let en = Language::new("en");
        assert_eq!(r.cardinal(&en, 1), "one");
        assert_eq!(r.ordinal(&en, 1), "first");
        assert_eq!(r.cardinal(&en, 3), "three");
        assert_eq!(r.ordinal(&en, 5), "fifth");
    }

    #[test]
    fn czech_words() {
        let r = resolver();
        let cs = Language::new("cs");
        assert_eq!(r.cardinal(&cs, 2), "dva");
        assert_eq!(r.ordinal(&cs, 2), "podruhé");
    }

    #[test]
    fn czech_ordinals_are_one_adverb_series() {
        let r = resolver();
        let cs = Language::new("cs");
        let words: Vec<&str> = (1..=6).map(|n| r.ordinal(&cs, n)).collect();
        assert_eq!(
            words,
            vec!["poprvé", "podruhé", "potřetí", "počtvrté", "popáté", "pomnohé"]
        );
    }

    #[test]
    fn large_counts_use_many() {
        let r = resolver();
        let en = Language::new("en");
        assert_eq!(r.cardinal(&en, 7), "many");
        assert_eq!(r.ordinal(&en, 7), "manyth");
        assert_eq!(r.ordinal(&en, i64::MAX), "manyth");
        assert_eq!(r.cardinal(&Language::new("cs"), 6), "hodně");
    }

    #[test]
    fn non_positive_counts_clamp_to_one() {
        let r = resolver();
        let en = Language::new("en");
        assert_eq!(r.cardinal(&en, 0), "one");
        assert_eq!(r.ordinal(&en, -3), "first");
    }

    #[test]
    fn unknown_language_matches_default() {
        let r = resolver();
        let en = Language::new("en");
        let xx = Language::new("xx");
        for count in 0..8 {
            assert_eq!(r.cardinal(&xx, count), r.cardinal(&en, count));
            assert_eq!(r.ordinal(&xx, count), r.ordinal(&en, count));
        }
    }
}

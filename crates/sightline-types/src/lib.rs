use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Code of the language every table set must provide and every unknown
/// language code falls back to.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Canonical identifier of a recognized object class (e.g. `"cup"`).
///
/// Labels are validated once, when they enter the system: surrounding
/// whitespace is trimmed, and empty labels or labels containing control
/// characters are rejected.  Everything downstream can rely on a `Label`
/// being a clean UTF-8 string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Label(String);

impl Label {
    /// Validate and normalise `raw` into a [`Label`].
    pub fn new(raw: impl Into<String>) -> Result<Self, SightlineError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(SightlineError::InvalidLabel {
                raw,
                reason: "label is empty".to_string(),
            });
        }
        if trimmed.chars().any(char::is_control) {
            return Err(SightlineError::InvalidLabel {
                raw,
                reason: "label contains control characters".to_string(),
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Validate a label received as raw bytes (e.g. straight off a socket or
    /// stdin).  Bytes that are not valid UTF-8 are rejected, never coerced.
    pub fn from_bytes(raw: &[u8]) -> Result<Self, SightlineError> {
        match std::str::from_utf8(raw) {
            Ok(s) => Self::new(s),
            Err(e) => Err(SightlineError::InvalidLabel {
                raw: String::from_utf8_lossy(raw).into_owned(),
                reason: format!("label is not valid UTF-8: {e}"),
            }),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Label {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Label {
    type Error = SightlineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for Label {
    type Error = SightlineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Label> for String {
    fn from(label: Label) -> Self {
        label.0
    }
}

/// Language code selecting a phrase/number table (e.g. `"en"`, `"cs"`).
///
/// Codes are normalised to trimmed lowercase.  The set of languages is open:
/// whether a code is actually backed by a table is decided by the table
/// lookup, which falls back to [`DEFAULT_LANGUAGE`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Language(String);

impl Language {
    pub fn new(code: &str) -> Self {
        Self(code.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Language {
    fn default() -> Self {
        Self(DEFAULT_LANGUAGE.to_string())
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Language {
    fn from(code: String) -> Self {
        Self::new(&code)
    }
}

impl From<&str> for Language {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

impl From<Language> for String {
    fn from(lang: Language) -> Self {
        lang.0
    }
}

/// Narrative bucket chosen for an observation.  Each category owns its own
/// set of sentence templates per language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PhraseCategory {
    /// One object, first sighting, one instance in the frame.
    SingleFirstTime,
    /// One object type, first sighting, several instances in the frame.
    SingleFirstTimeMultiple,
    /// One object, second consecutive sighting.
    SingleSecondTime,
    /// One object, seen three or more times.
    SingleAgain,
    /// One object type, seen before, several instances in the frame.
    SingleAgainMultiple,
    /// Several object types, none seen before.
    MultiAllNew,
    /// Several object types, all seen before.
    MultiAllKnown,
    /// Several object types, some new and some known.
    MultiMix,
    /// Follow-up clause about one known object in a mixed observation.
    MultiDetail,
    /// Nothing was observed.
    NoData,
}

impl PhraseCategory {
    /// Every category, in declaration order.
    pub const ALL: [PhraseCategory; 10] = [
        PhraseCategory::SingleFirstTime,
        PhraseCategory::SingleFirstTimeMultiple,
        PhraseCategory::SingleSecondTime,
        PhraseCategory::SingleAgain,
        PhraseCategory::SingleAgainMultiple,
        PhraseCategory::MultiAllNew,
        PhraseCategory::MultiAllKnown,
        PhraseCategory::MultiMix,
        PhraseCategory::MultiDetail,
        PhraseCategory::NoData,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PhraseCategory::SingleFirstTime => "SINGLE_FIRST_TIME",
            PhraseCategory::SingleFirstTimeMultiple => "SINGLE_FIRST_TIME_MULTIPLE",
            PhraseCategory::SingleSecondTime => "SINGLE_SECOND_TIME",
            PhraseCategory::SingleAgain => "SINGLE_AGAIN",
            PhraseCategory::SingleAgainMultiple => "SINGLE_AGAIN_MULTIPLE",
            PhraseCategory::MultiAllNew => "MULTI_ALL_NEW",
            PhraseCategory::MultiAllKnown => "MULTI_ALL_KNOWN",
            PhraseCategory::MultiMix => "MULTI_MIX",
            PhraseCategory::MultiDetail => "MULTI_DETAIL",
            PhraseCategory::NoData => "NO_DATA",
        }
    }
}

impl fmt::Display for PhraseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of number word requested from a number table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumeralType {
    /// "one", "two", ... – used for how many instances are in the frame.
    Cardinal,
    /// "first", "second", ... – used for how many times a label was seen.
    Ordinal,
}

/// One composed sentence together with the context it was produced in.
///
/// This is the record handed to speech and dashboard collaborators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Narration {
    pub id: Uuid,
    /// Observation time the sentence was composed for.
    pub timestamp: DateTime<Utc>,
    pub language: Language,
    /// Category of the main sentence (a `MULTI_MIX` narration may carry an
    /// appended `MULTI_DETAIL` clause).
    pub category: PhraseCategory,
    pub text: String,
}

impl Narration {
    pub fn new(
        timestamp: DateTime<Utc>,
        language: Language,
        category: PhraseCategory,
        text: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp,
            language,
            category,
            text,
        }
    }
}

/// Errors raised at the ingestion boundary of the narration engine.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SightlineError {
    #[error("Invalid label {raw:?}: {reason}")]
    InvalidLabel { raw: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_trims_whitespace() {
        let label = Label::new("  cup \n").unwrap();
        assert_eq!(label.as_str(), "cup");
    }

    #[test]
    fn label_keeps_non_ascii_text() {
        let label = Label::new("hrnek s čajem").unwrap();
        assert_eq!(label.to_string(), "hrnek s čajem");
    }

    #[test]
    fn label_rejects_empty_and_blank() {
        assert!(matches!(
            Label::new(""),
            Err(SightlineError::InvalidLabel { .. })
        ));
        assert!(matches!(
            Label::new("   "),
            Err(SightlineError::InvalidLabel { .. })
        ));
    }

    #[test]
    fn label_rejects_control_characters() {
        let err = Label::new("cu\u{0007}p").unwrap_err();
        assert!(err.to_string().contains("control"));
    }

    #[test]
    fn label_from_bytes_rejects_invalid_utf8() {
        let err = Label::from_bytes(&[0x63, 0xff, 0x70]).unwrap_err();
        assert!(err.to_string().contains("UTF-8"));
    }

    #[test]
    fn label_from_bytes_accepts_utf8() {
        let label = Label::from_bytes("židle".as_bytes()).unwrap();
        assert_eq!(label.as_str(), "židle");
    }

    #[test]
    fn label_deserialization_validates() {
        let ok: Label = serde_json::from_str("\"book\"").unwrap();
        assert_eq!(ok.as_str(), "book");
        assert!(serde_json::from_str::<Label>("\"  \"").is_err());
    }

    #[test]
    fn language_is_normalised() {
        assert_eq!(Language::new(" CS ").as_str(), "cs");
        assert_eq!(Language::default().as_str(), DEFAULT_LANGUAGE);
    }

    #[test]
    fn phrase_category_names_match_serde_keys() {
        for category in PhraseCategory::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.as_str()));
            let back: PhraseCategory = serde_json::from_str(&json).unwrap();
            assert_eq!(back, category);
        }
    }

    #[test]
    fn phrase_category_unknown_key_is_rejected() {
        assert!(serde_json::from_str::<PhraseCategory>("\"SINGLE_THIRD_TIME\"").is_err());
    }

    #[test]
    fn narration_serializes_category_and_language() {
        let narration = Narration::new(
            Utc::now(),
            Language::new("cs"),
            PhraseCategory::NoData,
            "Nic nevidím".to_string(),
        );
        let json = serde_json::to_string(&narration).unwrap();
        assert!(json.contains("\"NO_DATA\""));
        assert!(json.contains("\"cs\""));
        let back: Narration = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, narration.id);
        assert_eq!(back.text, "Nic nevidím");
    }
}

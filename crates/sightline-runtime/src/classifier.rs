//! Observation classifier.
//!
//! Maps what the memory knows about the current frame onto a
//! [`PhraseCategory`].
//!
//! # Single label
//!
//! | frames seen | instances in frame | category                     |
//! |-------------|--------------------|------------------------------|
//! | ≤ 1         | 1                  | `SINGLE_FIRST_TIME`          |
//! | ≤ 1         | > 1                | `SINGLE_FIRST_TIME_MULTIPLE` |
//! | 2           | 1                  | `SINGLE_SECOND_TIME`         |
//! | 2           | > 1                | `SINGLE_AGAIN_MULTIPLE`      |
//! | > 2         | 1                  | `SINGLE_AGAIN`               |
//! | > 2         | > 1                | `SINGLE_AGAIN_MULTIPLE`      |
//!
//! # Several labels
//!
//! A label is *new* when it has been seen in at most one frame.  The frame is
//! [`MultiClass::AllNew`] when every label is new, [`MultiClass::AllKnown`]
//! when none is, and [`MultiClass::Mix`] otherwise.

use sightline_types::PhraseCategory;

/// Category for a frame containing a single label type.
pub fn classify_single(n_in_frame: u32, frames_seen: u32) -> PhraseCategory {
    let multiple = n_in_frame > 1;
    match (frames_seen, multiple) {
        (0 | 1, false) => PhraseCategory::SingleFirstTime,
        (0 | 1, true) => PhraseCategory::SingleFirstTimeMultiple,
        (2, false) => PhraseCategory::SingleSecondTime,
        (_, false) => PhraseCategory::SingleAgain,
        (_, true) => PhraseCategory::SingleAgainMultiple,
    }
}

/// Novelty of a frame containing several label types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MultiClass {
    AllNew,
    AllKnown,
    Mix,
}

impl MultiClass {
    pub fn category(self) -> PhraseCategory {
        match self {
            MultiClass::AllNew => PhraseCategory::MultiAllNew,
            MultiClass::AllKnown => PhraseCategory::MultiAllKnown,
            MultiClass::Mix => PhraseCategory::MultiMix,
        }
    }
}

/// Whether a label seen in `frames_seen` frames counts as new.
pub fn is_new(frames_seen: u32) -> bool {
    frames_seen <= 1
}

/// Classify a frame from the `frames_seen` of each of its unique labels.
///
/// An empty frame is reported as [`MultiClass::AllNew`].
pub fn classify_multi<I>(frames_seen: I) -> MultiClass
where
    I: IntoIterator<Item = u32>,
{
    let (mut new, mut known) = (0usize, 0usize);
    for seen in frames_seen {
        if is_new(seen) {
            new += 1;
        } else {
            known += 1;
        }
    }
    match (new, known) {
        (_, 0) => MultiClass::AllNew,
        (0, _) => MultiClass::AllKnown,
        _ => MultiClass::Mix,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_table() {
        use PhraseCategory::*;
        let cases = [
            (1, 0, SingleFirstTime),
            (1, 1, SingleFirstTime),
            (3, 1, SingleFirstTimeMultiple),
            (1, 2, SingleSecondTime),
            (2, 2, SingleAgainMultiple),
            (1, 3, SingleAgain),
            (1, 40, SingleAgain),
            (4, 3, SingleAgainMultiple),
        ];
        for (n_in_frame, frames_seen, expected) in cases {
            assert_eq!(
                classify_single(n_in_frame, frames_seen),
                expected,
                "n_in_frame={n_in_frame} frames_seen={frames_seen}"
            );
        }
    }

    #[test]
    fn multi_all_new() {
        assert_eq!(classify_multi([1, 1, 0]), MultiClass::AllNew);
    }

    #[test]
    fn multi_all_known() {
        assert_eq!(classify_multi([2, 5]), MultiClass::AllKnown);
    }

    #[test]
    fn multi_mix() {
        assert_eq!(classify_multi([1, 3]), MultiClass::Mix);
    }

    #[test]
    fn multi_empty_is_all_new() {
        assert_eq!(classify_multi(Vec::<u32>::new()), MultiClass::AllNew);
    }

    #[test]
    fn multi_class_categories() {
        assert_eq!(MultiClass::AllNew.category(), PhraseCategory::MultiAllNew);
        assert_eq!(MultiClass::AllKnown.category(), PhraseCategory::MultiAllKnown);
        assert_eq!(MultiClass::Mix.category(), PhraseCategory::MultiMix);
    }
}

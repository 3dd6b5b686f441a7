//! Locale-specific knowledge consumed by the training-corpus splitter.

use std::collections::HashSet;

/// An immutable linguistics profile.
///
/// Carries the script direction and the locale's dual-character letters:
/// two-character combinations that form one indivisible letter and must
/// never be split, even when their combined width suggests a cut. The
/// profile is passed explicitly into every call that needs it; there is no
/// process-wide locale state.
#[derive(Debug, Clone, Default)]
pub struct LinguisticsProfile {
    left_to_right: bool,
    dual_character_letters: HashSet<String>,
}

impl LinguisticsProfile {
    /// Creates a profile for a script direction with no dual-character
    /// letters.
    pub fn new(left_to_right: bool) -> Self {
        Self {
            left_to_right,
            dual_character_letters: HashSet::new(),
        }
    }

    /// Adds the locale's dual-character letters.
    pub fn with_dual_character_letters<I, S>(mut self, letters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dual_character_letters
            .extend(letters.into_iter().map(Into::into));
        self
    }

    /// Whether the script runs left-to-right.
    pub fn is_left_to_right(&self) -> bool {
        self.left_to_right
    }

    /// Whether the given string is an indivisible dual-character letter.
    pub fn is_dual_character_letter(&self, letter: &str) -> bool {
        self.dual_character_letters.contains(letter)
    }
}

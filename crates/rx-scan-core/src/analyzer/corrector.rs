//! OCR text corrector.
//!
//! Handles:
//! - Exact misread replacement (hd→bd, m9→mg, diely→daily)
//! - Single-substitution near misses for short tokens (tid→tds)
//! - Trailing punctuation preservation ("hd," → "bd,")

use crate::lexicon::Lexicon;

/// Punctuation kept aside from the lookup when it ends a token.
const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?'];

/// Longest token (in characters) eligible for the near-miss pass.
const MAX_FUZZY_LEN: usize = 4;

/// Word-level corrector for OCR output.
#[derive(Debug, Clone, Default)]
pub struct TextCorrector {
    lexicon: Lexicon,
}

impl TextCorrector {
    pub fn new(lexicon: Lexicon) -> Self {
        Self { lexicon }
    }

    /// Correct every whitespace-delimited token of a line and rejoin with single spaces.
    pub fn correct(&self, line: &str) -> String {
        line.split_whitespace()
            .map(|word| self.correct_word(word))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Correct a single token, keeping one trailing punctuation mark.
    pub fn correct_word(&self, word: &str) -> String {
        let (stem, punctuation) = match word.char_indices().last() {
            Some((idx, c)) if TRAILING_PUNCTUATION.contains(&c) => (&word[..idx], &word[idx..]),
            _ => (word, ""),
        };

        let mut corrected = self.correct_stem(stem);
        corrected.push_str(punctuation);
        corrected
    }

    fn correct_stem(&self, stem: &str) -> String {
        let lower = stem.to_lowercase();

        // Form keywords are left alone so "tab" never folds into a frequency code
        if self.lexicon.dosage_forms.contains(&lower) {
            return stem.to_string();
        }

        if let Some(canonical) = self.lexicon.corrections.get(&lower) {
            return canonical.to_string();
        }

        if lower.chars().count() <= MAX_FUZZY_LEN {
            if let Some(canonical) = self.lexicon.corrections.fuzzy_get(&lower) {
                return canonical.to_string();
            }
        }

        stem.to_string()
    }
}

//! Prescription mention extracted from OCR text.

use serde::{Deserialize, Serialize};

/// A candidate drug reference extracted from one line of prescription text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PrescriptionMention {
    /// Token believed to be the drug name (after OCR correction)
    pub drug_word: String,
    /// Original, uncorrected line (trimmed)
    pub source_line: String,
    /// Canonical dosage form name, empty when none was written
    pub dosage_form: String,
    /// Strength as `<number><unit>` (e.g., "500mg")
    pub dosage: Option<String>,
}

impl PrescriptionMention {
    /// Dosage form, `None` when empty.
    pub fn form(&self) -> Option<&str> {
        if self.dosage_form.is_empty() {
            None
        } else {
            Some(&self.dosage_form)
        }
    }
}

//! Words and header markers that never name a drug.

use std::collections::HashSet;

/// Lexicon of non-drug vocabulary found on prescription pads.
#[derive(Debug, Clone)]
pub struct NonDrugLexicon {
    /// Whole words rejected as drug names
    words: HashSet<String>,
    /// Substrings marking header, vitals and title lines
    header_indicators: Vec<String>,
}

impl Default for NonDrugLexicon {
    fn default() -> Self {
        Self::new()
    }
}

impl NonDrugLexicon {
    /// Create a lexicon with the default vocabulary.
    pub fn new() -> Self {
        Self {
            words: NON_DRUG_WORDS.iter().map(|w| w.to_string()).collect(),
            header_indicators: HEADER_INDICATORS.iter().map(|w| w.to_string()).collect(),
        }
    }

    /// Whether `word` (any case) must not be treated as a drug name.
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(&word.to_lowercase())
    }

    /// First header indicator contained in an already-lowercased line.
    pub fn header_indicator<'a>(&'a self, line_lower: &str) -> Option<&'a str> {
        self.header_indicators
            .iter()
            .find(|indicator| line_lower.contains(indicator.as_str()))
            .map(String::as_str)
    }

    /// Add a custom non-drug word.
    pub fn add_word(&mut self, word: &str) {
        self.words.insert(word.to_lowercase());
    }
}

const NON_DRUG_WORDS: &[&str] = &[
    // Clinic and staff
    "medical", "center", "hospital", "clinic", "doctor", "dr", "mbbs", "consultant", "surgeon",
    "cardiologist", "teaching", "slmc",
    // Patient details
    "mr", "mrs", "ms", "patient", "name", "age", "sex", "male", "female", "date",
    // Contact and registration
    "reg", "no", "tel", "fax", "email", "web", "phone", "since", "scanned", "camera", "sri",
    "lanka",
    // Vitals and labs
    "bp", "hb", "wbc", "plt", "fbs", "tc", "ldl", "tg",
];

const HEADER_INDICATORS: &[&str] = &[
    "medical", "center", "hospital", "clinic", "doctor", "dr.", "patient:", "name:", "age:",
    "sex:", "date:", "reg.", "no.", "tel:", "fax:", "email:", "web:", "since", "scanned", "mbbs",
    "md", "mrcp", "mrcs", "consultant", "surgeon", "bp", "hb", "wbc", "plt", "fbs", "tc", "ldl",
    "tg",
];

//! Match results and the analysis report.

use serde::{Deserialize, Serialize};

use super::{MedicineRecord, PrescriptionMention};

/// Which catalog name drove the match.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    Brand,
    Generic,
}

impl MatchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchType::Brand => "brand",
            MatchType::Generic => "generic",
        }
    }
}

/// Display banding for a final similarity. Not used in scoring.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MatchQuality {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl MatchQuality {
    pub fn from_similarity(similarity: f64) -> Self {
        if similarity >= 0.8 {
            MatchQuality::Excellent
        } else if similarity >= 0.6 {
            MatchQuality::Good
        } else if similarity >= 0.4 {
            MatchQuality::Fair
        } else {
            MatchQuality::Poor
        }
    }
}

/// One scored catalog candidate for a mention.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchResult {
    /// Position of the record in the catalog snapshot
    pub record_index: usize,
    /// The matched catalog record
    pub medicine: MedicineRecord,
    /// Final score: base similarity times dosage/form bonuses, 3 decimals
    pub similarity: f64,
    pub dosage_match: bool,
    pub dosage_form_match: bool,
    /// Brand-name ratio, 3 decimals
    pub brand_similarity: f64,
    /// Generic first-word ratio (undiscounted), 3 decimals
    pub generic_similarity: f64,
    pub match_type: MatchType,
}

impl MatchResult {
    pub fn quality(&self) -> MatchQuality {
        MatchQuality::from_similarity(self.similarity)
    }
}

/// A mention merged with its best catalog match.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MedicineMatch {
    /// Drug word as extracted
    pub prescription: String,
    pub prescription_dosage: Option<String>,
    pub prescription_form: String,
    pub brand: Option<String>,
    pub generic: Option<String>,
    pub db_dosage: Option<String>,
    pub manufacturer: Option<String>,
    pub similarity: f64,
    pub dosage_match: bool,
    pub dosage_form_match: bool,
    pub match_type: MatchType,
    pub match_quality: MatchQuality,
}

impl MedicineMatch {
    /// Merge a mention with its top-ranked match.
    pub fn merge(mention: &PrescriptionMention, result: &MatchResult) -> Self {
        let medicine = &result.medicine;
        Self {
            prescription: mention.drug_word.clone(),
            prescription_dosage: mention.dosage.clone(),
            prescription_form: mention.dosage_form.clone(),
            brand: medicine.brand_name.clone(),
            generic: medicine.generic_name.clone(),
            db_dosage: medicine.dosage.clone(),
            manufacturer: medicine.manufacturer.clone(),
            similarity: result.similarity,
            dosage_match: result.dosage_match,
            dosage_form_match: result.dosage_form_match,
            match_type: result.match_type,
            match_quality: result.quality(),
        }
    }
}

/// Summary counts over the reported matches.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnalysisSummary {
    pub total_matches: usize,
    pub brand_matches: usize,
    pub generic_matches: usize,
    pub dosage_matches: usize,
    pub form_matches: usize,
}

impl AnalysisSummary {
    pub fn from_matches(matches: &[MedicineMatch]) -> Self {
        Self {
            total_matches: matches.len(),
            brand_matches: matches
                .iter()
                .filter(|m| m.match_type == MatchType::Brand)
                .count(),
            generic_matches: matches
                .iter()
                .filter(|m| m.match_type == MatchType::Generic)
                .count(),
            dosage_matches: matches.iter().filter(|m| m.dosage_match).count(),
            form_matches: matches.iter().filter(|m| m.dosage_form_match).count(),
        }
    }
}

/// Full result of analyzing one OCR document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisReport {
    /// Echo of the input text, truncated
    pub raw_text: String,
    /// Number of mentions extracted, matched or not
    pub prescriptions_found: usize,
    /// Best match per mention, in line order
    pub medicines: Vec<MedicineMatch>,
    pub summary: AnalysisSummary,
}

impl AnalysisReport {
    /// Serialize to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Truncate to `limit` characters, appending "..." when anything was cut.
pub fn preview_text(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}

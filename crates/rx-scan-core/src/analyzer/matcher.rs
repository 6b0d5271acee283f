//! Catalog matching using multiplicative scoring.
//!
//! Scoring:
//! - Base: best of brand similarity and discounted generic similarity
//! - Dosage bonus: ×1.5 exact strength, ×1.3 partial, ×1.2 shared unit
//! - Form bonus: ×1.2 literal form in catalog dosage, ×1.1 synonym

use std::cmp::Ordering;
use std::sync::LazyLock;

use regex::Regex;

use crate::config::AnalyzerConfig;
use crate::lexicon::FORM_SYNONYMS;
use crate::models::{Catalog, MatchResult, MatchType, MedicineRecord, PrescriptionMention};

use super::similarity::ratio;

const EXACT_DOSAGE_BONUS: f64 = 1.5;
const PARTIAL_DOSAGE_BONUS: f64 = 1.3;
const SHARED_UNIT_BONUS: f64 = 1.2;
const FORM_BONUS: f64 = 1.2;
const FORM_SYNONYM_BONUS: f64 = 1.1;

/// Unit tokens checked, in order, when strengths cannot be compared numerically.
const COMMON_UNITS: &[&str] = &["mg", "g", "ml", "mcg", "iu", "%"];

static NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+\.?\d*").unwrap());

/// First number embedded in a dosage string, as written.
pub fn first_number(text: &str) -> Option<&str> {
    NUMBER_RE.find(text).map(|m| m.as_str())
}

/// Round to 3 decimal places.
pub fn round3(value: f64) -> f64 {
    format!("{value:.3}").parse().unwrap_or(value)
}

/// Matcher over an immutable catalog snapshot.
#[derive(Debug, Clone)]
pub struct MedicineMatcher {
    catalog: Catalog,
    min_base_similarity: f64,
    generic_discount: f64,
}

impl MedicineMatcher {
    /// Create a matcher with default thresholds.
    pub fn new(catalog: Catalog) -> Self {
        Self::with_config(catalog, &AnalyzerConfig::default())
    }

    pub fn with_config(catalog: Catalog, config: &AnalyzerConfig) -> Self {
        Self {
            catalog,
            min_base_similarity: config.min_base_similarity,
            generic_discount: config.generic_discount,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Best catalog match for a mention.
    pub fn match_mention(&self, mention: &PrescriptionMention) -> Option<MatchResult> {
        self.match_medicine(&mention.drug_word, mention.dosage.as_deref(), mention.form())
    }

    /// Best catalog match for a drug word with optional dosage and form.
    ///
    /// Ties on final similarity go to the earliest catalog record.
    pub fn match_medicine(
        &self,
        drug_word: &str,
        dosage: Option<&str>,
        dosage_form: Option<&str>,
    ) -> Option<MatchResult> {
        self.rank(drug_word, dosage, dosage_form).into_iter().next()
    }

    /// Every candidate clearing the similarity floor, best first (stable on ties).
    pub fn rank(
        &self,
        drug_word: &str,
        dosage: Option<&str>,
        dosage_form: Option<&str>,
    ) -> Vec<MatchResult> {
        let query = Query::new(drug_word, dosage, dosage_form);

        let mut scored: Vec<MatchResult> = self
            .catalog
            .iter()
            .enumerate()
            .filter_map(|(index, record)| self.score_candidate(index, record, &query))
            .collect();

        scored.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(Ordering::Equal)
        });

        scored
    }

    /// Score a single record; `None` when its base similarity is below the floor.
    fn score_candidate(
        &self,
        index: usize,
        record: &MedicineRecord,
        query: &Query<'_>,
    ) -> Option<MatchResult> {
        let brand = record.brand_lower();
        let generic = record.generic_first_word_lower();
        let db_dosage = record.dosage_lower();

        let brand_similarity = if brand.is_empty() {
            0.0
        } else {
            ratio(&query.drug, &brand)
        };
        let generic_similarity = if generic.is_empty() {
            0.0
        } else {
            ratio(&query.drug, &generic)
        };

        let base = brand_similarity.max(generic_similarity * self.generic_discount);
        if base < self.min_base_similarity {
            return None;
        }

        let mut bonus = 1.0;

        let dosage_bonus = query
            .dosage
            .and_then(|dosage| score_dosage(dosage, query.dosage_num, &db_dosage));
        if let Some(factor) = dosage_bonus {
            bonus *= factor;
        }

        let form_bonus = query
            .dosage_form
            .and_then(|form| score_form(form, &db_dosage));
        if let Some(factor) = form_bonus {
            bonus *= factor;
        }

        let match_type = if brand_similarity > generic_similarity {
            MatchType::Brand
        } else {
            MatchType::Generic
        };

        Some(MatchResult {
            record_index: index,
            medicine: record.clone(),
            similarity: round3(base * bonus),
            dosage_match: dosage_bonus.is_some(),
            dosage_form_match: form_bonus.is_some(),
            brand_similarity: round3(brand_similarity),
            generic_similarity: round3(generic_similarity),
            match_type,
        })
    }
}

/// Mention fields prepared once per ranking.
struct Query<'a> {
    drug: String,
    dosage: Option<&'a str>,
    dosage_num: Option<&'a str>,
    dosage_form: Option<&'a str>,
}

impl<'a> Query<'a> {
    fn new(drug_word: &str, dosage: Option<&'a str>, dosage_form: Option<&'a str>) -> Self {
        let dosage = dosage.filter(|d| !d.is_empty());
        Self {
            drug: drug_word.to_lowercase(),
            dosage,
            dosage_num: dosage.and_then(first_number),
            dosage_form: dosage_form.filter(|f| !f.is_empty()),
        }
    }
}

/// Dosage agreement factor, `None` when strengths do not agree.
///
/// `db_dosage` is already lowercased.
fn score_dosage(dosage: &str, dosage_num: Option<&str>, db_dosage: &str) -> Option<f64> {
    if db_dosage.is_empty() {
        return None;
    }

    match (dosage_num, first_number(db_dosage)) {
        (Some(num), Some(db_num)) => {
            if num == db_num {
                Some(EXACT_DOSAGE_BONUS)
            } else if db_dosage.contains(num) || dosage.contains(db_num) {
                Some(PARTIAL_DOSAGE_BONUS)
            } else {
                None
            }
        }
        _ => {
            let dosage = dosage.to_lowercase();
            if db_dosage.contains(&dosage) {
                Some(PARTIAL_DOSAGE_BONUS)
            } else if COMMON_UNITS
                .iter()
                .any(|unit| dosage.contains(unit) && db_dosage.contains(unit))
            {
                Some(SHARED_UNIT_BONUS)
            } else {
                None
            }
        }
    }
}

/// Dosage-form agreement factor, `None` when the catalog dosage does not mention the form.
fn score_form(dosage_form: &str, db_dosage: &str) -> Option<f64> {
    if db_dosage.is_empty() {
        return None;
    }

    let form = dosage_form.to_lowercase();
    if db_dosage.contains(&form) {
        return Some(FORM_BONUS);
    }

    FORM_SYNONYMS
        .iter()
        .find(|(canonical, synonyms)| {
            synonyms.contains(&form.as_str()) && db_dosage.contains(canonical)
        })
        .map(|_| FORM_SYNONYM_BONUS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_catalog() -> Catalog {
        Catalog::new(vec![
            MedicineRecord::new(1, "Panadol")
                .with_generic("Paracetamol")
                .with_dosage("500mg"),
            MedicineRecord::new(2, "Amoxil")
                .with_generic("Amoxicillin Trihydrate")
                .with_dosage("250mg capsule"),
            MedicineRecord::new(3, "Calpol")
                .with_generic("Paracetamol")
                .with_dosage("120mg/5ml syrup"),
            MedicineRecord::new(4, "Losartas")
                .with_generic("Losartan Potassium")
                .with_dosage("50mg tablet"),
        ])
    }

    #[test]
    fn test_exact_brand_and_dosage() {
        let matcher = MedicineMatcher::new(setup_catalog());
        let result = matcher
            .match_medicine("Panadol", Some("500mg"), None)
            .unwrap();

        assert_eq!(result.medicine.id, 1);
        assert_eq!(result.similarity, 1.5);
        assert!(result.dosage_match);
        assert!(!result.dosage_form_match);
        assert_eq!(result.brand_similarity, 1.0);
        assert_eq!(result.match_type, MatchType::Brand);
    }

    #[test]
    fn test_generic_match_discounted() {
        let matcher = MedicineMatcher::new(setup_catalog());
        let result = matcher.match_medicine("Losartan", None, None).unwrap();

        // Generic first word matches exactly, discounted by 0.9; brand "losartas" scores 0.875
        assert_eq!(result.medicine.id, 4);
        assert_eq!(result.generic_similarity, 1.0);
        assert_eq!(result.brand_similarity, 0.875);
        assert_eq!(result.similarity, 0.9);
        assert_eq!(result.match_type, MatchType::Generic);
    }

    #[test]
    fn test_partial_dosage_bonus() {
        let matcher = MedicineMatcher::new(setup_catalog());

        // "5" is not "120" but appears inside "120mg/5ml syrup"
        let result = matcher.match_medicine("Calpol", Some("5ml"), None).unwrap();
        assert_eq!(result.medicine.id, 3);
        assert!(result.dosage_match);
        assert_eq!(result.similarity, 1.3);
    }

    #[test]
    fn test_mismatched_numbers_get_no_unit_bonus() {
        let matcher = MedicineMatcher::new(setup_catalog());
        let result = matcher.match_medicine("Panadol", Some("650mg"), None).unwrap();

        assert!(!result.dosage_match);
        assert_eq!(result.similarity, 1.0);
    }

    #[test]
    fn test_substring_bonus_without_prescription_number() {
        // No number on the prescription side: containment decides before the unit check
        let catalog = Catalog::new(vec![MedicineRecord::new(1, "Panadol").with_dosage("500mg")]);
        let matcher = MedicineMatcher::new(catalog);

        let result = matcher.match_medicine("Panadol", Some("mg"), None).unwrap();
        assert!(result.dosage_match);
        assert_eq!(result.similarity, 1.3);
    }

    #[test]
    fn test_unit_bonus_without_catalog_number() {
        let catalog = Catalog::new(vec![MedicineRecord::new(1, "Betnovate").with_dosage("cream mg")]);
        let matcher = MedicineMatcher::new(catalog);

        let result = matcher.match_medicine("Betnovate", Some("20mg"), None).unwrap();
        assert!(result.dosage_match);
        assert_eq!(result.similarity, 1.2);
    }

    #[test]
    fn test_form_bonuses() {
        let matcher = MedicineMatcher::new(setup_catalog());

        let literal = matcher
            .match_medicine("Losartas", Some("50mg"), Some("tablet"))
            .unwrap();
        assert!(literal.dosage_form_match);
        assert_eq!(literal.similarity, 1.8);

        let synonym = matcher
            .match_medicine("Amoxil", None, Some("cap."))
            .unwrap();
        assert!(synonym.dosage_form_match);
        assert_eq!(synonym.similarity, 1.1);
    }

    #[test]
    fn test_form_without_catalog_dosage() {
        let catalog = Catalog::new(vec![MedicineRecord::new(1, "Panadol")]);
        let matcher = MedicineMatcher::new(catalog);

        let result = matcher
            .match_medicine("Panadol", Some("500mg"), Some("tablet"))
            .unwrap();
        assert!(!result.dosage_match);
        assert!(!result.dosage_form_match);
        assert_eq!(result.similarity, 1.0);
    }

    #[test]
    fn test_floor_discards_candidates() {
        let matcher = MedicineMatcher::new(setup_catalog());

        assert!(matcher.match_medicine("Xyzzy", None, None).is_none());
        for result in matcher.rank("Pan", None, None) {
            let base = result
                .brand_similarity
                .max(result.generic_similarity * 0.9);
            assert!(base >= 0.3 - 1e-3);
        }
    }

    #[test]
    fn test_ties_keep_catalog_order() {
        let catalog = Catalog::new(vec![
            MedicineRecord::new(10, "Panadol"),
            MedicineRecord::new(11, "Panadol"),
            MedicineRecord::new(12, "Panadol"),
        ]);
        let matcher = MedicineMatcher::new(catalog);

        let ranked = matcher.rank("Panadol", None, None);
        let ids: Vec<i64> = ranked.iter().map(|r| r.medicine.id).collect();
        assert_eq!(ids, vec![10, 11, 12]);
        assert_eq!(matcher.match_medicine("Panadol", None, None).unwrap().medicine.id, 10);
    }

    #[test]
    fn test_empty_catalog() {
        let matcher = MedicineMatcher::new(Catalog::empty());
        assert!(matcher.match_medicine("Panadol", Some("500mg"), None).is_none());
    }

    #[test]
    fn test_helpers() {
        assert_eq!(first_number("500mg"), Some("500"));
        assert_eq!(first_number("2.5 mg"), Some("2.5"));
        assert_eq!(first_number("cream"), None);
        assert_eq!(round3(0.70588235), 0.706);
        assert_eq!(round3(1.5), 1.5);
    }
}

//! Prescription line extractor.
//!
//! Each corrected line is searched with an ordered list of patterns, most specific first.
//! The first pattern that matches anywhere in the line decides the field layout; at most one
//! mention is produced per line.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::lexicon::Lexicon;
use crate::models::PrescriptionMention;

use super::TextCorrector;

/// Unit assumed when the winning pattern carries no unit group.
const DEFAULT_UNIT: &str = "mg";

/// Shortest drug word accepted.
const MIN_DRUG_WORD_LEN: usize = 3;

/// Shortest line (trimmed, in characters) worth searching.
const MIN_LINE_LEN: usize = 2;

/// Layout of an extraction pattern, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    /// `tab Paracetamol 500mg`
    FormDrugDose,
    /// `Amoxil 250mg tds / 5`
    DrugDoseFrequencyDuration,
    /// `Amoxil 250mg tds`
    DrugDoseFrequency,
    /// `Amoxil 250mg`
    DrugDose,
    /// `Amoxil-250`
    HyphenatedDose,
    /// `Amoxil 250`
    BareNumber,
    /// `Amoxil`
    DrugOnly,
}

/// A compiled extraction pattern.
pub struct ExtractionPattern {
    pub kind: PatternKind,
    regex: Regex,
}

impl ExtractionPattern {
    fn new(kind: PatternKind, pattern: &str) -> Self {
        Self {
            kind,
            regex: Regex::new(&format!("(?i){pattern}")).unwrap(),
        }
    }

    /// Number of capture groups, excluding the whole match.
    pub fn group_count(&self) -> usize {
        self.regex.captures_len() - 1
    }
}

/// Extraction patterns in the order they are tried. Do not reorder.
static PATTERNS: LazyLock<Vec<ExtractionPattern>> = LazyLock::new(|| {
    vec![
        ExtractionPattern::new(
            PatternKind::FormDrugDose,
            r"\b(syp|cream|la|tab|cap|inj|drop|ointment|gel|lotion|powder|spray)\.?\s+([A-Z][a-z]{2,})(?:\s+(\d+)\s*([a-z]{1,4}))?\b",
        ),
        ExtractionPattern::new(
            PatternKind::DrugDoseFrequencyDuration,
            r"\b([A-Z][a-z]{2,})\s+(\d+)\s*([a-z]{1,4})\s+([a-z.]{1,6})\s*/\s*(\d+)\b",
        ),
        ExtractionPattern::new(
            PatternKind::DrugDoseFrequency,
            r"\b([A-Z][a-z]{2,})\s+(\d+)\s*([a-z]{1,4})\s+([a-z.]{1,6})\b",
        ),
        ExtractionPattern::new(
            PatternKind::DrugDose,
            r"\b([A-Z][a-z]{2,})\s+(\d+)\s*([a-z]{1,4})\b",
        ),
        ExtractionPattern::new(PatternKind::HyphenatedDose, r"\b([A-Z][a-z]{2,})-(\d+)\b"),
        ExtractionPattern::new(PatternKind::BareNumber, r"\b([A-Z][a-z]{2,})\s+(\d+)\b"),
        ExtractionPattern::new(PatternKind::DrugOnly, r"\b([A-Z][a-z]{3,})\b"),
    ]
});

/// Fields pulled out of a winning match, before drug-word validation.
#[derive(Debug, Clone, PartialEq)]
struct ParsedFields {
    drug_word: String,
    dosage_form: String,
    dosage: Option<String>,
}

/// Extracts prescription mentions from OCR text.
#[derive(Debug, Clone, Default)]
pub struct LineExtractor {
    lexicon: Lexicon,
    corrector: TextCorrector,
}

impl LineExtractor {
    pub fn new(lexicon: Lexicon) -> Self {
        Self {
            corrector: TextCorrector::new(lexicon.clone()),
            lexicon,
        }
    }

    /// The corrector applied to each line before matching.
    pub fn corrector(&self) -> &TextCorrector {
        &self.corrector
    }

    /// Extract at most one mention per line, in line order.
    pub fn extract(&self, raw_text: &str) -> Vec<PrescriptionMention> {
        raw_text
            .split('\n')
            .filter_map(|line| self.extract_line(line))
            .collect()
    }

    /// Extract a mention from a single line.
    pub fn extract_line(&self, line: &str) -> Option<PrescriptionMention> {
        let source_line = line.trim();
        if source_line.chars().count() < MIN_LINE_LEN {
            return None;
        }

        let corrected = self.corrector.correct(line);
        let corrected = corrected.trim();

        if let Some(indicator) = self
            .lexicon
            .non_drug
            .header_indicator(&corrected.to_lowercase())
        {
            tracing::debug!(line = source_line, indicator, "Skipping header line");
            return None;
        }

        let (pattern, caps) = PATTERNS
            .iter()
            .find_map(|p| p.regex.captures(corrected).map(|caps| (p, caps)))?;

        let fields = self.parse_fields(&caps, pattern.group_count());

        if !self.is_drug_word(&fields.drug_word) {
            tracing::debug!(
                line = source_line,
                word = %fields.drug_word,
                "Rejected non-drug word"
            );
            return None;
        }

        tracing::debug!(
            line = source_line,
            pattern = ?pattern.kind,
            drug = %fields.drug_word,
            "Extracted prescription mention"
        );

        Some(PrescriptionMention {
            drug_word: fields.drug_word,
            source_line: source_line.to_string(),
            dosage_form: fields.dosage_form,
            dosage: fields.dosage,
        })
    }

    /// Whether a candidate word may be reported as a drug.
    pub fn is_drug_word(&self, word: &str) -> bool {
        word.chars().count() >= MIN_DRUG_WORD_LEN && !self.lexicon.non_drug.contains(word)
    }

    /// Map capture groups to fields.
    ///
    /// When group 1 is a dosage-form keyword the layout shifts by one: group 2 is the drug and
    /// group 3 the number. The unit is only read when the pattern has a group past it;
    /// otherwise it defaults to mg.
    fn parse_fields(&self, caps: &Captures<'_>, group_count: usize) -> ParsedFields {
        let group = |idx: usize| caps.get(idx).map(|m| m.as_str());
        let first = group(1).unwrap_or_default();

        let form = if group_count >= 3 {
            self.lexicon.dosage_forms.canonical(first)
        } else {
            None
        };

        let (drug_word, dosage_form, number_idx) = match form {
            Some(canonical) => (group(2).unwrap_or_default(), canonical.to_string(), 3),
            None => (first, String::new(), 2),
        };

        let dosage = if group_count > number_idx {
            group(number_idx)
                .filter(|n| !n.is_empty())
                .and_then(|number| self.build_dosage(number, group_count, number_idx + 1, &group))
        } else {
            None
        };

        ParsedFields {
            drug_word: drug_word.to_string(),
            dosage_form,
            dosage,
        }
    }

    fn build_dosage<'t>(
        &self,
        number: &str,
        group_count: usize,
        unit_idx: usize,
        group: &impl Fn(usize) -> Option<&'t str>,
    ) -> Option<String> {
        let unit = if group_count > unit_idx {
            group(unit_idx)?.to_lowercase()
        } else {
            DEFAULT_UNIT.to_string()
        };

        let unit = self
            .lexicon
            .corrections
            .get(&unit)
            .map(str::to_string)
            .unwrap_or(unit);

        Some(format!("{number}{unit}"))
    }
}

//! Prescription analyzer.
//!
//! Pipeline: OCR text → Correction → Line Extraction → Catalog Matching → Report

mod corrector;
mod extractor;
mod matcher;
pub mod similarity;

pub use corrector::*;
pub use extractor::*;
pub use matcher::*;

use crate::config::AnalyzerConfig;
use crate::db::CatalogSource;
use crate::lexicon::Lexicon;
use crate::models::{
    preview_text, AnalysisReport, AnalysisSummary, Catalog, MedicineMatch, PrescriptionMention,
};

/// Main analyzer that coordinates the full pipeline.
///
/// Holds only immutable state, so one instance can serve concurrent callers.
#[derive(Debug, Clone)]
pub struct Analyzer {
    extractor: LineExtractor,
    matcher: MedicineMatcher,
    config: AnalyzerConfig,
}

impl Analyzer {
    /// Create an analyzer over a catalog with default tables and settings.
    pub fn new(catalog: Catalog) -> Self {
        Self::with_config(catalog, Lexicon::new(), AnalyzerConfig::default())
    }

    /// Create an analyzer with custom tables and settings.
    pub fn with_config(catalog: Catalog, lexicon: Lexicon, config: AnalyzerConfig) -> Self {
        Self {
            extractor: LineExtractor::new(lexicon),
            matcher: MedicineMatcher::with_config(catalog, &config),
            config,
        }
    }

    /// Load the catalog from a source; a failing source leaves the catalog empty.
    pub fn from_source<S: CatalogSource + ?Sized>(source: &S) -> Self {
        Self::new(Catalog::load(source))
    }

    /// Analyze OCR text into a report.
    pub fn analyze(&self, raw_text: &str) -> AnalysisReport {
        let mentions = self.extractor.extract(raw_text);

        let medicines: Vec<MedicineMatch> = mentions
            .iter()
            .filter_map(|mention| self.match_mention(mention))
            .collect();

        let summary = AnalysisSummary::from_matches(&medicines);
        tracing::debug!(
            prescriptions_found = mentions.len(),
            total_matches = summary.total_matches,
            dosage_matches = summary.dosage_matches,
            "Analyzed prescription text"
        );

        AnalysisReport {
            raw_text: preview_text(raw_text, self.config.raw_text_preview_chars),
            prescriptions_found: mentions.len(),
            medicines,
            summary,
        }
    }

    /// Analyze OCR text and serialize the report as JSON.
    pub fn analyze_json(&self, raw_text: &str) -> Result<String, serde_json::Error> {
        self.analyze(raw_text).to_json()
    }

    fn match_mention(&self, mention: &PrescriptionMention) -> Option<MedicineMatch> {
        let result = self.matcher.match_mention(mention)?;
        Some(MedicineMatch::merge(mention, &result))
    }

    /// Get the extractor for direct access.
    pub fn extractor(&self) -> &LineExtractor {
        &self.extractor
    }

    /// Get the matcher for direct access.
    pub fn matcher(&self) -> &MedicineMatcher {
        &self.matcher
    }

    /// Get the corrector for direct access.
    pub fn corrector(&self) -> &TextCorrector {
        self.extractor.corrector()
    }

    pub fn catalog(&self) -> &Catalog {
        self.matcher.catalog()
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }
}

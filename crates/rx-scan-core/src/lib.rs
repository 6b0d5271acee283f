//! Rx-Scan Core Library
//!
//! Turns OCR text from a photographed prescription into structured medicine matches against a
//! local catalog.
//!
//! # Architecture
//!
//! ```text
//! Image → Text Detection (rx-scan-vision) → OCR text
//!                                              │
//!                                      Line Correction
//!                                  (bd/tds/od, mg/ml misreads)
//!                                              │
//!                                      Mention Extraction
//!                                (ordered line patterns, filters)
//!                                              │
//!                          ┌───────────────────▼───────────────────┐
//!                          │          Catalog Matching             │
//!                          │  brand / generic similarity           │
//!                          │  × dosage bonus × form bonus          │
//!                          └───────────────────┬───────────────────┘
//!                                              │
//!                                       AnalysisReport
//! ```
//!
//! # Modules
//!
//! - [`analyzer`]: Correction, extraction, matching and the pipeline aggregator
//! - [`config`]: Analyzer tunables
//! - [`db`]: SQLite medicine catalog
//! - [`lexicon`]: Correction, dosage-form and non-drug tables
//! - [`models`]: Domain types (MedicineRecord, PrescriptionMention, AnalysisReport, etc.)

pub mod analyzer;
pub mod config;
pub mod db;
pub mod lexicon;
pub mod models;

// Re-export commonly used types
pub use analyzer::{Analyzer, LineExtractor, MedicineMatcher, TextCorrector};
pub use config::AnalyzerConfig;
pub use db::{CatalogSource, Database};
pub use lexicon::Lexicon;
pub use models::{
    AnalysisReport, AnalysisSummary, Catalog, MatchQuality, MatchResult, MatchType, MedicineMatch,
    MedicineRecord, PrescriptionMention,
};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::path::Path;
use std::sync::Arc;

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum RxScanError {
    #[error("No text detected or text too short: {0}")]
    InsufficientText(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<config::ConfigError> for RxScanError {
    fn from(e: config::ConfigError) -> Self {
        RxScanError::InvalidConfig(e.to_string())
    }
}

impl From<serde_json::Error> for RxScanError {
    fn from(e: serde_json::Error) -> Self {
        RxScanError::Serialization(e.to_string())
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open an analyzer over the catalog database at the given path.
///
/// An unreadable database leaves the catalog empty; analysis still extracts mentions.
#[uniffi::export]
pub fn open_analyzer(catalog_db_path: String) -> Arc<RxScanCore> {
    Arc::new(RxScanCore::new(
        load_catalog(&catalog_db_path),
        AnalyzerConfig::default(),
    ))
}

/// Open an analyzer with a JSON configuration.
#[uniffi::export]
pub fn open_analyzer_with_config(
    catalog_db_path: String,
    config_json: String,
) -> Result<Arc<RxScanCore>, RxScanError> {
    let config = AnalyzerConfig::from_json_str(&config_json)?;
    Ok(Arc::new(RxScanCore::new(
        load_catalog(&catalog_db_path),
        config,
    )))
}

/// Create an analyzer with an empty catalog (for testing).
#[uniffi::export]
pub fn open_analyzer_empty() -> Arc<RxScanCore> {
    Arc::new(RxScanCore::new(Catalog::empty(), AnalyzerConfig::default()))
}

fn load_catalog<P: AsRef<Path>>(path: P) -> Catalog {
    let path = path.as_ref();
    match Database::open(path) {
        Ok(db) => Catalog::load(&db),
        Err(e) => {
            tracing::warn!("Failed to open catalog database {}: {e}", path.display());
            Catalog::empty()
        }
    }
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe analyzer wrapper for FFI.
///
/// The analyzer is immutable, so no lock is needed.
#[derive(uniffi::Object)]
pub struct RxScanCore {
    analyzer: Arc<Analyzer>,
}

impl RxScanCore {
    fn new(catalog: Catalog, config: AnalyzerConfig) -> Self {
        Self {
            analyzer: Arc::new(Analyzer::with_config(catalog, Lexicon::new(), config)),
        }
    }

    fn check_text(&self, text: &str) -> Result<(), RxScanError> {
        let characters = text.trim().chars().count();
        let minimum = self.analyzer.config().min_detected_text_chars;
        if characters < minimum {
            return Err(RxScanError::InsufficientText(format!(
                "{characters} characters, need at least {minimum}"
            )));
        }
        Ok(())
    }
}

#[uniffi::export]
impl RxScanCore {
    /// Analyze detected prescription text.
    pub fn analyze_text(&self, text: String) -> Result<FfiAnalysisReport, RxScanError> {
        self.check_text(&text)?;
        Ok(self.analyzer.analyze(&text).into())
    }

    /// Analyze detected prescription text and return the report as JSON.
    pub fn analyze_text_json(&self, text: String) -> Result<String, RxScanError> {
        self.check_text(&text)?;
        Ok(self.analyzer.analyze_json(&text)?)
    }

    /// Apply OCR corrections to a single line.
    pub fn correct_line(&self, line: String) -> String {
        self.analyzer.corrector().correct(&line)
    }

    /// Number of medicines available for matching.
    pub fn catalog_size(&self) -> u32 {
        self.analyzer.catalog().len() as u32
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe analysis report.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiAnalysisReport {
    pub raw_text: String,
    pub prescriptions_found: u32,
    pub medicines: Vec<FfiMedicineMatch>,
    pub summary: FfiAnalysisSummary,
}

impl From<AnalysisReport> for FfiAnalysisReport {
    fn from(report: AnalysisReport) -> Self {
        Self {
            raw_text: report.raw_text,
            prescriptions_found: report.prescriptions_found as u32,
            medicines: report.medicines.into_iter().map(|m| m.into()).collect(),
            summary: report.summary.into(),
        }
    }
}

/// FFI-safe medicine match.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiMedicineMatch {
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
    pub match_type: String,
    pub match_quality: String,
}

impl From<MedicineMatch> for FfiMedicineMatch {
    fn from(m: MedicineMatch) -> Self {
        Self {
            prescription: m.prescription,
            prescription_dosage: m.prescription_dosage,
            prescription_form: m.prescription_form,
            brand: m.brand,
            generic: m.generic,
            db_dosage: m.db_dosage,
            manufacturer: m.manufacturer,
            similarity: m.similarity,
            dosage_match: m.dosage_match,
            dosage_form_match: m.dosage_form_match,
            match_type: m.match_type.as_str().to_string(),
            match_quality: format!("{:?}", m.match_quality),
        }
    }
}

/// FFI-safe summary counts.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiAnalysisSummary {
    pub total_matches: u32,
    pub brand_matches: u32,
    pub generic_matches: u32,
    pub dosage_matches: u32,
    pub form_matches: u32,
}

impl From<AnalysisSummary> for FfiAnalysisSummary {
    fn from(summary: AnalysisSummary) -> Self {
        Self {
            total_matches: summary.total_matches as u32,
            brand_matches: summary.brand_matches as u32,
            generic_matches: summary.generic_matches as u32,
            dosage_matches: summary.dosage_matches as u32,
            form_matches: summary.form_matches as u32,
        }
    }
}

//! Static lookup tables used by the analyzer.
//!
//! All tables are immutable once built and are shared between the corrector, extractor
//! and matcher through [`Lexicon`].

mod corrections;
mod dosage_forms;
mod non_drug;

pub use corrections::*;
pub use dosage_forms::*;
pub use non_drug::*;

use std::sync::Arc;

/// Bundle of the lookup tables, cheap to clone.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    pub corrections: Arc<CorrectionTable>,
    pub dosage_forms: Arc<DosageFormTable>,
    pub non_drug: Arc<NonDrugLexicon>,
}

impl Lexicon {
    /// Lexicon with the default prescription vocabulary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Lexicon from custom tables.
    pub fn from_tables(
        corrections: CorrectionTable,
        dosage_forms: DosageFormTable,
        non_drug: NonDrugLexicon,
    ) -> Self {
        Self {
            corrections: Arc::new(corrections),
            dosage_forms: Arc::new(dosage_forms),
            non_drug: Arc::new(non_drug),
        }
    }
}

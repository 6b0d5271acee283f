//! Medicine catalog models.

use std::ops::Deref;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::db::CatalogSource;

/// A single medicine in the reference catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MedicineRecord {
    /// Catalog identifier
    pub id: i64,
    /// Generic (INN) name, possibly several words (e.g., "Paracetamol BP")
    pub generic_name: Option<String>,
    /// Brand/trade name
    pub brand_name: Option<String>,
    /// Free-text strength and form (e.g., "500mg tablet")
    pub dosage: Option<String>,
    pub manufacturer: Option<String>,
    pub pack_size: Option<String>,
    pub pack_type: Option<String>,
    /// Regulatory schedule
    pub schedule: Option<String>,
}

impl MedicineRecord {
    /// Create a record with only a brand name set.
    pub fn new(id: i64, brand_name: &str) -> Self {
        Self {
            id,
            generic_name: None,
            brand_name: Some(brand_name.to_string()),
            dosage: None,
            manufacturer: None,
            pack_size: None,
            pack_type: None,
            schedule: None,
        }
    }

    /// Set the generic name.
    pub fn with_generic(mut self, generic_name: &str) -> Self {
        self.generic_name = Some(generic_name.to_string());
        self
    }

    /// Set the dosage text.
    pub fn with_dosage(mut self, dosage: &str) -> Self {
        self.dosage = Some(dosage.to_string());
        self
    }

    /// Set the manufacturer.
    pub fn with_manufacturer(mut self, manufacturer: &str) -> Self {
        self.manufacturer = Some(manufacturer.to_string());
        self
    }

    /// Lowercased brand name, empty when absent.
    pub fn brand_lower(&self) -> String {
        lower_or_empty(self.brand_name.as_deref())
    }

    /// Lowercased first word of the generic name, empty when absent.
    pub fn generic_first_word_lower(&self) -> String {
        self.generic_name
            .as_deref()
            .and_then(|g| g.split_whitespace().next())
            .map(str::to_lowercase)
            .unwrap_or_default()
    }

    /// Lowercased dosage text, empty when absent.
    pub fn dosage_lower(&self) -> String {
        lower_or_empty(self.dosage.as_deref())
    }
}

fn lower_or_empty(value: Option<&str>) -> String {
    value.map(str::to_lowercase).unwrap_or_default()
}

/// Immutable, shareable snapshot of the medicine catalog.
///
/// Record order is preserved; it is the tie-break for ranking.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Arc<[MedicineRecord]>,
}

impl Catalog {
    /// Create a snapshot from records in catalog order.
    pub fn new(records: Vec<MedicineRecord>) -> Self {
        Self {
            records: records.into(),
        }
    }

    /// An empty catalog. Analyses still extract mentions but never match.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load a snapshot from a catalog source.
    ///
    /// A failing source yields an empty catalog; the failure is logged, not returned.
    pub fn load<S: CatalogSource + ?Sized>(source: &S) -> Self {
        match source.load_medicines() {
            Ok(records) => {
                tracing::info!(count = records.len(), "Loaded medicine catalog");
                Self::new(records)
            }
            Err(e) => {
                tracing::warn!("Medicine catalog unavailable, continuing with an empty catalog: {e}");
                Self::empty()
            }
        }
    }

    pub fn records(&self) -> &[MedicineRecord] {
        &self.records
    }
}

impl Deref for Catalog {
    type Target = [MedicineRecord];

    fn deref(&self) -> &Self::Target {
        &self.records
    }
}

impl From<Vec<MedicineRecord>> for Catalog {
    fn from(records: Vec<MedicineRecord>) -> Self {
        Self::new(records)
    }
}

//! SQLite schema definition.

/// Medicine catalog schema.
///
/// Column names follow the pharmacy catalog export the loader reads.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS medicines (
    medicine_id INTEGER PRIMARY KEY,
    generic_name TEXT,
    brand_name TEXT,
    dosage TEXT,
    manufacturer TEXT,
    pack_size TEXT,
    pack_type TEXT,
    schedule TEXT
);

CREATE INDEX IF NOT EXISTS idx_medicines_brand_name ON medicines(brand_name COLLATE NOCASE);
"#;

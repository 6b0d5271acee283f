//! Medicine catalog operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbError, DbResult};
use crate::models::MedicineRecord;

const MEDICINE_COLUMNS: &str = "medicine_id, generic_name, brand_name, dosage, manufacturer, \
                                pack_size, pack_type, schedule";

impl Database {
    /// Insert or replace a medicine.
    pub fn insert_medicine(&self, record: &MedicineRecord) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT OR REPLACE INTO medicines (
                medicine_id, generic_name, brand_name, dosage, manufacturer,
                pack_size, pack_type, schedule
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                record.id,
                record.generic_name,
                record.brand_name,
                record.dosage,
                record.manufacturer,
                record.pack_size,
                record.pack_type,
                record.schedule,
            ],
        )?;
        Ok(())
    }

    /// Get a medicine by id.
    pub fn get_medicine(&self, id: i64) -> DbResult<MedicineRecord> {
        let sql = format!("SELECT {MEDICINE_COLUMNS} FROM medicines WHERE medicine_id = ?");
        self.conn
            .query_row(&sql, [id], MedicineRow::from_row)
            .optional()?
            .map(MedicineRecord::from)
            .ok_or_else(|| DbError::NotFound(format!("medicine {id}")))
    }

    /// Medicines usable for matching: a real brand name, ordered by brand ignoring case.
    ///
    /// `***` marks a withdrawn brand in the catalog export.
    pub fn list_medicines(&self) -> DbResult<Vec<MedicineRecord>> {
        let sql = format!(
            "SELECT {MEDICINE_COLUMNS} FROM medicines \
             WHERE brand_name IS NOT NULL AND brand_name != '***' \
             ORDER BY brand_name COLLATE NOCASE"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], MedicineRow::from_row)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?.into());
        }
        Ok(records)
    }

    /// Number of rows in the medicines table, unfiltered.
    pub fn count_medicines(&self) -> DbResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM medicines", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

/// Intermediate row struct for database mapping.
struct MedicineRow {
    medicine_id: i64,
    generic_name: Option<String>,
    brand_name: Option<String>,
    dosage: Option<String>,
    manufacturer: Option<String>,
    pack_size: Option<String>,
    pack_type: Option<String>,
    schedule: Option<String>,
}

impl MedicineRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            medicine_id: row.get(0)?,
            generic_name: row.get(1)?,
            brand_name: row.get(2)?,
            dosage: row.get(3)?,
            manufacturer: row.get(4)?,
            pack_size: row.get(5)?,
            pack_type: row.get(6)?,
            schedule: row.get(7)?,
        })
    }
}

impl From<MedicineRow> for MedicineRecord {
    fn from(row: MedicineRow) -> Self {
        Self {
            id: row.medicine_id,
            generic_name: row.generic_name,
            brand_name: row.brand_name,
            dosage: row.dosage,
            manufacturer: row.manufacturer,
            pack_size: row.pack_size,
            pack_type: row.pack_type,
            schedule: row.schedule,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> Database {
        let db = Database::open_in_memory().unwrap();
        let records = vec![
            MedicineRecord::new(1, "Panadol")
                .with_generic("Paracetamol")
                .with_dosage("500mg"),
            MedicineRecord::new(2, "***").with_generic("Withdrawn"),
            MedicineRecord::new(3, "Amoxil")
                .with_generic("Amoxicillin")
                .with_dosage("250mg capsule"),
            MedicineRecord::new(4, "Calpol").with_dosage("120mg/5ml"),
        ];
        for record in &records {
            db.insert_medicine(record).unwrap();
        }
        let mut unbranded = MedicineRecord::new(5, "unused").with_generic("Metformin");
        unbranded.brand_name = None;
        db.insert_medicine(&unbranded).unwrap();
        db
    }

    #[test]
    fn test_list_filters_and_orders() {
        let db = test_db();
        db.insert_medicine(&MedicineRecord::new(6, "Zinc")).unwrap();
        db.insert_medicine(&MedicineRecord::new(7, "betadine")).unwrap();
        let records = db.list_medicines().unwrap();

        let brands: Vec<_> = records
            .iter()
            .map(|r| r.brand_name.as_deref().unwrap())
            .collect();
        // Lowercase brands sort among the others, not after every capitalized one
        assert_eq!(brands, vec!["Amoxil", "betadine", "Calpol", "Panadol", "Zinc"]);
        assert_eq!(db.count_medicines().unwrap(), 7);
    }

    #[test]
    fn test_get_medicine() {
        let db = test_db();

        let record = db.get_medicine(1).unwrap();
        assert_eq!(record.brand_name.as_deref(), Some("Panadol"));
        assert_eq!(record.generic_name.as_deref(), Some("Paracetamol"));
        assert_eq!(record.dosage.as_deref(), Some("500mg"));

        assert!(matches!(db.get_medicine(99), Err(DbError::NotFound(_))));
    }

    #[test]
    fn test_insert_replaces_by_id() {
        let db = test_db();
        db.insert_medicine(&MedicineRecord::new(1, "Panadol Extra"))
            .unwrap();

        let record = db.get_medicine(1).unwrap();
        assert_eq!(record.brand_name.as_deref(), Some("Panadol Extra"));
        assert_eq!(record.generic_name, None);
    }

    #[test]
    fn test_catalog_source() {
        use crate::db::CatalogSource;

        let db = test_db();
        assert_eq!(db.load_medicines().unwrap().len(), 3);
    }
}

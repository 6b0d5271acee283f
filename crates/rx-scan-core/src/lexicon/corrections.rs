//! OCR misread table for prescription shorthand.
//!
//! Maps common misreads of frequency codes (bd, tds, od, qds) and units (mg, ml, g, %)
//! to their canonical spelling.

use std::collections::HashMap;

use strsim::hamming;

/// Ordered correction table: misread → canonical token.
///
/// Definition order matters: the fuzzy lookup returns the first same-length key that is
/// at most one substitution away.
#[derive(Debug, Clone)]
pub struct CorrectionTable {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl Default for CorrectionTable {
    fn default() -> Self {
        Self::new()
    }
}

impl CorrectionTable {
    /// Create a table with the default prescription corrections.
    pub fn new() -> Self {
        Self::from_pairs(DEFAULT_CORRECTIONS.iter().copied())
    }

    /// Build a table from (misread, canonical) pairs in order.
    ///
    /// A repeated key keeps its first position and takes the later value.
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut table = Self {
            entries: Vec::new(),
            index: HashMap::new(),
        };
        for (misread, canonical) in pairs {
            table.insert(misread, canonical);
        }
        table
    }

    fn insert(&mut self, misread: &str, canonical: &str) {
        let key = misread.to_lowercase();
        match self.index.get(&key) {
            Some(&pos) => self.entries[pos].1 = canonical.to_string(),
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, canonical.to_string()));
            }
        }
    }

    /// Exact, case-insensitive lookup.
    pub fn get(&self, token: &str) -> Option<&str> {
        self.index
            .get(&token.to_lowercase())
            .map(|&pos| self.entries[pos].1.as_str())
    }

    /// First key (in table order) of the same length as `token` that differs from it in at
    /// most one position. Only substitutions count; lengths must be equal.
    pub fn fuzzy_get(&self, token: &str) -> Option<&str> {
        let token = token.to_lowercase();
        self.entries
            .iter()
            .find(|(key, _)| matches!(hamming(key, &token), Ok(d) if d <= 1))
            .map(|(_, canonical)| canonical.as_str())
    }

    /// Entries in definition order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

const DEFAULT_CORRECTIONS: &[(&str, &str)] = &[
    // Twice daily
    ("hd", "bd"),
    ("h.d", "bd"),
    ("h.d.", "bd"),
    ("had", "bd"),
    ("had.", "bd"),
    // Three times daily
    ("tod", "tds"),
    ("t.d", "tds"),
    ("ted", "tds"),
    ("tad", "tds"),
    ("tad.", "tds"),
    // Once daily
    ("qd", "od"),
    ("q.d", "od"),
    ("q.d.", "od"),
    ("ad", "od"),
    ("ad.", "od"),
    // Latin forms
    ("bid", "bd"),
    ("b.i.d", "bd"),
    ("b.i.d.", "bd"),
    ("qid", "qds"),
    ("q.i.d", "qds"),
    ("q.i.d.", "qds"),
    ("b.d", "bd"),
    ("b.d.", "bd"),
    ("t.d.s", "tds"),
    ("t.d.s.", "tds"),
    ("q.d.s", "qds"),
    ("q.d.s.", "qds"),
    ("o.d", "od"),
    ("o.d.", "od"),
    // Units
    ("my", "mg"),
    ("m9", "mg"),
    ("m.g", "mg"),
    ("mg.", "mg"),
    ("ma", "mg"),
    ("ml", "ml"),
    ("m1", "ml"),
    ("rnl", "ml"),
    ("m!", "ml"),
    ("g", "g"),
    ("9", "g"),
    ("gr", "g"),
    ("%", "%"),
    ("pc", "%"),
    ("p.c", "%"),
    // Handwriting misreads
    ("me", "mg"),
    ("chy", "tds"),
    ("diely", "daily"),
    ("nlm", "tds"),
    ("hal", "bd"),
    ("hal.", "bd"),
    ("be", "bd"),
];

//! Dosage-form abbreviations and synonyms.

use std::collections::HashMap;

/// Abbreviation → canonical dosage-form name (e.g., "syp" → "syrup").
#[derive(Debug, Clone)]
pub struct DosageFormTable {
    forms: HashMap<String, String>,
}

impl Default for DosageFormTable {
    fn default() -> Self {
        Self::new()
    }
}

impl DosageFormTable {
    /// Create a table with the default prescription abbreviations.
    pub fn new() -> Self {
        Self {
            forms: Self::default_forms(),
        }
    }

    /// Canonical form for an abbreviation (case-insensitive).
    pub fn canonical(&self, abbreviation: &str) -> Option<&str> {
        self.forms
            .get(&abbreviation.to_lowercase())
            .map(String::as_str)
    }

    /// Whether the token is a known dosage-form abbreviation.
    pub fn contains(&self, abbreviation: &str) -> bool {
        self.forms.contains_key(&abbreviation.to_lowercase())
    }

    /// Add a custom abbreviation.
    pub fn add_form(&mut self, abbreviation: &str, canonical: &str) {
        self.forms
            .insert(abbreviation.to_lowercase(), canonical.to_lowercase());
    }

    fn default_forms() -> HashMap<String, String> {
        let mut map = HashMap::new();

        // Liquids
        map.insert("syp".into(), "syrup".into());
        map.insert("syp.".into(), "syrup".into());
        map.insert("drop".into(), "drops".into());
        map.insert("drops".into(), "drops".into());
        map.insert("lotion".into(), "lotion".into());
        map.insert("spray".into(), "spray".into());

        // Topicals
        map.insert("cream".into(), "cream".into());
        map.insert("la".into(), "local application".into());
        map.insert("l.a".into(), "local application".into());
        map.insert("l.a.".into(), "local application".into());
        map.insert("oint".into(), "ointment".into());
        map.insert("oint.".into(), "ointment".into());
        map.insert("ointment".into(), "ointment".into());
        map.insert("gel".into(), "gel".into());

        // Solids
        map.insert("tab".into(), "tablet".into());
        map.insert("tab.".into(), "tablet".into());
        map.insert("tablet".into(), "tablet".into());
        map.insert("oral".into(), "tablet".into());
        map.insert("powder".into(), "powder".into());
        map.insert("sache".into(), "sache".into());

        // Parenteral
        map.insert("inj".into(), "injection".into());
        map.insert("inj.".into(), "injection".into());
        map.insert("injection".into(), "injection".into());

        map
    }
}

/// Canonical form name → spellings that also denote it in catalog text.
///
/// Order matters: the first group that applies wins.
pub const FORM_SYNONYMS: &[(&str, &[&str])] = &[
    ("tablet", &["tab", "tab.", "tablets", "tabs"]),
    ("capsule", &["cap", "cap.", "capsules", "caps"]),
    ("syrup", &["syp", "syp.", "syrups"]),
    ("injection", &["inj", "inj.", "injections", "injectable"]),
    ("cream", &["cr", "cr.", "creams"]),
    ("ointment", &["oint", "oint.", "ointments"]),
];

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One entry in the fixed medication catalog. All fields are non-empty
/// free text; records never change after the catalog is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicationRecord {
    pub name: String,
    pub generic_name: String,
    pub dosage: String,
    pub drug_class: String,
    pub description: String,
    pub side_effects: String,
    pub instructions: String,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog must contain at least one medication")]
    Empty,
    #[error("Medication '{name}' has an empty '{field}' field")]
    BlankField { name: String, field: &'static str },
    #[error("Duplicate catalog key '{0}'")]
    DuplicateKey(String),
}

/// Fixed, in-memory set of known medications keyed by lowercase name.
/// The key set is established at construction and never mutated.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<(String, MedicationRecord)>,
}

impl Catalog {
    /// Build a catalog, validating the non-empty-field invariant and
    /// rejecting empty or duplicate-keyed input. An empty catalog is a
    /// fatal configuration error for the recognizer, so it cannot be
    /// constructed at all.
    pub fn new(records: Vec<MedicationRecord>) -> Result<Self, CatalogError> {
        if records.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut entries: Vec<(String, MedicationRecord)> = Vec::with_capacity(records.len());
        for record in records {
            validate_fields(&record)?;
            let key = record.name.trim().to_lowercase();
            if entries.iter().any(|(k, _)| k == &key) {
                return Err(CatalogError::DuplicateKey(key));
            }
            entries.push((key, record));
        }

        Ok(Self { entries })
    }

    /// The default demo catalog: three common medications.
    pub fn builtin() -> Self {
        Self::new(builtin_records()).expect("builtin catalog is valid")
    }

    /// Look up a record by name (case-insensitive).
    pub fn get(&self, name: &str) -> Option<&MedicationRecord> {
        let key = name.trim().to_lowercase();
        self.entries
            .iter()
            .find(|(k, _)| k == &key)
            .map(|(_, record)| record)
    }

    /// Record at a given position, in construction order.
    pub fn at(&self, index: usize) -> &MedicationRecord {
        &self.entries[index].1
    }

    pub fn records(&self) -> impl Iterator<Item = &MedicationRecord> {
        self.entries.iter().map(|(_, record)| record)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn validate_fields(record: &MedicationRecord) -> Result<(), CatalogError> {
    let fields: [(&str, &'static str); 7] = [
        (&record.name, "name"),
        (&record.generic_name, "generic_name"),
        (&record.dosage, "dosage"),
        (&record.drug_class, "drug_class"),
        (&record.description, "description"),
        (&record.side_effects, "side_effects"),
        (&record.instructions, "instructions"),
    ];
    for (value, field) in fields {
        if value.trim().is_empty() {
            return Err(CatalogError::BlankField {
                name: record.name.clone(),
                field,
            });
        }
    }
    Ok(())
}

fn builtin_records() -> Vec<MedicationRecord> {
    vec![
        MedicationRecord {
            name: "Lisinopril".into(),
            generic_name: "Lisinopril".into(),
            dosage: "10mg".into(),
            drug_class: "ACE Inhibitor".into(),
            description: "Used to treat high blood pressure and heart failure.".into(),
            side_effects: "Dizziness, dry cough, headache".into(),
            instructions: "Take once daily at the same time each day, with or without food."
                .into(),
        },
        MedicationRecord {
            name: "Metformin".into(),
            generic_name: "Metformin Hydrochloride".into(),
            dosage: "500mg".into(),
            drug_class: "Biguanide".into(),
            description: "Helps control blood sugar levels in type 2 diabetes.".into(),
            side_effects: "Nausea, upset stomach, diarrhea".into(),
            instructions: "Take with meals to reduce stomach upset.".into(),
        },
        MedicationRecord {
            name: "Atorvastatin".into(),
            generic_name: "Atorvastatin Calcium".into(),
            dosage: "20mg".into(),
            drug_class: "Statin".into(),
            description: "Lowers cholesterol and reduces the risk of heart disease.".into(),
            side_effects: "Muscle pain, fatigue, digestive issues".into(),
            instructions: "Take once daily, preferably in the evening.".into(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str) -> MedicationRecord {
        MedicationRecord {
            name: name.into(),
            generic_name: format!("{name} generic"),
            dosage: "5mg".into(),
            drug_class: "Test class".into(),
            description: "Test description.".into(),
            side_effects: "None".into(),
            instructions: "Take as directed.".into(),
        }
    }

    #[test]
    fn builtin_has_three_entries() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn builtin_fields_are_non_empty() {
        for record in Catalog::builtin().records() {
            assert!(validate_fields(record).is_ok(), "blank field in {}", record.name);
        }
    }

    #[test]
    fn builtin_lisinopril_side_effects() {
        let catalog = Catalog::builtin();
        let lisinopril = catalog.get("lisinopril").unwrap();
        assert_eq!(lisinopril.side_effects, "Dizziness, dry cough, headache");
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let catalog = Catalog::builtin();
        assert!(catalog.get("METFORMIN").is_some());
        assert!(catalog.get("  Metformin ").is_some());
        assert!(catalog.get("aspirin").is_none());
    }

    #[test]
    fn empty_catalog_rejected() {
        let result = Catalog::new(vec![]);
        assert!(matches!(result, Err(CatalogError::Empty)));
    }

    #[test]
    fn blank_field_rejected() {
        let mut bad = record("Testine");
        bad.side_effects = "   ".into();
        let result = Catalog::new(vec![bad]);
        assert!(matches!(
            result,
            Err(CatalogError::BlankField { field: "side_effects", .. })
        ));
    }

    #[test]
    fn duplicate_key_rejected() {
        let result = Catalog::new(vec![record("Testine"), record("TESTINE")]);
        assert!(matches!(result, Err(CatalogError::DuplicateKey(_))));
    }

    #[test]
    fn at_follows_construction_order() {
        let catalog = Catalog::new(vec![record("First"), record("Second")]).unwrap();
        assert_eq!(catalog.at(0).name, "First");
        assert_eq!(catalog.at(1).name, "Second");
    }
}

//! Import household members from JSON
//!
//! Accepts either a bare array of people or an object with a `people` array.
//! Visit keys that are not known visit types are ignored, missing keys are 0.

use super::{Medication, Person, VisitCounts, VisitType};
use crate::error::ImportError;
use crate::lenient;
use serde_json::{Map, Value};
use std::path::Path;

/// One person record as it appears in an import file
struct RawPerson<'a> {
    position: usize,
    fields: &'a Map<String, Value>,
}

impl<'a> RawPerson<'a> {
    fn new(position: usize, value: &'a Value) -> Result<Self, ImportError> {
        let fields = value
            .as_object()
            .ok_or_else(|| ImportError::NotAnObject(format!("person {}", position + 1)))?;
        Ok(Self { position, fields })
    }

    fn to_person(&self) -> Result<Person, ImportError> {
        let name = lenient::text(self.fields.get("name"))
            .ok_or_else(|| ImportError::missing_field(format!("person {}", self.position + 1), "name"))?;

        let id = lenient::text(self.fields.get("id"))
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| format!("person-{}", self.position + 1));

        let visits = match self.fields.get("visits") {
            Some(Value::Object(map)) => visits_from_map(&name, map),
            _ => VisitCounts::default(),
        };

        let medications = match self.fields.get("medications") {
            Some(Value::Array(items)) => items
                .iter()
                .enumerate()
                .filter_map(|(i, item)| medication_from_value(&id, i, item))
                .collect(),
            _ => Vec::new(),
        };

        Ok(Person { id, name, visits, medications })
    }
}

fn visits_from_map(person: &str, map: &Map<String, Value>) -> VisitCounts {
    let mut visits = VisitCounts::default();
    for (key, value) in map {
        match VisitType::from_key(key) {
            Some(visit_type) => {
                if lenient::is_malformed_number(Some(value)) {
                    log::warn!("{}: non-numeric {} visit count treated as 0", person, key);
                }
                visits.set(visit_type, lenient::count(Some(value)));
            }
            None => log::debug!("{}: ignoring unknown visit type '{}'", person, key),
        }
    }
    visits
}

fn medication_from_value(person_id: &str, position: usize, value: &Value) -> Option<Medication> {
    let Some(fields) = value.as_object() else {
        log::warn!("{}: skipping medication {} (not an object)", person_id, position + 1);
        return None;
    };

    let name = lenient::text(fields.get("name")).unwrap_or_default();
    let id = lenient::text(fields.get("id"))
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| format!("{}-med-{}", person_id, position + 1));

    let tier = match fields.get("tier") {
        Some(v) => lenient::count(Some(v)).clamp(1, 5) as u8,
        None => 1,
    };

    let refills_per_year = match fields.get("refillsPerYear") {
        Some(Value::Null) | None => 12,
        Some(v) => lenient::count(Some(v)),
    };

    let custom_cost = lenient::positive_amount(fields.get("customCost"));

    Some(Medication {
        id,
        name,
        tier,
        refills_per_year,
        custom_cost,
    })
}

/// Build people from an already parsed JSON document
pub fn people_from_value(document: &Value) -> Result<Vec<Person>, ImportError> {
    let records = match document {
        Value::Array(items) => items,
        Value::Object(map) => match map.get("people") {
            Some(Value::Array(items)) => items,
            _ => return Err(ImportError::missing_field("people import", "people")),
        },
        _ => return Err(ImportError::NotAnObject("people import".to_string())),
    };

    records
        .iter()
        .enumerate()
        .map(|(i, record)| RawPerson::new(i, record)?.to_person())
        .collect()
}

/// Import people from a JSON string
pub fn import_people_json(json: &str) -> Result<Vec<Person>, ImportError> {
    let document: Value = serde_json::from_str(json)?;
    people_from_value(&document)
}

/// Load people from a JSON file
pub fn load_people<P: AsRef<Path>>(path: P) -> Result<Vec<Person>, ImportError> {
    let contents = std::fs::read_to_string(path)?;
    import_people_json(&contents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_defaults_and_unknown_keys() {
        let people = import_people_json(
            r#"[{"name": "Alex", "visits": {"primaryCare": 4, "chiropractic": 7, "imaging": "2"}}]"#,
        )
        .unwrap();

        assert_eq!(people.len(), 1);
        let alex = &people[0];
        assert_eq!(alex.id, "person-1");
        assert_eq!(alex.visits.get(VisitType::PrimaryCare), 4);
        assert_eq!(alex.visits.get(VisitType::Imaging), 2);
        assert_eq!(alex.visits.get(VisitType::EmergencyRoom), 0);
        assert!(alex.medications.is_empty());
    }

    #[test]
    fn test_import_medications() {
        let people = import_people_json(
            r#"{"people": [{"id": "p1", "name": "Sam", "medications": [
                {"name": "Insulin", "tier": 3},
                {"name": "Compounded", "tier": 9, "refillsPerYear": 6, "customCost": 60},
                {"name": "Blank cost", "customCost": ""}
            ]}]}"#,
        )
        .unwrap();

        let meds = &people[0].medications;
        assert_eq!(meds.len(), 3);
        assert_eq!(meds[0].refills_per_year, 12);
        assert_eq!(meds[0].id, "p1-med-1");
        assert_eq!(meds[1].tier, 5);
        assert_eq!(meds[1].custom_cost, Some(60.0));
        assert_eq!(meds[2].custom_cost, None);
    }

    #[test]
    fn test_missing_name_is_rejected() {
        let err = import_people_json(r#"[{"visits": {}}]"#).unwrap_err();
        assert!(matches!(err, ImportError::MissingField { .. }));
        assert!(err.to_string().contains("name"));
    }

    #[test]
    fn test_invalid_json_is_rejected() {
        let err = import_people_json("[{").unwrap_err();
        assert!(matches!(err, ImportError::Json(_)));
    }

    #[test]
    fn test_load_sample_household() {
        let people = load_people("data/sample_household.json").expect("Failed to load sample household");
        assert!(!people.is_empty());
    }
}

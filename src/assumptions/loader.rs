//! CSV-based cost assumption loader
//!
//! Loads user overrides of the assumed per-service costs from a two-column
//! `service,cost` file. Services missing from the file keep their defaults.

use super::CostSettings;
use crate::error::ImportError;
use crate::household::VisitType;
use std::path::Path;

/// Default path to the cost assumptions file
pub const DEFAULT_COST_SETTINGS_PATH: &str = "data/cost_assumptions.csv";

#[derive(Debug, serde::Deserialize)]
struct CostRow {
    service: String,
    cost: f64,
}

/// Load cost settings from any CSV reader
pub fn load_cost_settings_from_reader<R: std::io::Read>(reader: R) -> Result<CostSettings, ImportError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut settings = CostSettings::default();

    for result in csv_reader.deserialize() {
        let row: CostRow = result?;
        let service = row.service.trim();
        let applied = VisitType::from_key(service)
            .map(|visit_type| settings.set(visit_type, row.cost))
            .unwrap_or(false);
        if !applied {
            return Err(ImportError::UnknownService(service.to_string()));
        }
    }

    Ok(settings)
}

/// Load cost settings from a CSV file
pub fn load_cost_settings<P: AsRef<Path>>(path: P) -> Result<CostSettings, ImportError> {
    let file = std::fs::File::open(path)?;
    load_cost_settings_from_reader(file)
}

/// Load cost settings from the default location
pub fn load_default_cost_settings() -> Result<CostSettings, ImportError> {
    load_cost_settings(DEFAULT_COST_SETTINGS_PATH)
}

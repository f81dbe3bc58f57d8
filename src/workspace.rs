//! JSON export/import of everything a user has authored
//!
//! The envelope is opaque to the estimator; callers choose where it lives.

use crate::assumptions::CostSettings;
use crate::error::ImportError;
use crate::household::Person;
use crate::plan::Plan;
use crate::scenario::Scenarios;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// People, plans, cost assumptions and scenarios saved together
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Workspace {
    pub people: Vec<Person>,
    pub plans: Vec<Plan>,
    pub cost_settings: CostSettings,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scenarios: Option<Scenarios>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exported_at: Option<DateTime<Utc>>,
}

impl Workspace {
    pub fn new(people: Vec<Person>, plans: Vec<Plan>, cost_settings: CostSettings) -> Self {
        Self {
            people,
            plans,
            cost_settings,
            scenarios: None,
            exported_at: None,
        }
    }

    /// Replace the scenarios with ones derived from the current people
    pub fn refresh_scenarios(&mut self) -> &Scenarios {
        self.scenarios.insert(Scenarios::derive(&self.people))
    }

    /// Serialize, stamping the export time
    pub fn to_json(&self) -> Result<String, ImportError> {
        let stamped = Workspace {
            exported_at: Some(Utc::now()),
            ..self.clone()
        };
        Ok(serde_json::to_string_pretty(&stamped)?)
    }

    pub fn from_json(json: &str) -> Result<Self, ImportError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ImportError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ImportError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }
}

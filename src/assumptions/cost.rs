//! Assumed dollar cost per occurrence for services billed against the deductible

use crate::household::VisitType;
use crate::lenient;
use serde::{Deserialize, Deserializer, Serialize};

/// Read a cost the way imports do: malformed is 0, negative is 0
fn non_negative_cost<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(lenient::amount(Some(&value)).max(0.0))
}

/// Cost assumption table
///
/// Only services that are billed through the deductible/coinsurance path carry
/// an assumed cost; copay-only visits never need one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CostSettings {
    #[serde(deserialize_with = "non_negative_cost")]
    pub emergency_room: f64,
    #[serde(deserialize_with = "non_negative_cost")]
    pub diagnostic_test: f64,
    #[serde(deserialize_with = "non_negative_cost")]
    pub imaging: f64,
    #[serde(deserialize_with = "non_negative_cost")]
    pub rehabilitation_outpatient: f64,
    #[serde(deserialize_with = "non_negative_cost")]
    pub habilitation_outpatient: f64,
}

impl Default for CostSettings {
    fn default() -> Self {
        Self {
            emergency_room: 2200.0,
            diagnostic_test: 300.0,
            imaging: 1000.0,
            rehabilitation_outpatient: 150.0,
            habilitation_outpatient: 150.0,
        }
    }
}

impl CostSettings {
    /// Assumed cost of one occurrence, `None` for copay-only visit types
    pub fn cost_for(&self, visit_type: VisitType) -> Option<f64> {
        match visit_type {
            VisitType::EmergencyRoom => Some(self.emergency_room),
            VisitType::DiagnosticTest => Some(self.diagnostic_test),
            VisitType::Imaging => Some(self.imaging),
            VisitType::RehabilitationOutpatient => Some(self.rehabilitation_outpatient),
            VisitType::HabilitationOutpatient => Some(self.habilitation_outpatient),
            VisitType::PrimaryCare
            | VisitType::Specialist
            | VisitType::UrgentCare
            | VisitType::MentalHealth => None,
        }
    }

    /// Override one assumed cost; returns false for copay-only visit types
    pub fn set(&mut self, visit_type: VisitType, cost: f64) -> bool {
        let slot = match visit_type {
            VisitType::EmergencyRoom => &mut self.emergency_room,
            VisitType::DiagnosticTest => &mut self.diagnostic_test,
            VisitType::Imaging => &mut self.imaging,
            VisitType::RehabilitationOutpatient => &mut self.rehabilitation_outpatient,
            VisitType::HabilitationOutpatient => &mut self.habilitation_outpatient,
            _ => return false,
        };
        *slot = cost.max(0.0);
        true
    }

    pub fn with_cost(mut self, visit_type: VisitType, cost: f64) -> Self {
        self.set(visit_type, cost);
        self
    }

    /// (visit type, assumed cost) pairs in processing order
    pub fn entries(&self) -> Vec<(VisitType, f64)> {
        VisitType::ALL
            .iter()
            .filter_map(|&t| self.cost_for(t).map(|c| (t, c)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cost_for_exempt_types() {
        let settings = CostSettings::default();
        assert_eq!(settings.cost_for(VisitType::PrimaryCare), None);
        assert_eq!(settings.cost_for(VisitType::EmergencyRoom), Some(2200.0));
        assert_eq!(settings.entries().len(), 5);
    }

    #[test]
    fn test_override() {
        let mut settings = CostSettings::default().with_cost(VisitType::EmergencyRoom, 1500.0);
        assert_eq!(settings.emergency_room, 1500.0);
        assert!(!settings.set(VisitType::Specialist, 99.0));
        assert!(settings.set(VisitType::Imaging, -5.0));
        assert_eq!(settings.imaging, 0.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings: CostSettings = serde_json::from_str(r#"{"imaging": 750}"#).unwrap();
        assert_eq!(settings.imaging, 750.0);
        assert_eq!(settings.diagnostic_test, 300.0);
    }

    #[test]
    fn test_json_costs_read_leniently() {
        let settings: CostSettings = serde_json::from_str(
            r#"{"emergencyRoom": "", "imaging": -1500, "diagnosticTest": "450", "rehabilitationOutpatient": null}"#,
        )
        .unwrap();

        assert_eq!(settings.emergency_room, 0.0);
        assert_eq!(settings.imaging, 0.0);
        assert_eq!(settings.diagnostic_test, 450.0);
        assert_eq!(settings.rehabilitation_outpatient, 0.0);
        assert_eq!(settings.habilitation_outpatient, 150.0);
    }
}

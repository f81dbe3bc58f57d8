//! Household member data structures: people, visit counts and medications

use serde::{Deserialize, Serialize};

/// Default refills per year for a maintenance prescription
fn default_refills_per_year() -> u32 {
    12
}

/// Default formulary tier
fn default_tier() -> u8 {
    1
}

/// Kind of medical visit a person expects to use during the plan year
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VisitType {
    PrimaryCare,
    Specialist,
    UrgentCare,
    EmergencyRoom,
    MentalHealth,
    DiagnosticTest,
    Imaging,
    RehabilitationOutpatient,
    HabilitationOutpatient,
}

impl VisitType {
    /// Every visit type, in charge-processing order
    pub const ALL: [VisitType; 9] = [
        VisitType::PrimaryCare,
        VisitType::Specialist,
        VisitType::UrgentCare,
        VisitType::EmergencyRoom,
        VisitType::MentalHealth,
        VisitType::DiagnosticTest,
        VisitType::Imaging,
        VisitType::RehabilitationOutpatient,
        VisitType::HabilitationOutpatient,
    ];

    /// Key used in plan, people and cost-assumption files
    pub fn as_key(&self) -> &'static str {
        match self {
            VisitType::PrimaryCare => "primaryCare",
            VisitType::Specialist => "specialist",
            VisitType::UrgentCare => "urgentCare",
            VisitType::EmergencyRoom => "emergencyRoom",
            VisitType::MentalHealth => "mentalHealth",
            VisitType::DiagnosticTest => "diagnosticTest",
            VisitType::Imaging => "imaging",
            VisitType::RehabilitationOutpatient => "rehabilitationOutpatient",
            VisitType::HabilitationOutpatient => "habilitationOutpatient",
        }
    }

    /// Parse a file key back into a visit type
    pub fn from_key(key: &str) -> Option<Self> {
        VisitType::ALL.iter().copied().find(|t| t.as_key() == key)
    }

    /// Human readable label for breakdown rows
    pub fn label(&self) -> &'static str {
        match self {
            VisitType::PrimaryCare => "Primary Care",
            VisitType::Specialist => "Specialist",
            VisitType::UrgentCare => "Urgent Care",
            VisitType::EmergencyRoom => "Emergency Room",
            VisitType::MentalHealth => "Mental Health",
            VisitType::DiagnosticTest => "Diagnostic Test",
            VisitType::Imaging => "Imaging",
            VisitType::RehabilitationOutpatient => "Rehabilitation (Outpatient)",
            VisitType::HabilitationOutpatient => "Habilitation (Outpatient)",
        }
    }

    /// Visits always paid by flat copay, never touching the deductible
    pub fn is_copay_exempt(&self) -> bool {
        matches!(
            self,
            VisitType::PrimaryCare
                | VisitType::Specialist
                | VisitType::UrgentCare
                | VisitType::MentalHealth
        )
    }
}

/// Expected visit counts for one person, one field per visit type
///
/// Missing keys deserialize to 0 and unknown keys are ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VisitCounts {
    pub primary_care: u32,
    pub specialist: u32,
    pub urgent_care: u32,
    pub emergency_room: u32,
    pub mental_health: u32,
    pub diagnostic_test: u32,
    pub imaging: u32,
    pub rehabilitation_outpatient: u32,
    pub habilitation_outpatient: u32,
}

impl VisitCounts {
    /// Count for a visit type
    pub fn get(&self, visit_type: VisitType) -> u32 {
        match visit_type {
            VisitType::PrimaryCare => self.primary_care,
            VisitType::Specialist => self.specialist,
            VisitType::UrgentCare => self.urgent_care,
            VisitType::EmergencyRoom => self.emergency_room,
            VisitType::MentalHealth => self.mental_health,
            VisitType::DiagnosticTest => self.diagnostic_test,
            VisitType::Imaging => self.imaging,
            VisitType::RehabilitationOutpatient => self.rehabilitation_outpatient,
            VisitType::HabilitationOutpatient => self.habilitation_outpatient,
        }
    }

    /// Mutable slot for a visit type
    pub fn get_mut(&mut self, visit_type: VisitType) -> &mut u32 {
        match visit_type {
            VisitType::PrimaryCare => &mut self.primary_care,
            VisitType::Specialist => &mut self.specialist,
            VisitType::UrgentCare => &mut self.urgent_care,
            VisitType::EmergencyRoom => &mut self.emergency_room,
            VisitType::MentalHealth => &mut self.mental_health,
            VisitType::DiagnosticTest => &mut self.diagnostic_test,
            VisitType::Imaging => &mut self.imaging,
            VisitType::RehabilitationOutpatient => &mut self.rehabilitation_outpatient,
            VisitType::HabilitationOutpatient => &mut self.habilitation_outpatient,
        }
    }

    pub fn set(&mut self, visit_type: VisitType, count: u32) {
        *self.get_mut(visit_type) = count;
    }

    /// Iterate (type, count) pairs in processing order
    pub fn iter(&self) -> impl Iterator<Item = (VisitType, u32)> + '_ {
        VisitType::ALL.iter().map(move |&t| (t, self.get(t)))
    }

    /// Build a new set of counts by transforming each entry
    pub fn map<F>(&self, mut f: F) -> Self
    where
        F: FnMut(VisitType, u32) -> u32,
    {
        let mut out = VisitCounts::default();
        for (visit_type, count) in self.iter() {
            out.set(visit_type, f(visit_type, count));
        }
        out
    }

    pub fn total(&self) -> u32 {
        self.iter().map(|(_, c)| c).sum()
    }
}

/// A prescription a person expects to refill during the plan year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Medication {
    #[serde(default)]
    pub id: String,

    pub name: String,

    /// Formulary tier, 1 (cheapest) through 5
    #[serde(default = "default_tier")]
    pub tier: u8,

    #[serde(default = "default_refills_per_year")]
    pub refills_per_year: u32,

    /// Per-refill cost that overrides tier pricing entirely
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_cost: Option<f64>,
}

impl Medication {
    /// Create a tier-priced medication with twelve refills
    pub fn new(id: impl Into<String>, name: impl Into<String>, tier: u8) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            tier: tier.clamp(1, 5),
            refills_per_year: default_refills_per_year(),
            custom_cost: None,
        }
    }

    pub fn with_refills(mut self, refills_per_year: u32) -> Self {
        self.refills_per_year = refills_per_year;
        self
    }

    pub fn with_custom_cost(mut self, cost: f64) -> Self {
        self.custom_cost = Some(cost);
        self
    }

    /// Custom per-refill cost, if one is set and usable
    ///
    /// Zero, negative and non-finite values fall back to tier pricing.
    pub fn custom_cost_per_refill(&self) -> Option<f64> {
        self.custom_cost.filter(|c| c.is_finite() && *c > 0.0)
    }
}

/// A household member and their expected utilization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    #[serde(default)]
    pub id: String,

    pub name: String,

    #[serde(default)]
    pub visits: VisitCounts,

    #[serde(default)]
    pub medications: Vec<Medication>,
}

impl Person {
    /// Create a person with no expected visits or medications
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            visits: VisitCounts::default(),
            medications: Vec::new(),
        }
    }

    pub fn with_visits(mut self, visit_type: VisitType, count: u32) -> Self {
        self.visits.set(visit_type, count);
        self
    }

    pub fn with_medication(mut self, medication: Medication) -> Self {
        self.medications.push(medication);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visit_type_keys_round_trip() {
        for visit_type in VisitType::ALL {
            assert_eq!(VisitType::from_key(visit_type.as_key()), Some(visit_type));
        }
        assert_eq!(VisitType::from_key("dental"), None);
    }

    #[test]
    fn test_copay_exempt_types() {
        let exempt: Vec<_> = VisitType::ALL.iter().filter(|t| t.is_copay_exempt()).collect();
        assert_eq!(exempt.len(), 4);
        assert!(!VisitType::EmergencyRoom.is_copay_exempt());
        assert!(VisitType::MentalHealth.is_copay_exempt());
    }

    #[test]
    fn test_visit_counts_defaults_missing_keys() {
        let counts: VisitCounts = serde_json::from_str(r#"{"primaryCare": 3, "dental": 9}"#).unwrap();
        assert_eq!(counts.get(VisitType::PrimaryCare), 3);
        assert_eq!(counts.get(VisitType::Imaging), 0);
        assert_eq!(counts.total(), 3);
    }

    #[test]
    fn test_visit_counts_map() {
        let counts = VisitCounts::default()
            .map(|t, _| if t == VisitType::Specialist { 2 } else { 0 });
        assert_eq!(counts.specialist, 2);
        assert_eq!(counts.total(), 2);
    }

    #[test]
    fn test_custom_cost_filtering() {
        let med = Medication::new("m1", "Generic", 1);
        assert_eq!(med.custom_cost_per_refill(), None);
        assert_eq!(med.clone().with_custom_cost(60.0).custom_cost_per_refill(), Some(60.0));
        assert_eq!(med.with_custom_cost(0.0).custom_cost_per_refill(), None);
    }

    #[test]
    fn test_medication_defaults() {
        let med: Medication = serde_json::from_str(r#"{"name": "Statin"}"#).unwrap();
        assert_eq!(med.tier, 1);
        assert_eq!(med.refills_per_year, 12);
        assert!(med.custom_cost.is_none());
    }
}

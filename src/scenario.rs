//! Utilization scenarios and batch estimates across them
//!
//! "Best case" and "worst case" households are derived from the "most likely"
//! baseline with fixed per-visit-type adjustments. Deriving is pure: each call
//! replaces the previous derived scenario wholesale.

use crate::assumptions::{load_cost_settings, CostSettings};
use crate::error::ImportError;
use crate::estimate::{CostSummary, EstimateConfig, EstimateEngine, FullBreakdown};
use crate::household::{Person, VisitType};
use crate::plan::Plan;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Which utilization profile a household represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScenarioKind {
    MostLikely,
    BestCase,
    WorstCase,
}

impl ScenarioKind {
    pub const ALL: [ScenarioKind; 3] = [
        ScenarioKind::MostLikely,
        ScenarioKind::BestCase,
        ScenarioKind::WorstCase,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ScenarioKind::MostLikely => "Most Likely",
            ScenarioKind::BestCase => "Best Case",
            ScenarioKind::WorstCase => "Worst Case",
        }
    }

    /// Suffix appended to names in derived scenarios
    pub fn name_suffix(&self) -> Option<&'static str> {
        match self {
            ScenarioKind::MostLikely => None,
            ScenarioKind::BestCase => Some(" (Best Case)"),
            ScenarioKind::WorstCase => Some(" (Worst Case)"),
        }
    }
}

/// Best-case multiplier applied to a baseline visit count (result floored)
pub fn best_case_factor(visit_type: VisitType) -> f64 {
    match visit_type {
        VisitType::PrimaryCare => 0.5,
        VisitType::Specialist => 0.3,
        VisitType::UrgentCare => 0.2,
        VisitType::EmergencyRoom => 0.0,
        VisitType::MentalHealth => 0.7,
        VisitType::DiagnosticTest => 0.5,
        VisitType::Imaging => 0.3,
        VisitType::RehabilitationOutpatient => 0.5,
        VisitType::HabilitationOutpatient => 0.5,
    }
}

/// Worst-case visits added to a baseline visit count
pub fn worst_case_delta(visit_type: VisitType) -> u32 {
    match visit_type {
        VisitType::PrimaryCare => 2,
        VisitType::Specialist => 3,
        VisitType::UrgentCare => 1,
        VisitType::EmergencyRoom => 1,
        VisitType::MentalHealth => 2,
        VisitType::DiagnosticTest => 2,
        VisitType::Imaging => 1,
        VisitType::RehabilitationOutpatient => 4,
        VisitType::HabilitationOutpatient => 2,
    }
}

/// Strip any scenario suffixes from a name
pub fn base_name(name: &str) -> &str {
    let mut name = name;
    loop {
        let stripped = ScenarioKind::ALL
            .iter()
            .filter_map(|k| k.name_suffix())
            .find_map(|suffix| name.strip_suffix(suffix));
        match stripped {
            Some(rest) => name = rest,
            None => return name,
        }
    }
}

/// Name as it should appear in a scenario, never doubling the suffix
pub fn scenario_name(name: &str, kind: ScenarioKind) -> String {
    match kind.name_suffix() {
        Some(suffix) => format!("{}{}", base_name(name), suffix),
        None => name.to_string(),
    }
}

fn derive_people<F>(baseline: &[Person], kind: ScenarioKind, adjust: F) -> Vec<Person>
where
    F: Fn(VisitType, u32) -> u32,
{
    baseline
        .iter()
        .map(|person| Person {
            id: person.id.clone(),
            name: scenario_name(&person.name, kind),
            visits: person.visits.map(&adjust),
            medications: person.medications.clone(),
        })
        .collect()
}

/// Lower-utilization household derived from the baseline
pub fn best_case(baseline: &[Person]) -> Vec<Person> {
    derive_people(baseline, ScenarioKind::BestCase, |visit_type, count| {
        (count as f64 * best_case_factor(visit_type)).floor().max(0.0) as u32
    })
}

/// Higher-utilization household derived from the baseline
pub fn worst_case(baseline: &[Person]) -> Vec<Person> {
    derive_people(baseline, ScenarioKind::WorstCase, |visit_type, count| {
        count.saturating_add(worst_case_delta(visit_type))
    })
}

/// The three households compared for every plan
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Scenarios {
    pub most_likely: Vec<Person>,
    pub best_case: Vec<Person>,
    pub worst_case: Vec<Person>,
}

impl Scenarios {
    /// Derive best and worst case from a most-likely baseline
    pub fn derive(baseline: &[Person]) -> Self {
        Self {
            most_likely: baseline.to_vec(),
            best_case: best_case(baseline),
            worst_case: worst_case(baseline),
        }
    }

    pub fn get(&self, kind: ScenarioKind) -> &[Person] {
        match kind {
            ScenarioKind::MostLikely => &self.most_likely,
            ScenarioKind::BestCase => &self.best_case,
            ScenarioKind::WorstCase => &self.worst_case,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (ScenarioKind, &[Person])> + '_ {
        ScenarioKind::ALL.iter().map(move |&k| (k, self.get(k)))
    }
}

/// One plan's summary under each scenario
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioSummaries {
    pub most_likely: CostSummary,
    pub best_case: CostSummary,
    pub worst_case: CostSummary,
}

impl ScenarioSummaries {
    pub fn get(&self, kind: ScenarioKind) -> &CostSummary {
        match kind {
            ScenarioKind::MostLikely => &self.most_likely,
            ScenarioKind::BestCase => &self.best_case,
            ScenarioKind::WorstCase => &self.worst_case,
        }
    }
}

/// Scenario summaries tagged with the plan they belong to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanScenarioEstimate {
    pub plan_name: String,
    pub summaries: ScenarioSummaries,
}

/// Estimate runner with the cost assumptions loaded once
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new();
/// let scenarios = Scenarios::derive(&people);
/// for estimate in runner.compare_plans(&plans, &scenarios) {
///     println!("{}: {:.2}", estimate.plan_name, estimate.summaries.most_likely.total);
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    engine: EstimateEngine,
    cost_settings: CostSettings,
}

impl ScenarioRunner {
    /// Runner with default engine configuration and cost assumptions
    pub fn new() -> Self {
        Self::default()
    }

    /// Runner with cost assumptions loaded from a CSV file
    pub fn from_csv_path(path: &std::path::Path) -> Result<Self, ImportError> {
        Ok(Self {
            engine: EstimateEngine::default(),
            cost_settings: load_cost_settings(path)?,
        })
    }

    pub fn with_cost_settings(mut self, cost_settings: CostSettings) -> Self {
        self.cost_settings = cost_settings;
        self
    }

    pub fn with_config(mut self, config: EstimateConfig) -> Self {
        self.engine = EstimateEngine::new(config);
        self
    }

    pub fn cost_settings(&self) -> &CostSettings {
        &self.cost_settings
    }

    /// Summary for one plan and household
    pub fn run(&self, plan: &Plan, people: &[Person]) -> CostSummary {
        self.engine.estimate_summary(plan, people, Some(&self.cost_settings))
    }

    /// Detailed breakdown for one plan and household
    pub fn run_detailed(&self, plan: &Plan, people: &[Person]) -> FullBreakdown {
        self.engine.estimate_detailed(plan, people, Some(&self.cost_settings))
    }

    /// Summaries for one plan under all three scenarios
    pub fn run_scenarios(&self, plan: &Plan, scenarios: &Scenarios) -> ScenarioSummaries {
        ScenarioSummaries {
            most_likely: self.run(plan, &scenarios.most_likely),
            best_case: self.run(plan, &scenarios.best_case),
            worst_case: self.run(plan, &scenarios.worst_case),
        }
    }

    /// Scenario summaries for many plans, evaluated in parallel, in input order
    pub fn compare_plans(&self, plans: &[Plan], scenarios: &Scenarios) -> Vec<PlanScenarioEstimate> {
        plans
            .par_iter()
            .map(|plan| PlanScenarioEstimate {
                plan_name: plan.name.clone(),
                summaries: self.run_scenarios(plan, scenarios),
            })
            .collect()
    }
}

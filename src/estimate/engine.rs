//! Estimation engine: annual premium plus capped household out-of-pocket spend

use super::accumulator::{apply_deductible, CoinsuranceMode, DeductibleLimits};
use super::breakdown::{
    CoinsuranceBreakdown, CostSummary, DeductibleBreakdown, FullBreakdown, OopBreakdown,
    PersonBreakdown, PremiumBreakdown,
};
use super::classifier::classify_person;
use super::moop::{cap_family, cap_individual};
use super::state::HouseholdTotals;
use crate::assumptions::CostSettings;
use crate::household::Person;
use crate::plan::Plan;
use serde::{Deserialize, Serialize};

/// Assumed cost of one refill for coinsurance-priced formulary tiers
pub const DEFAULT_RX_REFILL_COST: f64 = 100.0;

/// Configuration for an estimate run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EstimateConfig {
    /// How leftover charges are coinsured after the deductible
    pub coinsurance_mode: CoinsuranceMode,

    /// Per-refill drug cost used when a tier is priced by coinsurance
    pub assumed_rx_refill_cost: f64,
}

impl Default for EstimateConfig {
    fn default() -> Self {
        Self {
            coinsurance_mode: CoinsuranceMode::PerCharge,
            assumed_rx_refill_cost: DEFAULT_RX_REFILL_COST,
        }
    }
}

/// Main estimation engine
///
/// Stateless apart from its configuration: every call is a pure function of
/// (plan, people, cost settings). People are processed in list order, which
/// decides who uses up the family deductible first.
#[derive(Debug, Clone, Default)]
pub struct EstimateEngine {
    config: EstimateConfig,
}

impl EstimateEngine {
    pub fn new(config: EstimateConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EstimateConfig {
        &self.config
    }

    /// Summary figures for comparison cards
    pub fn estimate_summary(
        &self,
        plan: &Plan,
        people: &[Person],
        cost_settings: Option<&CostSettings>,
    ) -> CostSummary {
        self.estimate_detailed(plan, people, cost_settings).summary()
    }

    /// Fully itemized estimate for the drill-down view
    pub fn estimate_detailed(
        &self,
        plan: &Plan,
        people: &[Person],
        cost_settings: Option<&CostSettings>,
    ) -> FullBreakdown {
        let settings = cost_settings.copied().unwrap_or_default();
        let household_size = people.len();
        let deductible_limits = DeductibleLimits::for_household(&plan.medical_deductible, household_size);
        let individual_moop = plan.out_of_pocket_max.person;

        let (person_breakdowns, totals) = people.iter().fold(
            (Vec::with_capacity(household_size), HouseholdTotals::default()),
            |(mut rows, totals), person| {
                let row = self.estimate_person(
                    plan,
                    person,
                    &settings,
                    deductible_limits,
                    individual_moop,
                    totals.family_deductible_paid,
                );
                let next = totals.record(row.deductible_paid, row.total_oop, row.note.is_some());
                rows.push(row);
                (rows, next)
            },
        );

        let final_family_oop = cap_family(totals.family_oop_paid, plan.out_of_pocket_max.family);

        let family_deductible_paid = match deductible_limits.family {
            Some(limit) => totals.family_deductible_paid.min(limit),
            None => totals.family_deductible_paid,
        };

        let premium_breakdown = PremiumBreakdown {
            monthly_premium: plan.monthly_premium,
            annual_premium: plan.annual_premium(),
        };

        let coinsurance_breakdown = CoinsuranceBreakdown {
            mode: self.config.coinsurance_mode,
            charges_after_deductible: person_breakdowns.iter().map(|p| p.charges_after_deductible).sum(),
            coinsurance_paid: person_breakdowns.iter().map(|p| p.coinsurance_paid).sum(),
        };

        let grand_total = premium_breakdown.annual_premium + final_family_oop;

        log::debug!(
            "{}: {} people, household OOP {:.2} (capped {:.2}), total {:.2}",
            plan.name,
            household_size,
            totals.family_oop_paid,
            final_family_oop,
            grand_total
        );

        FullBreakdown {
            plan_name: plan.name.clone(),
            premium_breakdown,
            person_breakdowns,
            deductible_breakdown: DeductibleBreakdown {
                individual_limit: plan.medical_deductible.person,
                family_limit: plan.medical_deductible.family,
                applies_family_limit: deductible_limits.family.is_some(),
                family_paid: family_deductible_paid,
            },
            coinsurance_breakdown,
            oop_breakdown: OopBreakdown {
                individual_limit: individual_moop,
                family_limit: plan.out_of_pocket_max.family,
                household_oop_before_cap: totals.family_oop_paid,
                final_family_oop,
                individual_moop_hits: totals.individual_moop_hits,
                family_moop_hit: final_family_oop < totals.family_oop_paid,
            },
            grand_total,
        }
    }

    /// Charges, deductible, coinsurance and individual cap for one person
    fn estimate_person(
        &self,
        plan: &Plan,
        person: &Person,
        settings: &CostSettings,
        deductible_limits: DeductibleLimits,
        individual_moop: f64,
        family_deductible_paid: f64,
    ) -> PersonBreakdown {
        let charges = classify_person(person, plan, settings, self.config.assumed_rx_refill_cost);
        let outcome = apply_deductible(
            &charges,
            deductible_limits,
            family_deductible_paid,
            self.config.coinsurance_mode,
        );
        let (total_oop, note) = cap_individual(outcome.total_oop, individual_moop);

        log::debug!(
            "{}: exempt {:.2}, deductible {:.2}, coinsurance {:.2}, oop {:.2}{}",
            person.name,
            charges.exempt_total(),
            outcome.deductible_paid,
            outcome.coinsurance_paid,
            total_oop,
            note.as_deref().map(|n| format!(" ({})", n)).unwrap_or_default()
        );

        PersonBreakdown {
            person_id: person.id.clone(),
            name: person.name.clone(),
            exempt_total: charges.exempt_total(),
            deductible_applicable_total: charges.deductible_applicable_total(),
            coinsurance_rate: charges.detected_rate,
            exempt: charges.exempt,
            deductible_applicable: charges.deductible_applicable,
            deductible_paid: outcome.deductible_paid,
            charges_after_deductible: outcome.charges_after_deductible,
            coinsurance_paid: outcome.coinsurance_paid,
            total_before_cap: outcome.total_oop,
            total_oop,
            note,
        }
    }
}

/// Summary estimate with the default engine configuration
pub fn estimate_summary(plan: &Plan, people: &[Person], cost_settings: Option<&CostSettings>) -> CostSummary {
    EstimateEngine::default().estimate_summary(plan, people, cost_settings)
}

/// Detailed estimate with the default engine configuration
pub fn estimate_detailed(plan: &Plan, people: &[Person], cost_settings: Option<&CostSettings>) -> FullBreakdown {
    EstimateEngine::default().estimate_detailed(plan, people, cost_settings)
}

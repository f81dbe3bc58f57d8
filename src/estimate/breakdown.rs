//! Estimate output structures: charge items, per-person rows and the household breakdown

use super::accumulator::CoinsuranceMode;
use serde::{Deserialize, Serialize};

/// A single priced line for one person
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargeItem {
    pub label: String,

    /// How the cost was derived, e.g. "4 visits × $25.00 copay"
    pub calculation_note: String,

    pub cost: f64,

    /// Rate the plan applies to this charge after the deductible, when it has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coinsurance_rate: Option<f64>,
}

impl ChargeItem {
    pub fn new(label: impl Into<String>, calculation_note: impl Into<String>, cost: f64) -> Self {
        Self {
            label: label.into(),
            calculation_note: calculation_note.into(),
            cost,
            coinsurance_rate: None,
        }
    }

    pub fn with_coinsurance_rate(mut self, rate: Option<f64>) -> Self {
        self.coinsurance_rate = rate;
        self
    }
}

/// Everything computed for one household member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonBreakdown {
    pub person_id: String,
    pub name: String,

    // Charges
    pub exempt: Vec<ChargeItem>,
    pub deductible_applicable: Vec<ChargeItem>,
    pub exempt_total: f64,
    pub deductible_applicable_total: f64,

    // Deductible and coinsurance
    /// Household rate detected from this person's services (0 when none)
    pub coinsurance_rate: f64,
    pub deductible_paid: f64,
    pub charges_after_deductible: f64,
    pub coinsurance_paid: f64,

    // Out of pocket
    pub total_before_cap: f64,
    pub total_oop: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PremiumBreakdown {
    pub monthly_premium: f64,
    pub annual_premium: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeductibleBreakdown {
    pub individual_limit: f64,
    pub family_limit: f64,
    /// False for single-person households, which only use the individual limit
    pub applies_family_limit: bool,
    pub family_paid: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinsuranceBreakdown {
    pub mode: CoinsuranceMode,
    pub charges_after_deductible: f64,
    pub coinsurance_paid: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OopBreakdown {
    pub individual_limit: f64,
    pub family_limit: f64,
    /// Sum of per-person totals after individual capping
    pub household_oop_before_cap: f64,
    pub final_family_oop: f64,
    pub individual_moop_hits: usize,
    pub family_moop_hit: bool,
}

/// Fully itemized annual estimate for the drill-down view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullBreakdown {
    pub plan_name: String,
    pub premium_breakdown: PremiumBreakdown,
    pub person_breakdowns: Vec<PersonBreakdown>,
    pub deductible_breakdown: DeductibleBreakdown,
    pub coinsurance_breakdown: CoinsuranceBreakdown,
    pub oop_breakdown: OopBreakdown,
    pub grand_total: f64,
}

impl FullBreakdown {
    /// Collapse to the comparison-card summary
    pub fn summary(&self) -> CostSummary {
        CostSummary {
            premium: self.premium_breakdown.annual_premium,
            visits: self.oop_breakdown.final_family_oop,
            // Medication spend is folded into the out-of-pocket figure
            medications: 0.0,
            total: self.grand_total,
        }
    }
}

/// Terse annual estimate for list views
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostSummary {
    pub premium: f64,
    pub visits: f64,
    pub medications: f64,
    pub total: f64,
}

//! Deductible and coinsurance for one person, against individual and family limits

use super::classifier::ClassifiedCharges;
use crate::plan::Limits;
use serde::{Deserialize, Serialize};

/// How coinsurance is applied to charges left over after the deductible
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CoinsuranceMode {
    /// Each charge is coinsured at its own rate; charges without one use the
    /// person's detected rate
    #[default]
    PerCharge,
    /// The person's detected rate is applied to everything left over
    LastRateWins,
}

/// Deductible limits in force for a household
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeductibleLimits {
    pub individual: f64,
    /// Pooled family limit; `None` for single-person households
    pub family: Option<f64>,
}

impl DeductibleLimits {
    pub fn for_household(deductible: &Limits, household_size: usize) -> Self {
        Self {
            individual: deductible.person.max(0.0),
            family: (household_size > 1).then(|| deductible.family.max(0.0)),
        }
    }
}

/// Deductible and coinsurance results for one person, before MOOP capping
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DeductibleOutcome {
    pub deductible_paid: f64,
    pub charges_after_deductible: f64,
    pub coinsurance_paid: f64,
    pub total_oop: f64,
}

/// Apply the deductible to one person's charges, then coinsurance to the rest
///
/// A person pays toward the deductible no more than their own
/// deductible-applicable charges, the individual limit, or what is left of the
/// family limit after everyone before them in the list.
pub fn apply_deductible(
    charges: &ClassifiedCharges,
    limits: DeductibleLimits,
    family_paid_so_far: f64,
    mode: CoinsuranceMode,
) -> DeductibleOutcome {
    let deductible_total = charges.deductible_applicable_total();
    let personal_contribution = deductible_total.min(limits.individual);

    let deductible_paid = match limits.family {
        Some(family_limit) => {
            let family_remaining = (family_limit - family_paid_so_far).max(0.0);
            personal_contribution.min(family_remaining)
        }
        None => personal_contribution,
    };

    let charges_after_deductible = (deductible_total - deductible_paid).max(0.0);

    let coinsurance_paid = match mode {
        CoinsuranceMode::LastRateWins => charges_after_deductible * charges.detected_rate,
        CoinsuranceMode::PerCharge => per_charge_coinsurance(charges, deductible_paid),
    };

    DeductibleOutcome {
        deductible_paid,
        charges_after_deductible,
        coinsurance_paid,
        total_oop: charges.exempt_total() + deductible_paid + coinsurance_paid,
    }
}

/// Consume the deductible charge by charge in list order, coinsuring each remainder
fn per_charge_coinsurance(charges: &ClassifiedCharges, deductible_paid: f64) -> f64 {
    let mut deductible_left = deductible_paid;
    let mut coinsurance = 0.0;

    for item in &charges.deductible_applicable {
        let toward_deductible = item.cost.min(deductible_left);
        deductible_left -= toward_deductible;
        let remainder = item.cost - toward_deductible;
        let rate = item.coinsurance_rate.unwrap_or(charges.detected_rate);
        coinsurance += remainder * rate;
    }

    coinsurance
}

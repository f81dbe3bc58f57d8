//! Cost estimation pipeline
//!
//! Per person: classify charges, apply the deductible (individual, then the
//! family pool in list order), apply coinsurance, clamp at the individual MOOP.
//! Per household: sum, clamp at the family MOOP, add the annual premium.

mod accumulator;
mod breakdown;
mod classifier;
mod engine;
mod moop;
mod state;

pub use accumulator::{apply_deductible, CoinsuranceMode, DeductibleLimits, DeductibleOutcome};
pub use breakdown::{
    ChargeItem, CoinsuranceBreakdown, CostSummary, DeductibleBreakdown, FullBreakdown, OopBreakdown,
    PersonBreakdown, PremiumBreakdown,
};
pub use classifier::{classify_person, ClassifiedCharges};
pub use engine::{estimate_detailed, estimate_summary, EstimateConfig, EstimateEngine, DEFAULT_RX_REFILL_COST};
pub use moop::{cap_family, cap_individual, INDIVIDUAL_MOOP_NOTE};
pub use state::HouseholdTotals;

//! Healthcare Cost Estimator - annual out-of-pocket estimates for households
//!
//! This library provides:
//! - Charge classification of visits and prescriptions (copay vs deductible)
//! - Individual and family deductible accumulation with coinsurance
//! - Individual and family out-of-pocket maximum capping
//! - Premium + out-of-pocket totals as summaries or itemized breakdowns
//! - Best/worst case utilization scenarios derived from a baseline
//! - JSON/CSV import of plans, people and cost assumptions

pub mod assumptions;
pub mod error;
pub mod estimate;
pub mod household;
mod lenient;
pub mod plan;
pub mod scenario;
pub mod workspace;

// Re-export commonly used types
pub use assumptions::CostSettings;
pub use error::ImportError;
pub use estimate::{
    estimate_detailed, estimate_summary, CostSummary, EstimateConfig, EstimateEngine, FullBreakdown,
};
pub use household::{Medication, Person, VisitCounts, VisitType};
pub use plan::{Limits, Plan, PriceRule};
pub use scenario::{ScenarioKind, ScenarioRunner, Scenarios};
pub use workspace::Workspace;

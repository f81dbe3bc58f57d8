//! Insurance plan definitions and plan import

mod data;
pub mod loader;

pub use data::{Limits, Plan, PriceRule, RxCopays};
pub use loader::{import_plan_json, import_plans_json, load_plans, plans_from_value};

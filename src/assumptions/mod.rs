//! Cost assumptions for services billed through the deductible

mod cost;
pub mod loader;

pub use cost::CostSettings;
pub use loader::{
    load_cost_settings, load_cost_settings_from_reader, load_default_cost_settings, DEFAULT_COST_SETTINGS_PATH,
};

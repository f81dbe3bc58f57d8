//! Household members and their expected utilization

mod data;
pub mod loader;

pub use data::{Medication, Person, VisitCounts, VisitType};
pub use loader::{import_people_json, load_people, people_from_value};

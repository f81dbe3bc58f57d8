//! Out-of-pocket maximum capping
//!
//! A limit of 0 means the plan does not publish one, so nothing is clamped.

/// Note attached to a person whose total was clamped
pub const INDIVIDUAL_MOOP_NOTE: &str = "Individual MOOP Hit";

/// Clamp one person's total to the individual MOOP
///
/// Returns the capped total and a note when the ceiling was hit.
pub fn cap_individual(total_oop: f64, individual_limit: f64) -> (f64, Option<String>) {
    if individual_limit > 0.0 && total_oop > individual_limit {
        (individual_limit, Some(INDIVIDUAL_MOOP_NOTE.to_string()))
    } else {
        (total_oop, None)
    }
}

/// Clamp the household total to the family MOOP
///
/// Applies to every household size; a one-person household is still a family
/// for the plan's family ceiling.
pub fn cap_family(family_oop: f64, family_limit: f64) -> f64 {
    if family_limit > 0.0 {
        family_oop.min(family_limit)
    } else {
        family_oop
    }
}

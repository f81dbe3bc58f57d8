//! Household accumulation state for one estimate

/// Running household totals, threaded through the people in list order
///
/// Each step returns a new value; nothing survives past one estimate call.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HouseholdTotals {
    /// Deductible paid by everyone processed so far
    pub family_deductible_paid: f64,

    /// Out-of-pocket spend (after individual capping) of everyone processed so far
    pub family_oop_paid: f64,

    /// People whose total was clamped at the individual MOOP
    pub individual_moop_hits: usize,
}

impl HouseholdTotals {
    /// Fold one person's results into the totals
    pub fn record(self, deductible_paid: f64, capped_oop: f64, moop_hit: bool) -> Self {
        Self {
            family_deductible_paid: self.family_deductible_paid + deductible_paid,
            family_oop_paid: self.family_oop_paid + capped_oop,
            individual_moop_hits: self.individual_moop_hits + usize::from(moop_hit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_is_pure() {
        let start = HouseholdTotals::default();
        let next = start.record(500.0, 700.0, false);
        let last = next.record(250.0, 5000.0, true);

        assert_eq!(start, HouseholdTotals::default());
        assert_eq!(next.family_deductible_paid, 500.0);
        assert_eq!(last.family_deductible_paid, 750.0);
        assert_eq!(last.family_oop_paid, 5700.0);
        assert_eq!(last.individual_moop_hits, 1);
    }
}

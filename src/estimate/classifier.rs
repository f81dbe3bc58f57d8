//! Turn one person's utilization into exempt and deductible-applicable charges

use super::breakdown::ChargeItem;
use crate::assumptions::CostSettings;
use crate::household::{Medication, Person};
use crate::plan::{Plan, PriceRule};

/// One person's charges, split by how the plan pays them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassifiedCharges {
    /// Flat-copay charges that never touch the deductible
    pub exempt: Vec<ChargeItem>,
    /// Charges that count toward the deductible and are coinsured afterward
    pub deductible_applicable: Vec<ChargeItem>,
    /// Single coinsurance rate detected for this person, 0 if none
    pub detected_rate: f64,
}

impl ClassifiedCharges {
    pub fn exempt_total(&self) -> f64 {
        self.exempt.iter().map(|c| c.cost).sum()
    }

    pub fn deductible_applicable_total(&self) -> f64 {
        self.deductible_applicable.iter().map(|c| c.cost).sum()
    }
}

fn plural(count: u32, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}

fn medication_label(medication: &Medication) -> String {
    if medication.name.trim().is_empty() {
        format!("Tier {} medication", medication.tier)
    } else {
        medication.name.clone()
    }
}

/// Classify one person's visits and medications under a plan
///
/// Copay-exempt visit types are charged `visits × copay` whatever the rule
/// looks like. Every other visit type is charged at its assumed cost and goes
/// through the deductible; a coinsurance rule on it becomes the person's
/// detected rate, the last such visit type winning. Medications with a custom
/// cost are deductible-applicable at that cost; otherwise the tier rule decides
/// between a flat copay and coinsurance on `assumed_rx_refill_cost`.
pub fn classify_person(
    person: &Person,
    plan: &Plan,
    settings: &CostSettings,
    assumed_rx_refill_cost: f64,
) -> ClassifiedCharges {
    let mut charges = ClassifiedCharges::default();

    for (visit_type, count) in person.visits.iter() {
        if count == 0 {
            continue;
        }
        let rule = plan.copay_rule(visit_type);
        let visits = plural(count, "visit", "visits");

        if visit_type.is_copay_exempt() {
            let copay = rule.value();
            charges.exempt.push(ChargeItem::new(
                visit_type.label(),
                format!("{} × ${:.2} copay", visits, copay),
                count as f64 * copay,
            ));
            continue;
        }

        let unit_cost = settings.cost_for(visit_type).unwrap_or(0.0);
        let rate = rule.coinsurance_rate();
        if let Some(r) = rate.filter(|r| *r > 0.0) {
            charges.detected_rate = r;
        }
        charges.deductible_applicable.push(
            ChargeItem::new(
                visit_type.label(),
                format!("{} × ${:.2} assumed cost ({})", visits, unit_cost, rule),
                count as f64 * unit_cost,
            )
            .with_coinsurance_rate(rate),
        );
    }

    for medication in &person.medications {
        let refills = medication.refills_per_year;
        if refills == 0 {
            continue;
        }
        let label = medication_label(medication);
        let refill_text = plural(refills, "refill", "refills");

        if let Some(custom) = medication.custom_cost_per_refill() {
            charges.deductible_applicable.push(ChargeItem::new(
                label,
                format!("{} × ${:.2} custom cost", refill_text, custom),
                refills as f64 * custom,
            ));
            continue;
        }

        match plan.rx_copays.rule_for(medication.tier) {
            PriceRule::Copay(copay) => charges.exempt.push(ChargeItem::new(
                label,
                format!("{} × ${:.2} tier {} copay", refill_text, copay, medication.tier),
                refills as f64 * copay,
            )),
            rule @ PriceRule::Coinsurance(rate) => {
                if charges.detected_rate == 0.0 && rate > 0.0 {
                    charges.detected_rate = rate;
                }
                charges.deductible_applicable.push(
                    ChargeItem::new(
                        label,
                        format!(
                            "{} × ${:.2} assumed cost (tier {}, {})",
                            refill_text, assumed_rx_refill_cost, medication.tier, rule
                        ),
                        refills as f64 * assumed_rx_refill_cost,
                    )
                    .with_coinsurance_rate(Some(rate)),
                );
            }
        }
    }

    charges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::household::{Medication, VisitType};
    use approx::assert_abs_diff_eq;

    fn test_plan() -> Plan {
        Plan::new("Test")
            .with_copay(VisitType::PrimaryCare, PriceRule::Copay(25.0))
            .with_copay(VisitType::Specialist, PriceRule::Copay(50.0))
            .with_copay(VisitType::EmergencyRoom, PriceRule::Coinsurance(0.2))
            .with_copay(VisitType::Imaging, PriceRule::Coinsurance(0.3))
            .with_rx_copay(1, PriceRule::Copay(10.0))
            .with_rx_copay(4, PriceRule::Coinsurance(0.4))
    }

    #[test]
    fn test_copay_visits_are_exempt() {
        let person = Person::new("p1", "Alex")
            .with_visits(VisitType::PrimaryCare, 4)
            .with_visits(VisitType::Specialist, 1);
        let charges = classify_person(&person, &test_plan(), &CostSettings::default(), 100.0);

        assert_eq!(charges.exempt.len(), 2);
        assert!(charges.deductible_applicable.is_empty());
        assert_abs_diff_eq!(charges.exempt_total(), 150.0);
        assert_eq!(charges.exempt[0].calculation_note, "4 visits × $25.00 copay");
        assert_eq!(charges.detected_rate, 0.0);
    }

    #[test]
    fn test_exempt_type_uses_rule_value_even_for_rates() {
        let plan = Plan::new("Odd").with_copay(VisitType::UrgentCare, PriceRule::Coinsurance(0.5));
        let person = Person::new("p1", "Alex").with_visits(VisitType::UrgentCare, 2);
        let charges = classify_person(&person, &plan, &CostSettings::default(), 100.0);

        assert_abs_diff_eq!(charges.exempt_total(), 1.0);
        assert!(charges.deductible_applicable.is_empty());
    }

    #[test]
    fn test_deductible_visits_use_assumed_cost_and_last_rate() {
        let settings = CostSettings::default()
            .with_cost(VisitType::EmergencyRoom, 1500.0)
            .with_cost(VisitType::Imaging, 800.0);
        let person = Person::new("p1", "Alex")
            .with_visits(VisitType::EmergencyRoom, 1)
            .with_visits(VisitType::Imaging, 2);
        let charges = classify_person(&person, &test_plan(), &settings, 100.0);

        assert_eq!(charges.deductible_applicable.len(), 2);
        assert_abs_diff_eq!(charges.deductible_applicable_total(), 3100.0);
        // Imaging comes after the ER in processing order
        assert_eq!(charges.detected_rate, 0.3);
        assert_eq!(charges.deductible_applicable[0].coinsurance_rate, Some(0.2));
        assert_eq!(
            charges.deductible_applicable[0].calculation_note,
            "1 visit × $1500.00 assumed cost (20% coinsurance)"
        );
    }

    #[test]
    fn test_flat_priced_deductible_visit_has_no_rate() {
        let plan = Plan::new("Flat").with_copay(VisitType::DiagnosticTest, PriceRule::Copay(40.0));
        let person = Person::new("p1", "Alex").with_visits(VisitType::DiagnosticTest, 3);
        let charges = classify_person(&person, &plan, &CostSettings::default(), 100.0);

        assert_abs_diff_eq!(charges.deductible_applicable_total(), 900.0);
        assert_eq!(charges.deductible_applicable[0].coinsurance_rate, None);
        assert_eq!(charges.detected_rate, 0.0);
    }

    #[test]
    fn test_medication_pricing() {
        let person = Person::new("p1", "Alex")
            .with_medication(Medication::new("m1", "Generic", 1))
            .with_medication(Medication::new("m2", "Specialty", 4).with_refills(6))
            .with_medication(Medication::new("m3", "", 4).with_refills(6).with_custom_cost(60.0));
        let charges = classify_person(&person, &test_plan(), &CostSettings::default(), 100.0);

        assert_eq!(charges.exempt.len(), 1);
        assert_abs_diff_eq!(charges.exempt_total(), 120.0);
        assert_eq!(charges.deductible_applicable.len(), 2);
        assert_abs_diff_eq!(charges.deductible_applicable[0].cost, 600.0);
        assert_abs_diff_eq!(charges.deductible_applicable[1].cost, 360.0);
        assert_eq!(charges.deductible_applicable[1].label, "Tier 4 medication");
        assert_eq!(charges.deductible_applicable[1].coinsurance_rate, None);
        assert_eq!(charges.detected_rate, 0.4);
    }

    #[test]
    fn test_visit_rate_takes_precedence_over_medication_rate() {
        let person = Person::new("p1", "Alex")
            .with_visits(VisitType::EmergencyRoom, 1)
            .with_medication(Medication::new("m1", "Specialty", 4));
        let charges = classify_person(&person, &test_plan(), &CostSettings::default(), 100.0);
        assert_eq!(charges.detected_rate, 0.2);
    }

    #[test]
    fn test_zero_counts_produce_no_items() {
        let person = Person::new("p1", "Alex")
            .with_medication(Medication::new("m1", "Paused", 1).with_refills(0));
        let charges = classify_person(&person, &test_plan(), &CostSettings::default(), 100.0);
        assert!(charges.exempt.is_empty());
        assert!(charges.deductible_applicable.is_empty());
    }
}

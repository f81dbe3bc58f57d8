//! End-to-end checks of the estimator through the public API

use approx::assert_abs_diff_eq;
use healthcare_cost_estimator::{
    estimate_detailed, estimate_summary,
    plan::import_plan_json,
    scenario::{best_case, worst_case},
    CostSettings, Medication, Person, Plan, PriceRule, Scenarios, VisitType,
};

fn ppo() -> Plan {
    Plan::new("PPO")
        .with_premium(450.0)
        .with_medical_deductible(1500.0, 3000.0)
        .with_out_of_pocket_max(5000.0, 9000.0)
        .with_copay(VisitType::PrimaryCare, PriceRule::Copay(25.0))
        .with_copay(VisitType::Specialist, PriceRule::Copay(60.0))
        .with_copay(VisitType::EmergencyRoom, PriceRule::Coinsurance(0.3))
        .with_copay(VisitType::Imaging, PriceRule::Coinsurance(0.2))
        .with_copay(VisitType::RehabilitationOutpatient, PriceRule::Copay(40.0))
        .with_rx_copay(1, PriceRule::Copay(10.0))
        .with_rx_copay(4, PriceRule::Coinsurance(0.4))
}

/// Households from light to very heavy users, 1 to 4 people
fn households() -> Vec<Vec<Person>> {
    let profile = |i: u32| {
        Person::new(format!("p{}", i), format!("Person {}", i))
            .with_visits(VisitType::PrimaryCare, i + 1)
            .with_visits(VisitType::Specialist, i)
            .with_visits(VisitType::EmergencyRoom, i * 2)
            .with_visits(VisitType::Imaging, i % 3)
            .with_visits(VisitType::RehabilitationOutpatient, i * 3)
            .with_medication(Medication::new(format!("m{}", i), "Brand", 4).with_refills(i * 4))
    };

    (1..=4)
        .flat_map(|size| {
            (0..4).map(move |offset| (0..size).map(|i| profile(i * 2 + offset)).collect::<Vec<_>>())
        })
        .collect()
}

#[test]
fn family_oop_never_exceeds_family_limit() {
    let plan = ppo();
    for people in households() {
        let breakdown = estimate_detailed(&plan, &people, None);
        assert!(breakdown.oop_breakdown.final_family_oop <= plan.out_of_pocket_max.family + 1e-9);
    }
}

#[test]
fn family_limit_binds_single_person_without_individual_limit() {
    let plan = Plan::new("Family cap only")
        .with_out_of_pocket_max(0.0, 3000.0)
        .with_copay(VisitType::EmergencyRoom, PriceRule::Coinsurance(0.5));
    let people = vec![Person::new("p1", "Alex").with_visits(VisitType::EmergencyRoom, 5)];

    let breakdown = estimate_detailed(&plan, &people, None);

    assert_abs_diff_eq!(breakdown.person_breakdowns[0].total_oop, 5500.0);
    assert!(breakdown.person_breakdowns[0].note.is_none());
    assert_abs_diff_eq!(breakdown.oop_breakdown.final_family_oop, 3000.0);
    assert!(breakdown.oop_breakdown.family_moop_hit);
    assert_abs_diff_eq!(breakdown.grand_total, 3000.0);
}

#[test]
fn person_oop_never_exceeds_individual_limit() {
    let plan = ppo();
    for people in households() {
        let breakdown = estimate_detailed(&plan, &people, None);
        for person in &breakdown.person_breakdowns {
            assert!(person.total_oop <= plan.out_of_pocket_max.person + 1e-9);
        }
    }
}

#[test]
fn deductible_paid_never_exceeds_family_limit() {
    let plan = ppo();
    for people in households().into_iter().filter(|p| p.len() > 1) {
        let breakdown = estimate_detailed(&plan, &people, None);
        let paid: f64 = breakdown.person_breakdowns.iter().map(|p| p.deductible_paid).sum();
        assert!(paid <= plan.medical_deductible.family + 1e-9);
    }
}

#[test]
fn repeated_estimates_are_identical() {
    let plan = ppo();
    let settings = CostSettings::default().with_cost(VisitType::Imaging, 1250.0);
    for people in households() {
        assert_eq!(
            estimate_detailed(&plan, &people, Some(&settings)),
            estimate_detailed(&plan, &people, Some(&settings))
        );
        assert_eq!(
            estimate_summary(&plan, &people, Some(&settings)),
            estimate_summary(&plan, &people, Some(&settings))
        );
    }
}

#[test]
fn scenario_derivation_is_pure_and_suffix_stable() {
    let baseline = households().pop().unwrap_or_default();

    assert_eq!(best_case(&baseline), best_case(&baseline));
    assert_eq!(Scenarios::derive(&baseline), Scenarios::derive(&baseline));

    let rederived = best_case(&best_case(&baseline));
    assert!(rederived.iter().all(|p| p.name.matches("(Best Case)").count() == 1));

    let crossed = worst_case(&best_case(&baseline));
    assert!(crossed.iter().all(|p| p.name.ends_with(" (Worst Case)") && !p.name.contains("Best")));
}

#[test]
fn copay_only_household() {
    let plan = Plan::new("Copay")
        .with_premium(300.0)
        .with_copay(VisitType::PrimaryCare, PriceRule::Copay(25.0));
    let people = vec![Person::new("p1", "Alex").with_visits(VisitType::PrimaryCare, 4)];

    let breakdown = estimate_detailed(&plan, &people, None);

    assert_abs_diff_eq!(breakdown.person_breakdowns[0].exempt_total, 100.0);
    assert_abs_diff_eq!(breakdown.premium_breakdown.annual_premium, 3600.0);
    assert_abs_diff_eq!(breakdown.grand_total, 3700.0);
}

#[test]
fn emergency_visit_through_deductible_and_coinsurance() {
    let plan = import_plan_json(
        r#"{"name": "Legacy", "premium": 0,
            "medicalDeductible": {"person": 500, "family": 0},
            "rxDeductible": {"person": 0, "family": 0},
            "outOfPocketMax": {"person": 5000, "family": 0},
            "copays": {"emergencyRoom": 0.2}, "coinsurance": {}, "rxCopays": {}}"#,
    )
    .unwrap();
    let settings = CostSettings::default().with_cost(VisitType::EmergencyRoom, 1500.0);
    let people = vec![Person::new("p1", "Alex").with_visits(VisitType::EmergencyRoom, 1)];

    let breakdown = estimate_detailed(&plan, &people, Some(&settings));
    let person = &breakdown.person_breakdowns[0];

    assert_abs_diff_eq!(person.deductible_applicable_total, 1500.0);
    assert_abs_diff_eq!(person.deductible_paid, 500.0);
    assert_abs_diff_eq!(person.coinsurance_paid, 200.0);
    assert_abs_diff_eq!(person.total_oop, 700.0);
    assert!(person.note.is_none());
}

#[test]
fn family_moop_clamps_below_individual_sum() {
    let plan = Plan::new("Tight")
        .with_out_of_pocket_max(3000.0, 4500.0)
        .with_copay(VisitType::EmergencyRoom, PriceRule::Coinsurance(0.5));
    let people = vec![
        Person::new("a", "A").with_visits(VisitType::EmergencyRoom, 5),
        Person::new("b", "B").with_visits(VisitType::EmergencyRoom, 5),
    ];

    let breakdown = estimate_detailed(&plan, &people, None);

    assert!(breakdown.person_breakdowns.iter().all(|p| p.total_oop == 3000.0));
    assert_abs_diff_eq!(breakdown.oop_breakdown.household_oop_before_cap, 6000.0);
    assert_abs_diff_eq!(breakdown.oop_breakdown.final_family_oop, 4500.0);
    assert_abs_diff_eq!(breakdown.grand_total, 4500.0);
}

#[test]
fn custom_cost_medication_counts_in_full() {
    let plan = Plan::new("No limits");
    let people = vec![Person::new("p1", "Alex")
        .with_medication(Medication::new("m1", "Compounded", 3).with_refills(6).with_custom_cost(60.0))];

    let breakdown = estimate_detailed(&plan, &people, None);
    let person = &breakdown.person_breakdowns[0];

    assert_eq!(person.deductible_applicable.len(), 1);
    assert_abs_diff_eq!(person.deductible_applicable_total, 360.0);
    assert_abs_diff_eq!(person.deductible_paid, 0.0);
    assert_abs_diff_eq!(person.charges_after_deductible, 360.0);
}

#[test]
fn garbage_plan_sections_estimate_as_zero() {
    let plan = import_plan_json(
        r#"{"name": "Half edited", "premium": "abc",
            "medicalDeductible": "x", "rxDeductible": null,
            "outOfPocketMax": [], "copays": 5, "coinsurance": "y", "rxCopays": false}"#,
    )
    .unwrap();
    let people = vec![Person::new("p1", "Alex")
        .with_visits(VisitType::PrimaryCare, 3)
        .with_visits(VisitType::EmergencyRoom, 1)
        .with_medication(Medication::new("m1", "Generic", 2))];

    let breakdown = estimate_detailed(&plan, &people, None);
    let person = &breakdown.person_breakdowns[0];

    assert_abs_diff_eq!(person.exempt_total, 0.0);
    assert_abs_diff_eq!(person.deductible_applicable_total, 2200.0 + 12.0 * 100.0);
    assert_abs_diff_eq!(person.deductible_paid, 0.0);
    assert_abs_diff_eq!(person.coinsurance_paid, 0.0);
    assert_abs_diff_eq!(person.total_oop, 0.0);
    assert_abs_diff_eq!(breakdown.premium_breakdown.annual_premium, 0.0);
    assert_abs_diff_eq!(breakdown.grand_total, 0.0);
}

#[test]
fn negative_json_cost_never_produces_negative_spend() {
    let settings: CostSettings = serde_json::from_str(r#"{"emergencyRoom": -1500}"#).unwrap();
    let plan = Plan::new("ER").with_copay(VisitType::EmergencyRoom, PriceRule::Coinsurance(0.2));
    let people = vec![Person::new("p1", "Alex").with_visits(VisitType::EmergencyRoom, 1)];

    let breakdown = estimate_detailed(&plan, &people, Some(&settings));

    assert_abs_diff_eq!(breakdown.person_breakdowns[0].deductible_applicable_total, 0.0);
    assert_abs_diff_eq!(breakdown.oop_breakdown.final_family_oop, 0.0);
}

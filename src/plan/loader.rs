//! Import plans from JSON
//!
//! Plan files may price services either with tagged rules
//! (`{"copay": 25}` / `{"coinsurance": 0.2}`) or with the legacy bare numbers
//! where a visit value between 0 and 1 meant a rate. Legacy numbers are
//! converted to `PriceRule`s here and nowhere else.

use super::{Limits, Plan, PriceRule, RxCopays};
use crate::error::ImportError;
use crate::household::VisitType;
use crate::lenient;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::Path;

/// Fields every imported plan must carry
pub const REQUIRED_PLAN_FIELDS: [&str; 7] = [
    "name",
    "medicalDeductible",
    "rxDeductible",
    "outOfPocketMax",
    "copays",
    "coinsurance",
    "rxCopays",
];

/// How a bare number should be read
#[derive(Debug, Clone, Copy)]
enum LegacyContext {
    Visit,
    Rx,
}

fn price_rule_from_value(value: &Value, context: LegacyContext) -> PriceRule {
    if value.is_object() {
        if let Ok(rule) = serde_json::from_value::<PriceRule>(value.clone()) {
            return match rule {
                PriceRule::Coinsurance(rate) => PriceRule::coinsurance(rate),
                PriceRule::Copay(amount) => PriceRule::Copay(amount.max(0.0)),
            };
        }
        log::warn!("Unrecognised price rule {}, treated as 0", value);
    }
    let number = lenient::amount(Some(value));
    match context {
        LegacyContext::Visit => PriceRule::from_legacy_visit(number),
        LegacyContext::Rx => PriceRule::from_legacy_rx(number),
    }
}

fn limits_from_value(value: Option<&Value>) -> Limits {
    match value {
        Some(Value::Object(map)) => Limits {
            person: lenient::amount(map.get("person")),
            family: lenient::amount(map.get("family")),
        },
        _ => Limits::default(),
    }
}

fn copays_from_value(plan: &str, value: Option<&Value>) -> BTreeMap<VisitType, PriceRule> {
    let mut copays = BTreeMap::new();
    if let Some(Value::Object(map)) = value {
        for (key, raw) in map {
            match VisitType::from_key(key) {
                Some(visit_type) => {
                    copays.insert(visit_type, price_rule_from_value(raw, LegacyContext::Visit));
                }
                None => log::warn!("{}: ignoring copay for unknown visit type '{}'", plan, key),
            }
        }
    }
    copays
}

fn rx_copays_from_value(value: Option<&Value>) -> RxCopays {
    let mut rx = RxCopays::default();
    if let Some(Value::Object(map)) = value {
        for tier in 1..=5u8 {
            if let Some(raw) = map.get(&format!("tier{}", tier)) {
                rx.set(tier, price_rule_from_value(raw, LegacyContext::Rx));
            }
        }
    }
    rx
}

fn coinsurance_from_value(value: Option<&Value>) -> BTreeMap<String, f64> {
    match value {
        Some(Value::Object(map)) => map
            .iter()
            .map(|(k, v)| (k.clone(), lenient::amount(Some(v))))
            .collect(),
        _ => BTreeMap::new(),
    }
}

fn waived_tiers_from_value(value: Option<&Value>) -> Vec<u8> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .map(|v| lenient::count(Some(v)))
            .filter(|t| (1..=5).contains(t))
            .map(|t| t as u8)
            .collect(),
        _ => Vec::new(),
    }
}

/// Check required fields and build a plan from one JSON object
fn plan_from_object(position: usize, fields: &Map<String, Value>) -> Result<Plan, ImportError> {
    let record = match lenient::text(fields.get("name")) {
        Some(name) => format!("plan '{}'", name),
        None => format!("plan {}", position + 1),
    };
    for field in REQUIRED_PLAN_FIELDS {
        if !fields.contains_key(field) {
            return Err(ImportError::missing_field(record, field));
        }
    }

    let name = lenient::text(fields.get("name")).unwrap_or_default();
    if lenient::is_malformed_number(fields.get("premium")) {
        log::warn!("{}: non-numeric premium treated as 0", name);
    }

    Ok(Plan {
        monthly_premium: lenient::amount(fields.get("premium")),
        medical_deductible: limits_from_value(fields.get("medicalDeductible")),
        rx_deductible: limits_from_value(fields.get("rxDeductible")),
        out_of_pocket_max: limits_from_value(fields.get("outOfPocketMax")),
        copays: copays_from_value(&name, fields.get("copays")),
        coinsurance: coinsurance_from_value(fields.get("coinsurance")),
        rx_copays: rx_copays_from_value(fields.get("rxCopays")),
        rx_deductible_waived: waived_tiers_from_value(fields.get("rxDeductibleWaived")),
        name,
    })
}

/// Build plans from a parsed document: a single plan object or an array of them
pub fn plans_from_value(document: &Value) -> Result<Vec<Plan>, ImportError> {
    match document {
        Value::Object(fields) => Ok(vec![plan_from_object(0, fields)?]),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let fields = item
                    .as_object()
                    .ok_or_else(|| ImportError::NotAnObject(format!("plan {}", i + 1)))?;
                plan_from_object(i, fields)
            })
            .collect(),
        _ => Err(ImportError::NotAnObject("plan import".to_string())),
    }
}

/// Import exactly one plan from a JSON object string
pub fn import_plan_json(json: &str) -> Result<Plan, ImportError> {
    let document: Value = serde_json::from_str(json)?;
    let fields = document
        .as_object()
        .ok_or_else(|| ImportError::NotAnObject("plan".to_string()))?;
    plan_from_object(0, fields)
}

/// Import one or many plans from a JSON string
pub fn import_plans_json(json: &str) -> Result<Vec<Plan>, ImportError> {
    let document: Value = serde_json::from_str(json)?;
    plans_from_value(&document)
}

/// Load one or many plans from a JSON file
pub fn load_plans<P: AsRef<Path>>(path: P) -> Result<Vec<Plan>, ImportError> {
    let contents = std::fs::read_to_string(path)?;
    import_plans_json(&contents)
}

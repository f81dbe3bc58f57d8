//! Insurance plan data structures

use crate::household::VisitType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// How a plan prices one service
///
/// Serialized externally tagged: `{"copay": 25.0}` or `{"coinsurance": 0.2}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PriceRule {
    /// Flat dollar amount per occurrence
    Copay(f64),
    /// Fraction of the service cost owed after the deductible (0.0 - 1.0)
    Coinsurance(f64),
}

impl PriceRule {
    /// Coinsurance rule with the rate clamped into [0, 1]
    pub fn coinsurance(rate: f64) -> Self {
        PriceRule::Coinsurance(rate.clamp(0.0, 1.0))
    }

    /// Convert a legacy visit copay number
    ///
    /// Values strictly between 0 and 1 were rates; everything else was dollars.
    pub fn from_legacy_visit(value: f64) -> Self {
        if value > 0.0 && value < 1.0 {
            PriceRule::Coinsurance(value)
        } else {
            PriceRule::Copay(value.max(0.0))
        }
    }

    /// Convert a legacy prescription tier number
    ///
    /// Values above 1 were dollars; anything else, zero included, was a rate.
    pub fn from_legacy_rx(value: f64) -> Self {
        if value > 1.0 {
            PriceRule::Copay(value)
        } else {
            PriceRule::coinsurance(value)
        }
    }

    /// The raw number carried by the rule
    pub fn value(&self) -> f64 {
        match self {
            PriceRule::Copay(amount) => *amount,
            PriceRule::Coinsurance(rate) => *rate,
        }
    }

    pub fn coinsurance_rate(&self) -> Option<f64> {
        match self {
            PriceRule::Coinsurance(rate) => Some(*rate),
            PriceRule::Copay(_) => None,
        }
    }
}

impl fmt::Display for PriceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriceRule::Copay(amount) => write!(f, "${:.2} copay", amount),
            PriceRule::Coinsurance(rate) => {
                write!(f, "{}% coinsurance", (rate * 10_000.0).round() / 100.0)
            }
        }
    }
}

/// Per-person and family pair of limits (deductible or out-of-pocket max)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    pub person: f64,
    pub family: f64,
}

impl Limits {
    pub fn new(person: f64, family: f64) -> Self {
        Self { person, family }
    }
}

/// Prescription pricing by formulary tier
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RxCopays {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier1: Option<PriceRule>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier2: Option<PriceRule>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier3: Option<PriceRule>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier4: Option<PriceRule>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier5: Option<PriceRule>,
}

impl RxCopays {
    fn slot(&mut self, tier: u8) -> Option<&mut Option<PriceRule>> {
        match tier {
            1 => Some(&mut self.tier1),
            2 => Some(&mut self.tier2),
            3 => Some(&mut self.tier3),
            4 => Some(&mut self.tier4),
            5 => Some(&mut self.tier5),
            _ => None,
        }
    }

    /// Pricing for a tier; an unpriced tier is coinsurance at 0%
    pub fn rule_for(&self, tier: u8) -> PriceRule {
        let rule = match tier {
            1 => self.tier1,
            2 => self.tier2,
            3 => self.tier3,
            4 => self.tier4,
            5 => self.tier5,
            _ => None,
        };
        rule.unwrap_or(PriceRule::Coinsurance(0.0))
    }

    /// Set pricing for a tier; tiers outside 1-5 are ignored
    pub fn set(&mut self, tier: u8, rule: PriceRule) {
        if let Some(slot) = self.slot(tier) {
            *slot = Some(rule);
        }
    }
}

/// An insurance plan under comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub name: String,

    /// Monthly premium
    #[serde(rename = "premium", default)]
    pub monthly_premium: f64,

    #[serde(default)]
    pub medical_deductible: Limits,

    /// Carried for display; the estimator does not apply a separate rx deductible
    #[serde(default)]
    pub rx_deductible: Limits,

    #[serde(default)]
    pub out_of_pocket_max: Limits,

    #[serde(default)]
    pub copays: BTreeMap<VisitType, PriceRule>,

    /// Informational coinsurance table as published by the insurer
    #[serde(default)]
    pub coinsurance: BTreeMap<String, f64>,

    #[serde(default)]
    pub rx_copays: RxCopays,

    #[serde(default)]
    pub rx_deductible_waived: Vec<u8>,
}

impl Plan {
    /// Create an empty plan: no premium, no limits, nothing priced
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            monthly_premium: 0.0,
            medical_deductible: Limits::default(),
            rx_deductible: Limits::default(),
            out_of_pocket_max: Limits::default(),
            copays: BTreeMap::new(),
            coinsurance: BTreeMap::new(),
            rx_copays: RxCopays::default(),
            rx_deductible_waived: Vec::new(),
        }
    }

    pub fn with_premium(mut self, monthly_premium: f64) -> Self {
        self.monthly_premium = monthly_premium;
        self
    }

    pub fn with_medical_deductible(mut self, person: f64, family: f64) -> Self {
        self.medical_deductible = Limits::new(person, family);
        self
    }

    pub fn with_out_of_pocket_max(mut self, person: f64, family: f64) -> Self {
        self.out_of_pocket_max = Limits::new(person, family);
        self
    }

    pub fn with_copay(mut self, visit_type: VisitType, rule: PriceRule) -> Self {
        self.copays.insert(visit_type, rule);
        self
    }

    pub fn with_rx_copay(mut self, tier: u8, rule: PriceRule) -> Self {
        self.rx_copays.set(tier, rule);
        self
    }

    /// Pricing for a visit type; an unpriced visit is a $0 copay
    pub fn copay_rule(&self, visit_type: VisitType) -> PriceRule {
        self.copays
            .get(&visit_type)
            .copied()
            .unwrap_or(PriceRule::Copay(0.0))
    }

    pub fn annual_premium(&self) -> f64 {
        self.monthly_premium * 12.0
    }
}

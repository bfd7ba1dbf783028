//! Rule-based behavior classification.
//!
//! An explicit ordered decision list: the first matching rule wins, and the
//! order is part of the contract (a wallet matching both `trader` and `whale`
//! is a trader because the trader rule is evaluated first). Keeping the rules
//! as a literal list keeps the priority auditable.

use crate::core::types::{BehaviorPattern, BehaviorProfile, WalletFeatureVector};

/// The numeric facts the rules read. Built from one wallet's profile or from
/// a cluster's aggregate statistics.
#[derive(Debug, Clone, Copy)]
pub struct BehaviorInputs {
    pub unique_protocols: f64,
    pub avg_transaction_value: f64,
    pub activity_frequency: f64,
    pub hour_breadth: f64,
    pub account_age_days: f64,
}

impl From<&WalletFeatureVector> for BehaviorInputs {
    fn from(w: &WalletFeatureVector) -> Self {
        Self {
            unique_protocols: w.unique_protocols as f64,
            avg_transaction_value: w.avg_transaction_value,
            activity_frequency: w.activity_frequency,
            hour_breadth: w.preferred_hours.len() as f64,
            account_age_days: w.account_age_days,
        }
    }
}

struct Rule {
    predicate: fn(&BehaviorInputs) -> bool,
    pattern: BehaviorPattern,
    confidence: f64,
    characteristics: &'static [&'static str],
}

/// Evaluated top to bottom; order is semantically significant.
const RULES: &[Rule] = &[
    Rule {
        predicate: |i| {
            i.unique_protocols > 15.0
                && i.avg_transaction_value < 500.0
                && i.activity_frequency > 1.0
        },
        pattern: BehaviorPattern::Farmer,
        confidence: 85.0,
        characteristics: &[
            "interacts with many protocols",
            "small transaction sizes",
            "steady daily activity",
        ],
    },
    Rule {
        predicate: |i| i.activity_frequency > 5.0 && i.avg_transaction_value > 1000.0,
        pattern: BehaviorPattern::Trader,
        confidence: 80.0,
        characteristics: &["high transaction frequency", "sizable average value"],
    },
    Rule {
        predicate: |i| i.hour_breadth <= 2.0 && i.activity_frequency > 5.0,
        pattern: BehaviorPattern::Bot,
        confidence: 90.0,
        characteristics: &["narrow timing window", "machine-like regularity"],
    },
    Rule {
        predicate: |i| i.avg_transaction_value > 100_000.0,
        pattern: BehaviorPattern::Whale,
        confidence: 85.0,
        characteristics: &["very large average transaction value"],
    },
    Rule {
        predicate: |i| i.activity_frequency < 0.1 && i.account_age_days > 365.0,
        pattern: BehaviorPattern::Holder,
        confidence: 75.0,
        characteristics: &["long-lived account", "rare activity"],
    },
    Rule {
        predicate: |i| i.account_age_days < 30.0,
        pattern: BehaviorPattern::NewUser,
        confidence: 70.0,
        characteristics: &["account younger than 30 days"],
    },
];

/// Classify raw inputs. Falls back to `new_user` with reduced confidence when
/// nothing matches.
pub fn classify_inputs(inputs: &BehaviorInputs) -> BehaviorProfile {
    for rule in RULES {
        if (rule.predicate)(inputs) {
            return BehaviorProfile {
                pattern: rule.pattern,
                confidence: rule.confidence,
                characteristics: rule
                    .characteristics
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            };
        }
    }
    BehaviorProfile {
        pattern: BehaviorPattern::NewUser,
        confidence: 50.0,
        characteristics: vec!["no distinctive behavioral signature".to_string()],
    }
}

/// Classify one wallet's profile.
pub fn classify(wallet: &WalletFeatureVector) -> BehaviorProfile {
    classify_inputs(&BehaviorInputs::from(wallet))
}

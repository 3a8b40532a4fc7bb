//! Efficiency classification
//!
//! Buckets the slowest passing test-case time into a performance tier.
//! Only consulted for accepted submissions; anything over the hard ceiling
//! would already have been rejected as TIME_LIMIT_EXCEEDED.

use serde::{Deserialize, Serialize};

use crate::config::EfficiencyThresholds;

/// Coarse performance tier derived from the slowest test case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tier {
    #[serde(rename = "OPTIMAL")]
    Optimal,

    #[serde(rename = "ACCEPTABLE")]
    Acceptable,

    #[serde(rename = "BRUTE_FORCE")]
    BruteForce,

    #[serde(rename = "TOO_SLOW")]
    TooSlow,
}

/// Efficiency classification with a user-facing message
#[derive(Debug, Clone, Serialize)]
pub struct EfficiencyResult {
    pub tier: Tier,
    pub message: String,
}

/// Classify the slowest test-case time into a tier
pub fn classify(max_time_ms: u64, thresholds: &EfficiencyThresholds) -> EfficiencyResult {
    let (tier, message) = if max_time_ms <= thresholds.optimal_ms {
        (Tier::Optimal, "Excellent! Optimal solution.")
    } else if max_time_ms <= thresholds.acceptable_ms {
        (Tier::Acceptable, "Good solution, but could be optimized.")
    } else if max_time_ms <= thresholds.brute_force_ms {
        (Tier::BruteForce, "Warning: appears to be brute force.")
    } else {
        (Tier::TooSlow, "Too slow; exceeds practical limits.")
    };

    EfficiencyResult {
        tier,
        message: message.to_owned(),
    }
}

/// Advisory warning emitted alongside slow-but-accepted tiers
pub(crate) fn advisory_warning(tier: Tier) -> Option<&'static str> {
    match tier {
        Tier::Optimal | Tier::TooSlow => None,
        Tier::Acceptable => Some("Good solution! There might be room for further optimization."),
        Tier::BruteForce => Some(
            "Your solution works but uses a brute force approach. \
             Consider optimizing for better performance.",
        ),
    }
}


#[cfg(test)]
mod proptests {
    use proptest::prelude::*;

    use super::*;

    proptest! {
        #[test]
        fn classify_is_total_and_monotonic(a in 0u64..100_000, b in 0u64..100_000) {
            let thresholds = EfficiencyThresholds::default();
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let tier_lo = classify(lo, &thresholds).tier;
            let tier_hi = classify(hi, &thresholds).tier;

            let rank = |t: Tier| match t {
                Tier::Optimal => 0,
                Tier::Acceptable => 1,
                Tier::BruteForce => 2,
                Tier::TooSlow => 3,
            };
            prop_assert!(rank(tier_lo) <= rank(tier_hi));
        }
    }
}

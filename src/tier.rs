//! Deterministic tier scoring: an ordered decision table over
//! (restaurant type, location bucket, employees per location).
//!
//! Rules are not mutually exclusive by construction; the list order encodes
//! priority and the first matching rule wins. The table is total: a
//! catch-all terminal rule guarantees every input reaches a tier.

use crate::record::{LocationBucket, RestaurantType, Tier, TierAssignment};

type Guard = fn(RestaurantType, LocationBucket, u32) -> bool;
type Outcome = fn(RestaurantType) -> TierAssignment;

struct Rule {
    name: &'static str,
    matches: Guard,
    outcome: Outcome,
}

const RULES: &[Rule] = &[
    Rule {
        name: "single-location-too-small",
        matches: |_, bucket, emp| bucket == LocationBucket::One && emp <= 14,
        outcome: |_| {
            TierAssignment::new(Tier::NotAFit, "Single location with 14 or fewer employees")
        },
    },
    Rule {
        name: "corporate-scale",
        matches: |_, bucket, _| bucket == LocationBucket::SixteenPlus,
        outcome: |_| TierAssignment::new(Tier::NotAFit, "Groups with over 15 corporate stores"),
    },
    Rule {
        name: "fsr-scale",
        matches: |rt, bucket, emp| {
            bucket == LocationBucket::TwoToFive && rt == RestaurantType::Fsr && emp >= 30
        },
        outcome: |_| {
            TierAssignment::new(
                Tier::Tier1,
                "FSR Scale: 2-5 locations, Full-Service, 30+ employees/loc",
            )
        },
    },
    Rule {
        name: "multi-location",
        matches: |_, bucket, emp| bucket == LocationBucket::TwoToFive && (15..30).contains(&emp),
        outcome: |rt| {
            TierAssignment::new(
                Tier::Tier2,
                format!("Multi-Loc: 2-5 locations, {}, 15+ employees/loc", rt),
            )
        },
    },
    Rule {
        name: "single-location",
        matches: |_, bucket, emp| bucket == LocationBucket::One && emp >= 15,
        outcome: |rt| {
            TierAssignment::new(
                Tier::Tier3,
                format!("Single Loc: 1 location, {}, 15+ employees/loc", rt),
            )
        },
    },
    Rule {
        name: "franchise-multi-location",
        matches: |_, bucket, _| bucket == LocationBucket::SixToFifteen,
        outcome: |rt| {
            let reason = if rt == RestaurantType::Qsr {
                "Franchise Multi-Loc: 6-15 locations, QSR"
            } else {
                "Franchise Multi-Loc: 6-15 locations, low customization group"
            };
            TierAssignment::new(Tier::Tier4, reason)
        },
    },
    Rule {
        name: "multi-location-understaffed",
        matches: |_, bucket, emp| bucket == LocationBucket::TwoToFive && emp < 15,
        outcome: |_| {
            TierAssignment::new(
                Tier::NotAFit,
                "Multi-location but fewer than 15 employees per location",
            )
        },
    },
    Rule {
        name: "no-rule-matched",
        matches: |_, _, _| true,
        outcome: |_| TierAssignment::new(Tier::NotAFit, "Does not meet tier criteria"),
    },
];

/// Score one record against the decision table. First matching rule wins.
pub fn score(
    restaurant_type: RestaurantType,
    bucket: LocationBucket,
    employees_per_location: u32,
) -> TierAssignment {
    for rule in RULES {
        if (rule.matches)(restaurant_type, bucket, employees_per_location) {
            tracing::debug!(
                rule = rule.name,
                %restaurant_type,
                %bucket,
                employees_per_location,
                "tier rule matched"
            );
            return (rule.outcome)(restaurant_type);
        }
    }
    unreachable!("decision table ends in a catch-all rule");
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_TYPES: &[RestaurantType] = &[
        RestaurantType::Fsr,
        RestaurantType::Qsr,
        RestaurantType::FastCasual,
        RestaurantType::CafeCoffee,
        RestaurantType::Unknown,
    ];

    const ALL_BUCKETS: &[LocationBucket] = &[
        LocationBucket::One,
        LocationBucket::TwoToFive,
        LocationBucket::SixToFifteen,
        LocationBucket::SixteenPlus,
    ];

    #[test]
    fn test_tier1_fsr_scale() {
        let t = score(RestaurantType::Fsr, LocationBucket::TwoToFive, 30);
        assert_eq!(t.tier, Tier::Tier1);
        assert_eq!(t.reason, "FSR Scale: 2-5 locations, Full-Service, 30+ employees/loc");
    }

    #[test]
    fn test_tier1_tier2_cutoff_at_30() {
        // 29 employees at 2-5 FSR is Tier 2, 30 is the exact Tier 1 cutoff
        assert_eq!(
            score(RestaurantType::Fsr, LocationBucket::TwoToFive, 29).tier,
            Tier::Tier2
        );
        assert_eq!(
            score(RestaurantType::Fsr, LocationBucket::TwoToFive, 30).tier,
            Tier::Tier1
        );
    }

    #[test]
    fn test_tier2_non_fsr_at_30_plus() {
        // 30+ employees at 2-5 without FSR falls past both Tier 1 and Tier 2
        // bounds into the catch-all
        let t = score(RestaurantType::Qsr, LocationBucket::TwoToFive, 35);
        assert_eq!(t.tier, Tier::NotAFit);
        assert_eq!(t.reason, "Does not meet tier criteria");
    }

    #[test]
    fn test_single_location_boundary_at_15() {
        assert_eq!(
            score(RestaurantType::Unknown, LocationBucket::One, 14).tier,
            Tier::NotAFit
        );
        let t = score(RestaurantType::Unknown, LocationBucket::One, 15);
        assert_eq!(t.tier, Tier::Tier3);
        assert_eq!(t.reason, "Single Loc: 1 location, Unknown, 15+ employees/loc");
    }

    #[test]
    fn test_sixteen_plus_always_not_a_fit() {
        for &rt in ALL_TYPES {
            for emp in [0, 15, 30, 100] {
                let t = score(rt, LocationBucket::SixteenPlus, emp);
                assert_eq!(t.tier, Tier::NotAFit);
                assert_eq!(t.reason, "Groups with over 15 corporate stores");
            }
        }
    }

    #[test]
    fn test_tier4_franchise_justifications() {
        assert_eq!(
            score(RestaurantType::Qsr, LocationBucket::SixToFifteen, 20).reason,
            "Franchise Multi-Loc: 6-15 locations, QSR"
        );
        assert_eq!(
            score(RestaurantType::Fsr, LocationBucket::SixToFifteen, 20).reason,
            "Franchise Multi-Loc: 6-15 locations, low customization group"
        );
    }

    #[test]
    fn test_understaffed_multi_location() {
        let t = score(RestaurantType::Fsr, LocationBucket::TwoToFive, 11);
        assert_eq!(t.tier, Tier::NotAFit);
        assert_eq!(
            t.reason,
            "Multi-location but fewer than 15 employees per location"
        );
    }

    #[test]
    fn test_table_is_total_and_deterministic() {
        // Every combination reaches a terminal tier, and scoring twice gives
        // the identical tier and justification string.
        for &rt in ALL_TYPES {
            for &bucket in ALL_BUCKETS {
                for emp in 0..=60 {
                    let first = score(rt, bucket, emp);
                    let second = score(rt, bucket, emp);
                    assert_eq!(first, second, "{:?}/{:?}/{}", rt, bucket, emp);
                    assert!(!first.reason.is_empty());
                }
            }
        }
    }
}

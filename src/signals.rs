//! Keyword and pattern matchers over free-text trial fields.
//!
//! These are cheap, always-run heuristics over company name, website and
//! notes. Matching is plain case-insensitive substring search with no word
//! boundaries, which trades precision for recall: "food" matches
//! "Foodlogistics Inc" and will flag it as a restaurant. Callers must treat
//! every signal here as a lower-confidence prior than web-observed evidence.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::record::{LocationBucket, RestaurantType};

/// Cuisine/venue nouns that mark a company as a restaurant.
const RESTAURANT_KEYWORDS: &[&str] = &[
    "restaurant",
    "cafe",
    "coffee",
    "bar",
    "grill",
    "bistro",
    "eatery",
    "kitchen",
    "diner",
    "pizzeria",
    "burger",
    "taco",
    "sushi",
    "bbq",
    "steakhouse",
    "brewery",
    "pub",
    "tavern",
    "cantina",
    "food",
    "dining",
    "sandwich shop",
    "bites",
];

const FSR_INDICATORS: &[&str] = &[
    "fine dining",
    "full service",
    "steakhouse",
    "upscale",
    "casual dining",
    "sit down",
    "table service",
    "bistro",
    "trattoria",
    "brasserie",
    "italian",
    "seafood",
    "family-owned restaurant",
    "grill",
];

const QSR_INDICATORS: &[&str] = &[
    "quick service",
    "fast food",
    "qsr",
    "counter service",
    "drive-thru",
    "drive through",
    "fast casual",
    "sandwich",
    "burger",
    "pizza chain",
];

/// Words that suggest a multi-unit operation without stating a count.
const MULTI_LOCATION_WORDS: &[&str] = &["chain", "franchise", "group", "multiple locations"];

/// Explicit count patterns, tried in order; the first pattern that matches
/// anywhere in the text wins.
static LOCATION_COUNT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(\d+)\s*locations?",
        r"(\d+)\s*stores?",
        r"(\d+)\s*restaurants?",
        r"(\d+)\s*sites?",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("location count pattern must compile"))
    .collect()
});

/// "<n> employees per location" phrasings, highest-priority employee signal.
static EMPLOYEES_PER_LOCATION_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(\d+)\s*(?:staff|employees?)\s*per\s*location",
        r"(\d+)\s*(?:staff|employees?)/loc",
        r"(\d+)\s*(?:staff|employees?)\s*per\s*loc",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("per-location employee pattern must compile"))
    .collect()
});

/// A bare total headcount ("40 employees", "25 staff").
static TOTAL_EMPLOYEES_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)\s*(?:employees?|staff)").expect("employee pattern must compile"));

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text.contains(k))
}

fn first_capture(patterns: &[Regex], text: &str) -> Option<u32> {
    patterns
        .iter()
        .find_map(|p| p.captures(text))
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Whether the company looks like a restaurant at all, from its name and
/// website alone.
pub fn is_restaurant(company_name: &str, website: Option<&str>) -> bool {
    let mut text = company_name.to_lowercase();
    if let Some(site) = website {
        text.push(' ');
        text.push_str(&site.to_lowercase());
    }
    contains_any(&text, RESTAURANT_KEYWORDS)
}

/// Classify the service model from name and notes. Indicator sets overlap
/// ("fast casual" is also a QSR indicator); precedence resolves ties.
pub fn classify_type(company_name: &str, notes: &str) -> RestaurantType {
    let text = format!("{} {}", company_name, notes).to_lowercase();

    if contains_any(&text, FSR_INDICATORS) {
        RestaurantType::Fsr
    } else if contains_any(&text, QSR_INDICATORS) {
        RestaurantType::Qsr
    } else if text.contains("fast casual") || text.contains("fast-casual") {
        RestaurantType::FastCasual
    } else if text.contains("cafe") || text.contains("coffee") {
        RestaurantType::CafeCoffee
    } else {
        RestaurantType::Unknown
    }
}

/// Estimate the location bucket from free text.
///
/// An explicit "<n> locations" style count wins; otherwise chain/franchise
/// wording defaults to SixToFifteen (a deliberately conservative guess for
/// multi-unit operators), and everything else defaults to One.
pub fn estimate_location_bucket(company_name: &str, notes: &str) -> LocationBucket {
    let text = format!("{} {}", company_name, notes).to_lowercase();

    if let Some(count) = first_capture(&LOCATION_COUNT_PATTERNS, &text) {
        return LocationBucket::from_count(count);
    }

    if contains_any(&text, MULTI_LOCATION_WORDS) {
        return LocationBucket::SixToFifteen;
    }

    LocationBucket::One
}

/// Per-bucket divisor for converting a declared total headcount into a
/// per-location figure. SixteenPlus has no divisor; a total for a group that
/// size tells us nothing per-unit, so it falls through to the type default.
fn bucket_divisor(bucket: LocationBucket) -> Option<u32> {
    match bucket {
        LocationBucket::One => Some(1),
        LocationBucket::TwoToFive => Some(3),
        LocationBucket::SixToFifteen => Some(10),
        LocationBucket::SixteenPlus => None,
    }
}

fn type_default(restaurant_type: RestaurantType) -> u32 {
    match restaurant_type {
        RestaurantType::Fsr => 35,
        RestaurantType::Qsr => 20,
        RestaurantType::FastCasual => 25,
        RestaurantType::CafeCoffee | RestaurantType::Unknown => 20,
    }
}

/// Estimate employees per location, in priority order: explicit per-location
/// phrasing, then total headcount divided by the bucket divisor, then a
/// type-based default. The divisors and defaults are coarse calibration
/// constants, not derived from data.
pub fn estimate_employees_per_location(
    restaurant_type: RestaurantType,
    bucket: LocationBucket,
    notes: &str,
) -> u32 {
    let text = notes.to_lowercase();

    if let Some(per_location) = first_capture(&EMPLOYEES_PER_LOCATION_PATTERNS, &text) {
        return per_location;
    }

    if let Some(caps) = TOTAL_EMPLOYEES_REGEX.captures(&text) {
        if let Ok(total) = caps[1].parse::<u32>() {
            if let Some(divisor) = bucket_divisor(bucket) {
                return total / divisor;
            }
        }
    }

    type_default(restaurant_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_restaurant_by_name() {
        assert!(is_restaurant("Tony's Pizzeria", None));
        assert!(is_restaurant("The Rusty Tavern", None));
        assert!(is_restaurant("Blue Bottle Coffee", None));
        assert!(!is_restaurant("Acme Software", None));
    }

    #[test]
    fn test_is_restaurant_by_website() {
        assert!(is_restaurant("Smith Holdings", Some("smithsburgers.com")));
        assert!(!is_restaurant("Smith Holdings", Some("smith-holdings.com")));
    }

    #[test]
    fn test_is_restaurant_substring_false_positive() {
        // Substring matching is deliberate; "food" inside "Foodlogistics"
        // fires even though the company is not a restaurant.
        assert!(is_restaurant("Foodlogistics Inc", None));
    }

    #[test]
    fn test_classify_type_precedence() {
        assert_eq!(classify_type("Harbor Seafood House", ""), RestaurantType::Fsr);
        assert_eq!(classify_type("Quick Bite", "drive-thru window"), RestaurantType::Qsr);
        // "fast casual" appears in the QSR vocabulary too; QSR wins by order.
        assert_eq!(classify_type("Bowl Co", "fast casual concept"), RestaurantType::Qsr);
        assert_eq!(classify_type("Morning Cafe", ""), RestaurantType::CafeCoffee);
        assert_eq!(classify_type("Tony's Pizzeria", ""), RestaurantType::Unknown);
    }

    #[test]
    fn test_estimate_location_bucket_explicit_count() {
        assert_eq!(
            estimate_location_bucket("Acme Diner", "we run 3 locations downtown"),
            LocationBucket::TwoToFive
        );
        assert_eq!(
            estimate_location_bucket("Acme Diner", "12 stores across the state"),
            LocationBucket::SixToFifteen
        );
        assert_eq!(
            estimate_location_bucket("Acme Diner", "30 restaurants nationwide"),
            LocationBucket::SixteenPlus
        );
    }

    #[test]
    fn test_estimate_location_bucket_chain_wording() {
        assert_eq!(
            estimate_location_bucket("Burger Franchise Group", ""),
            LocationBucket::SixToFifteen
        );
        assert_eq!(
            estimate_location_bucket("Corner Diner", "multiple locations planned"),
            LocationBucket::SixToFifteen
        );
    }

    #[test]
    fn test_estimate_location_bucket_default_single() {
        assert_eq!(estimate_location_bucket("Corner Diner", ""), LocationBucket::One);
    }

    #[test]
    fn test_employees_per_location_explicit_phrasing_wins() {
        assert_eq!(
            estimate_employees_per_location(
                RestaurantType::Fsr,
                LocationBucket::TwoToFive,
                "about 22 staff per location, 90 employees total",
            ),
            22
        );
    }

    #[test]
    fn test_employees_total_divided_by_bucket() {
        assert_eq!(
            estimate_employees_per_location(RestaurantType::Unknown, LocationBucket::One, "40 employees"),
            40
        );
        // 35 / 3 = 11, the Tony's Pizzeria scenario
        assert_eq!(
            estimate_employees_per_location(
                RestaurantType::Unknown,
                LocationBucket::TwoToFive,
                "35 employees",
            ),
            11
        );
        assert_eq!(
            estimate_employees_per_location(
                RestaurantType::Unknown,
                LocationBucket::SixToFifteen,
                "120 staff",
            ),
            12
        );
    }

    #[test]
    fn test_employees_sixteen_plus_ignores_total() {
        // No divisor for 16+; a declared total falls through to the type default.
        assert_eq!(
            estimate_employees_per_location(
                RestaurantType::Qsr,
                LocationBucket::SixteenPlus,
                "800 employees",
            ),
            20
        );
    }

    #[test]
    fn test_employees_type_defaults() {
        assert_eq!(
            estimate_employees_per_location(RestaurantType::Fsr, LocationBucket::TwoToFive, ""),
            35
        );
        assert_eq!(
            estimate_employees_per_location(RestaurantType::Qsr, LocationBucket::TwoToFive, ""),
            20
        );
        assert_eq!(
            estimate_employees_per_location(RestaurantType::FastCasual, LocationBucket::TwoToFive, ""),
            25
        );
        assert_eq!(
            estimate_employees_per_location(RestaurantType::Unknown, LocationBucket::TwoToFive, ""),
            20
        );
    }
}

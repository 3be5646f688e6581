//! Research-priority scoring: which qualified trials are worth the network
//! cost (or the manual effort) of full research.
//!
//! Produces a 0-100 score from declared data alone, so it runs before any
//! fetching. Weights favor the higher tiers and records whose notes carry
//! concrete operational detail.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::record::{QualifiedTrial, RestaurantType, Tier};

/// Consumer mail providers; anything else counts as a professional domain.
const FREEMAIL_DOMAINS: &[&str] = &[
    "gmail.com",
    "yahoo.com",
    "aol.com",
    "outlook.com",
    "hotmail.com",
];

static EMPLOYEE_COUNT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)\s*employees").expect("employee pattern must compile"));

fn tier_points(tier: Tier) -> u32 {
    match tier {
        Tier::Tier1 => 40,
        Tier::Tier2 => 35,
        Tier::Tier3 => 20,
        Tier::Tier4 => 10,
        Tier::NotAFit => 0,
    }
}

fn is_professional_email(email: &str) -> bool {
    email
        .split_once('@')
        .map(|(_, domain)| {
            let domain = domain.to_lowercase();
            !FREEMAIL_DOMAINS.contains(&domain.as_str())
        })
        .unwrap_or(false)
}

/// Score one qualified trial for research priority.
pub fn research_priority(qualified: &QualifiedTrial, email: Option<&str>) -> u32 {
    let mut score = tier_points(qualified.tier.tier);
    let notes = &qualified.record.notes;

    // Multi-location operators are worth more research effort
    if qualified
        .signals
        .map(|s| s.location_bucket.lower_bound() >= 2)
        .unwrap_or(false)
    {
        score += 15;
    }

    if email.map(is_professional_email).unwrap_or(false) {
        score += 10;
    }

    // A named POS system in the notes means a real operation
    if notes.contains("POS:") && !notes.contains("POS: Other") && !notes.contains("POS: None") {
        score += 5;
    }

    // Declared headcount bands from the signup form
    if notes.contains("31 To 50") || notes.contains("51 Plus") {
        score += 10;
    }

    if EMPLOYEE_COUNT_REGEX
        .captures(notes)
        .and_then(|caps| caps[1].parse::<u32>().ok())
        .map(|n| n > 0)
        .unwrap_or(false)
    {
        score += 20;
    }

    if qualified
        .signals
        .map(|s| s.restaurant_type != RestaurantType::Unknown)
        .unwrap_or(false)
    {
        score += 5;
    }

    score
}

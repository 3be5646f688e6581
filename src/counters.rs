//! Location and job-posting counters over a parsed page.
//!
//! Each counter tries a structured heuristic first (block elements whose
//! class attribute matches a vocabulary regex) and falls back to text
//! patterns only when the structured pass finds nothing. A return of 0
//! means either "the page really has none" or "the page structure was not
//! recognized"; callers cannot tell the two cases apart.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::page::ParsedPage;

static LOCATION_CLASS_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)location|store|restaurant").expect("location class pattern must compile")
});

static JOB_CLASS_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)job|position|opening|career").expect("job class pattern must compile")
});

static ADDRESS_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)\d+\s+[\w\s]+(?:Street|St|Avenue|Ave|Road|Rd|Boulevard|Blvd|Drive|Dr|Lane|Ln|Way)",
        // "123 Main Street" shape; case-insensitive like the class patterns
        r"(?i)\d+\s+[A-Z][a-z]+\s+[A-Z][a-z]+",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("address pattern must compile"))
    .collect()
});

static APPLY_HREF_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)apply|job|position").expect("apply href pattern must compile"));

/// Count locations listed on a page.
pub fn count_locations(page: &ParsedPage) -> u32 {
    let structured = page
        .block_classes
        .iter()
        .filter(|class| LOCATION_CLASS_REGEX.is_match(class))
        .count();

    if structured > 0 {
        return structured as u32;
    }

    // Fall back to counting unique address-shaped strings in the page text
    let mut addresses: HashSet<&str> = HashSet::new();
    for pattern in ADDRESS_PATTERNS.iter() {
        for m in pattern.find_iter(&page.text) {
            addresses.insert(m.as_str());
        }
    }
    addresses.len() as u32
}

/// Count open job postings on a page.
pub fn count_job_postings(page: &ParsedPage) -> u32 {
    let structured = page
        .block_classes
        .iter()
        .filter(|class| JOB_CLASS_REGEX.is_match(class))
        .count();

    if structured > 0 {
        return structured as u32;
    }

    page.anchors
        .iter()
        .filter(|anchor| APPLY_HREF_REGEX.is_match(&anchor.href))
        .count() as u32
}

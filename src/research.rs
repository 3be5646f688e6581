//! Per-record pipeline: declared-data qualification, then evidence-gathering
//! research against the live website.
//!
//! Research is fail-soft at every stage. A record that cannot be researched
//! ends as explicitly skipped (with the reason in its status) or partially
//! researched (with notes saying which stages ran); it never aborts the
//! batch.

use tracing::debug;

use crate::confidence;
use crate::counters;
use crate::fetch::PageFetcher;
use crate::page::{self, ParsedPage};
use crate::profile;
use crate::reconcile;
use crate::record::{
    DeclaredSignals, LocationBucket, QualifiedTrial, ResearchResult, ResearchStatus, Tier,
    TierAssignment, TrialRecord,
};
use crate::signals;
use crate::tier;

/// Company names that are throwaway signup placeholders, not businesses.
const TEST_ACCOUNT_NAME: &str = "your restaurant";

/// Run the declared-data-only qualification pass over one record.
pub fn qualify(record: &TrialRecord) -> QualifiedTrial {
    let is_restaurant = signals::is_restaurant(&record.company_name, record.website.as_deref());

    if !is_restaurant {
        return QualifiedTrial {
            record: record.clone(),
            is_restaurant: false,
            signals: None,
            tier: TierAssignment::new(Tier::NotAFit, "Non-restaurant business"),
        };
    }

    let restaurant_type = signals::classify_type(&record.company_name, &record.notes);

    // A parseable declared bucket beats the free-text estimate
    let location_bucket = LocationBucket::parse(&record.declared_locations)
        .unwrap_or_else(|| signals::estimate_location_bucket(&record.company_name, &record.notes));

    let employees_per_location =
        signals::estimate_employees_per_location(restaurant_type, location_bucket, &record.notes);

    let tier = tier::score(restaurant_type, location_bucket, employees_per_location);

    QualifiedTrial {
        record: record.clone(),
        is_restaurant: true,
        signals: Some(DeclaredSignals {
            restaurant_type,
            location_bucket,
            employees_per_location,
        }),
        tier,
    }
}

/// Fetch a discovered page and run a counter over it. A fetch failure counts
/// as zero, same as an unrecognized page.
async fn count_on_page(
    fetcher: &dyn PageFetcher,
    url: &str,
    counter: fn(&ParsedPage) -> u32,
) -> u32 {
    match fetcher.fetch(url).await {
        Ok(html) => counter(&page::parse(&html)),
        Err(e) => {
            debug!("Page fetch failed for {}: {}", url, e);
            0
        }
    }
}

/// Research one qualified trial: profile the website, count locations and
/// job postings, reconcile against declared data, and score confidence.
pub async fn research_trial(fetcher: &dyn PageFetcher, qualified: &QualifiedTrial) -> ResearchResult {
    let record = &qualified.record;
    let mut result = ResearchResult::new(record, Some(qualified.tier.tier));

    if !qualified.is_restaurant {
        result.status = ResearchStatus::Skipped {
            reason: "Not a restaurant".to_string(),
        };
        result.notes.push("Not identified as restaurant".to_string());
        return confidence::finalize(result);
    }

    if record.company_name.to_lowercase() == TEST_ACCOUNT_NAME {
        result.status = ResearchStatus::Skipped {
            reason: "Test account".to_string(),
        };
        result.notes.push("Generic test account name".to_string());
        return confidence::finalize(result);
    }

    let Some(website) = record.website.clone() else {
        result
            .notes
            .push("No website provided in trial data".to_string());
        return confidence::finalize(result);
    };

    let profile = profile::profile_website(fetcher, &website).await;
    result.website_accessible = profile.website_accessible;
    result.has_locations_page = profile.locations_url.is_some();
    result.has_careers_page = profile.careers_url.is_some();

    if !profile.website_accessible {
        result.notes.push("Website not accessible".to_string());
        return confidence::finalize(result);
    }

    if let Some(url) = &profile.locations_url {
        let found = count_on_page(fetcher, url, counters::count_locations).await;
        result.actual_locations_found = found;
        result
            .notes
            .push(format!("Found {} locations on website", found));
    }

    if let Some(url) = &profile.careers_url {
        let found = count_on_page(fetcher, url, counters::count_job_postings).await;
        result.job_postings_count = found;
        result.notes.push(format!("Found {} job postings", found));
    }

    if let Some(parent) = profile.parent_company {
        result.notes.push(format!("Parent company: {}", parent));
        result.parent_company = Some(parent);
    }

    result.locations_match =
        reconcile::match_quality(&result.declared_locations, result.actual_locations_found);

    confidence::finalize(result)
}

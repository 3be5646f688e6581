//! Website profiling: homepage fetch, locations/careers page discovery, and
//! parent-company detection from footer copyright text.
//!
//! Profiling fails soft. Any fetch error means `website_accessible = false`
//! with all discovery fields empty; it never propagates to the caller.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;
use url::Url;

use crate::fetch::PageFetcher;
use crate::page::{self, Anchor};

/// Link-text keywords that mark a locations page.
const LOCATION_LINK_KEYWORDS: &[&str] =
    &["location", "locations", "our restaurants", "find us", "store locator"];

/// Link-text keywords that mark a careers page.
const CAREERS_LINK_KEYWORDS: &[&str] =
    &["career", "careers", "jobs", "join us", "hiring", "employment"];

/// Copyright-style parent company mention: © <year> <Capitalized name ending
/// in a group suffix>.
static COPYRIGHT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"©\s*\d{4}\s+([A-Z][A-Za-z\s&]+(?:LLC|Inc|Group|Hospitality))")
        .expect("copyright pattern must compile")
});

/// What one homepage fetch revealed about a website.
#[derive(Debug, Clone, Default)]
pub struct WebsiteProfile {
    pub website_accessible: bool,
    pub locations_url: Option<String>,
    pub careers_url: Option<String>,
    pub parent_company: Option<String>,
}

/// Prepend https:// when the declared website has no scheme.
pub fn normalize_seed_url(website: &str) -> String {
    if website.starts_with("http") {
        website.to_string()
    } else {
        format!("https://{}", website)
    }
}

/// Resolve an anchor href against the seed URL. Absolute hrefs pass through;
/// relative ones resolve against the seed's origin.
fn resolve_href(seed: &str, href: &str) -> String {
    match Url::parse(seed).and_then(|base| base.join(href)) {
        Ok(resolved) => resolved.to_string(),
        Err(_) => format!(
            "{}/{}",
            seed.trim_end_matches('/'),
            href.trim_start_matches('/')
        ),
    }
}

/// The first anchor whose visible text contains any of the keywords.
/// First-match is a simplicity tradeoff: a nav bar's "Locations" link beats
/// a better candidate further down the page.
fn first_anchor_matching<'a>(anchors: &'a [Anchor], keywords: &[&str]) -> Option<&'a Anchor> {
    anchors.iter().find(|anchor| {
        let text = anchor.text.to_lowercase();
        keywords.iter().any(|k| text.contains(k))
    })
}

/// Fetch the homepage once and discover locations page, careers page, and
/// any parent-company mention.
pub async fn profile_website(fetcher: &dyn PageFetcher, website: &str) -> WebsiteProfile {
    let seed = normalize_seed_url(website);
    debug!("Profiling website {}", seed);

    let html = match fetcher.fetch(&seed).await {
        Ok(body) => body,
        Err(e) => {
            debug!("Homepage fetch failed for {}: {}", seed, e);
            return WebsiteProfile::default();
        }
    };

    let parsed = page::parse(&html);

    let locations_url = first_anchor_matching(&parsed.anchors, LOCATION_LINK_KEYWORDS)
        .map(|anchor| resolve_href(&seed, &anchor.href));

    let careers_url = first_anchor_matching(&parsed.anchors, CAREERS_LINK_KEYWORDS)
        .map(|anchor| resolve_href(&seed, &anchor.href));

    // Absence of a copyright mention is a missing signal, not an error
    let parent_company = parsed.footer_text.as_deref().and_then(|footer| {
        COPYRIGHT_REGEX
            .captures(footer)
            .map(|caps| caps[1].trim().to_string())
    });

    WebsiteProfile {
        website_accessible: true,
        locations_url,
        careers_url,
        parent_company,
    }
}

//! Shared test fixtures: a scripted page fetcher and canned HTML pages.

use async_trait::async_trait;
use std::collections::HashMap;

use trialscout::fetch::{FetchError, PageFetcher};
use trialscout::record::TrialRecord;

/// Fetcher that serves canned responses per URL. Unknown URLs fail with a
/// connection error, same as a dead host.
pub struct StubFetcher {
    pages: HashMap<String, Result<String, FetchError>>,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self {
            pages: HashMap::new(),
        }
    }

    pub fn page(mut self, url: &str, body: &str) -> Self {
        self.pages.insert(url.to_string(), Ok(body.to_string()));
        self
    }

    pub fn failing(mut self, url: &str, err: FetchError) -> Self {
        self.pages.insert(url.to_string(), Err(err));
        self
    }
}

#[async_trait]
impl PageFetcher for StubFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.pages
            .get(url)
            .cloned()
            .unwrap_or(Err(FetchError::Connection("unknown url".to_string())))
    }
}

pub fn record(name: &str, website: Option<&str>, locations: &str, notes: &str) -> TrialRecord {
    TrialRecord {
        company_name: name.to_string(),
        website: website.map(|s| s.to_string()),
        declared_locations: locations.to_string(),
        declared_employees: String::new(),
        notes: notes.to_string(),
        raw: Vec::new(),
    }
}

pub const HOMEPAGE_WITH_EVERYTHING: &str = r#"<html><body>
    <nav>
        <a href="/menu">Menu</a>
        <a href="/locations">Our Locations</a>
        <a href="/careers">Join Us</a>
    </nav>
    <footer>© 2025 Harbor Hospitality Group. All rights reserved.</footer>
</body></html>"#;

pub fn locations_page(count: usize) -> String {
    let cards: String = (0..count)
        .map(|i| format!("<div class=\"location-card\">Location {}</div>\n", i + 1))
        .collect();
    format!("<html><body>{}</body></html>", cards)
}

pub fn careers_page(count: usize) -> String {
    let openings: String = (0..count)
        .map(|i| format!("<li class=\"job-opening\">Opening {}</li>\n", i + 1))
        .collect();
    format!("<html><body><ul>{}</ul></body></html>", openings)
}

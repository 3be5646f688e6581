//! Page fetching boundary: typed fetch failures, a process-wide request
//! cooldown gate, and the reqwest-backed fetcher the pipeline injects.
//!
//! Every fetch in the program goes through one `SharedCooldownGate`: the
//! shared resource being protected is the scraping target's tolerance for
//! request volume, so the interval applies regardless of host. The per-URL
//! cache is strictly an optimization; correctness never depends on a hit.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};
use tracing::debug;

use crate::config::{HttpConfig, ResearchConfig};

/// Why a page could not be fetched. The core treats every kind identically
/// as "unreachable"; the distinction exists for logs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connection(String),

    #[error("HTTP status {0}")]
    HttpStatus(u16),

    #[error("{0}")]
    Other(String),
}

/// Capability for retrieving a page body. Implemented by `HttpFetcher` in
/// production and by scripted stubs in tests.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Minimum-interval gate: at most one acquisition per cooldown window,
/// process-wide, with no burst allowance. An interval of zero disables the
/// gate entirely.
#[derive(Debug)]
pub struct CooldownGate {
    interval: Duration,
    next_allowed: Option<Instant>,
}

impl CooldownGate {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_allowed: None,
        }
    }

    /// Try to pass the gate, returning the remaining wait if the window has
    /// not elapsed yet.
    pub fn try_acquire(&mut self) -> Option<Duration> {
        if self.interval.is_zero() {
            return None;
        }

        let now = Instant::now();
        match self.next_allowed {
            Some(next) if now < next => Some(next - now),
            _ => {
                self.next_allowed = Some(now + self.interval);
                None
            }
        }
    }

    /// Pass the gate, sleeping as needed. Re-checks after each sleep since
    /// another task may have consumed the window in the meantime.
    pub async fn acquire(&mut self) {
        loop {
            match self.try_acquire() {
                None => return,
                Some(wait) => {
                    debug!("Cooldown gate waiting {:?} before next request", wait);
                    sleep(wait).await;
                }
            }
        }
    }
}

/// Thread-safe cooldown gate shared by all fetchers in the process.
#[derive(Debug, Clone)]
pub struct SharedCooldownGate {
    inner: Arc<Mutex<CooldownGate>>,
}

impl SharedCooldownGate {
    pub fn new(interval: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(CooldownGate::new(interval))),
        }
    }

    pub async fn acquire(&self) {
        let mut gate = self.inner.lock().await;
        gate.acquire().await;
    }
}

/// Normalize a URL for use as a cache key. Parsing through `url` lowercases
/// the host and strips default ports; unparseable input falls back to the
/// raw string.
pub fn normalize_url(url: &str) -> String {
    match url::Url::parse(url) {
        Ok(parsed) => parsed.to_string(),
        Err(_) => url.to_string(),
    }
}

/// Production fetcher: reqwest client with configured user-agent and
/// timeout, serialized through the shared cooldown gate.
pub struct HttpFetcher {
    client: reqwest::Client,
    gate: SharedCooldownGate,
    cache: Option<Mutex<HashMap<String, Result<String, FetchError>>>>,
}

impl HttpFetcher {
    pub fn new(http: &HttpConfig, research: &ResearchConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(http.request_timeout_secs))
            .user_agent(http.user_agent.clone())
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self {
            client,
            gate: SharedCooldownGate::new(Duration::from_millis(research.request_cooldown_ms)),
            cache: research.cache_enabled.then(|| Mutex::new(HashMap::new())),
        })
    }

    fn classify(err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout
        } else if err.is_connect() {
            FetchError::Connection(err.to_string())
        } else {
            FetchError::Other(err.to_string())
        }
    }

    async fn fetch_uncached(&self, url: &str) -> Result<String, FetchError> {
        self.gate.acquire().await;
        debug!("Fetching {}", url);

        let response = self.client.get(url).send().await.map_err(Self::classify)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus(status.as_u16()));
        }

        response.text().await.map_err(Self::classify)
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let key = normalize_url(url);

        if let Some(cache) = &self.cache {
            if let Some(hit) = cache.lock().await.get(&key) {
                debug!("Cache hit for {}", key);
                return hit.clone();
            }
        }

        let result = self.fetch_uncached(url).await;

        if let Some(cache) = &self.cache {
            cache.lock().await.insert(key, result.clone());
        }

        result
    }
}

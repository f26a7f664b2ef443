//! Feed orchestration: endpoint chains, caching, and refresh coordination.

use std::sync::Arc;
use std::time::Duration;

use crate::cache::{CacheMode, CacheStore};
use crate::domain::{EarthquakeRecord, FeedSource};
use crate::feeds::{self, usgs, wolfx};
use crate::fetch::{sequential_requests, Candidate, FetchError};
use crate::http_client::{HttpClient, ReqwestHttpClient};
use crate::retry::RetryPolicy;

const FEED_CACHE_TTL: Duration = Duration::from_secs(120);

const CENC_CACHE_KEY: &str = "feed:cenc";
const USGS_CACHE_KEY: &str = "feed:usgs";

/// Ordered endpoint chains for each feed, proxy candidates first when
/// configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEndpoints {
    cenc: Vec<Candidate>,
    usgs: Vec<Candidate>,
}

impl FeedEndpoints {
    /// Direct upstream endpoints only.
    pub fn direct_only() -> Self {
        Self {
            cenc: vec![direct_candidate(wolfx::DIRECT_URL)],
            usgs: vec![direct_candidate(usgs::DIRECT_URL)],
        }
    }

    /// Prefer a relay at `base` (e.g. `http://localhost:3001`), falling
    /// back to the direct upstreams when the relay is down.
    pub fn with_proxy_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            cenc: vec![
                Candidate::new(format!("{base}/api/wolfx")),
                direct_candidate(wolfx::DIRECT_URL),
            ],
            usgs: vec![
                Candidate::new(format!("{base}/api/usgs")),
                direct_candidate(usgs::DIRECT_URL),
            ],
        }
    }

    pub fn cenc_chain(&self) -> &[Candidate] {
        &self.cenc
    }

    pub fn usgs_chain(&self) -> &[Candidate] {
        &self.usgs
    }
}

impl Default for FeedEndpoints {
    fn default() -> Self {
        Self::direct_only()
    }
}

fn direct_candidate(url: &str) -> Candidate {
    Candidate::new(url).with_header("Accept", "application/json")
}

/// Result of one [`EarthquakeService::refresh_all`] pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RefreshOutcome {
    pub cenc: Vec<EarthquakeRecord>,
    pub usgs: Vec<EarthquakeRecord>,
    /// Fetch failures, at most one per feed. Parse failures are not listed
    /// here; they degrade to an empty batch.
    pub failures: Vec<(FeedSource, String)>,
}

/// Fetches, normalizes, and caches the two provider feeds.
///
/// Cloning is cheap and shares the cache and refresh gate.
#[derive(Clone)]
pub struct EarthquakeService {
    http: Arc<dyn HttpClient>,
    cache: CacheStore<Vec<EarthquakeRecord>>,
    policy: RetryPolicy,
    endpoints: FeedEndpoints,
    refresh_gate: Arc<tokio::sync::Mutex<()>>,
}

impl EarthquakeService {
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        Self {
            http,
            cache: CacheStore::new(FEED_CACHE_TTL),
            policy: RetryPolicy::default(),
            endpoints: FeedEndpoints::default(),
            refresh_gate: Arc::new(tokio::sync::Mutex::new(())),
        }
    }

    /// Service backed by the production reqwest transport.
    pub fn with_defaults() -> Self {
        Self::new(Arc::new(ReqwestHttpClient::new()))
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_endpoints(mut self, endpoints: FeedEndpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Disable result caching; every call hits the network.
    pub fn without_cache(mut self) -> Self {
        self.cache = CacheStore::disabled();
        self
    }

    /// Latest CENC events via the Wolfx feed, newest first.
    ///
    /// A payload that fetches but does not match any known schema degrades
    /// to an empty batch with a logged warning rather than an error, so a
    /// garbled feed cannot take down a polling consumer.
    ///
    /// # Errors
    ///
    /// [`FetchError::AllSourcesUnavailable`] when every endpoint in the
    /// chain fails.
    pub async fn cenc_events(&self, mode: CacheMode) -> Result<Vec<EarthquakeRecord>, FetchError> {
        self.feed_events(FeedSource::Cenc, CENC_CACHE_KEY, mode)
            .await
    }

    /// Latest USGS events, newest first. Same degradation contract as
    /// [`cenc_events`](Self::cenc_events).
    pub async fn usgs_events(&self, mode: CacheMode) -> Result<Vec<EarthquakeRecord>, FetchError> {
        self.feed_events(FeedSource::Usgs, USGS_CACHE_KEY, mode)
            .await
    }

    /// Fetch a windowed USGS query instead of the fixed summary feed.
    /// Bypasses the cache; parameterized queries are not worth keying.
    pub async fn usgs_query(
        &self,
        query: &usgs::UsgsQuery,
    ) -> Result<Vec<EarthquakeRecord>, FetchError> {
        let candidate = direct_candidate(&query.to_url());
        let raw = sequential_requests(&self.http, &[candidate], &self.policy).await?;
        Ok(self.parse_or_empty(FeedSource::Usgs, &raw))
    }

    async fn feed_events(
        &self,
        source: FeedSource,
        cache_key: &str,
        mode: CacheMode,
    ) -> Result<Vec<EarthquakeRecord>, FetchError> {
        if mode == CacheMode::Use {
            if let Some(cached) = self.cache.get(cache_key).await {
                tracing::debug!(feed = source.as_str(), "serving cached feed");
                return Ok(cached);
            }
        }

        let chain = match source {
            FeedSource::Cenc => self.endpoints.cenc_chain(),
            FeedSource::Usgs => self.endpoints.usgs_chain(),
        };

        let raw = sequential_requests(&self.http, chain, &self.policy).await?;
        let records = self.parse_or_empty(source, &raw);

        if mode != CacheMode::Bypass {
            self.cache
                .put(cache_key.to_string(), records.clone(), None)
                .await;
        }

        Ok(records)
    }

    fn parse_or_empty(&self, source: FeedSource, raw: &serde_json::Value) -> Vec<EarthquakeRecord> {
        match feeds::parse_provider_feed(raw) {
            Ok(records) => {
                tracing::debug!(
                    feed = source.as_str(),
                    count = records.len(),
                    "normalized feed payload"
                );
                records
            }
            Err(error) => {
                tracing::warn!(feed = source.as_str(), %error, "discarding garbled feed payload");
                Vec::new()
            }
        }
    }

    /// Refresh both feeds, forcing a network round trip.
    ///
    /// At most one refresh runs at a time; a call that arrives while
    /// another is in flight returns `None` immediately instead of queueing
    /// a redundant round trip. Per-feed failures are collected in the
    /// outcome, not returned as an error.
    pub async fn refresh_all(&self) -> Option<RefreshOutcome> {
        let Ok(_guard) = self.refresh_gate.try_lock() else {
            tracing::debug!("refresh already in flight; skipping");
            return None;
        };

        let mut outcome = RefreshOutcome::default();

        match self.cenc_events(CacheMode::Refresh).await {
            Ok(records) => outcome.cenc = records,
            Err(error) => outcome.failures.push((FeedSource::Cenc, error.to_string())),
        }
        match self.usgs_events(CacheMode::Refresh).await {
            Ok(records) => outcome.usgs = records,
            Err(error) => outcome.failures.push((FeedSource::Usgs, error.to_string())),
        }

        Some(outcome)
    }

    /// Seconds until the cached copy of `source` expires, if one exists.
    pub async fn cache_remaining(&self, source: FeedSource) -> Option<Duration> {
        let key = match source {
            FeedSource::Cenc => CENC_CACHE_KEY,
            FeedSource::Usgs => USGS_CACHE_KEY,
        };
        self.cache.remaining_ttl(key).await
    }

    pub async fn clear_cache(&self) {
        self.cache.clear().await;
    }
}

impl std::fmt::Debug for EarthquakeService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EarthquakeService")
            .field("policy", &self.policy)
            .field("endpoints", &self.endpoints)
            .finish_non_exhaustive()
    }
}

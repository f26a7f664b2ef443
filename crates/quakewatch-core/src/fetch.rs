//! Resilient fetch strategies over candidate feed endpoints.
//!
//! Three operations, layered:
//!
//! | Operation | Behavior |
//! |-----------|----------|
//! | [`fetch_with_retry`] | one endpoint, retried with backoff under a per-attempt timeout |
//! | [`sequential_requests`] | ordered fallback; candidate N+1 starts only after N's whole retry budget is spent |
//! | [`race_requests`] | all candidates concurrently; first success wins, losers are aborted |
//!
//! Network conditions never surface as panics or raw transport errors; every
//! failure is a structured [`FetchError`].

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tokio::task::JoinSet;

use crate::http_client::{HttpClient, HttpRequest};
use crate::retry::RetryPolicy;

/// One endpoint in a fallback chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub url: String,
    pub headers: BTreeMap<String, String>,
}

impl Candidate {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: BTreeMap::new(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.into().to_ascii_lowercase(), value.into());
        self
    }

    fn to_request(&self, timeout_ms: u64) -> HttpRequest {
        let mut request = HttpRequest::get(&self.url).with_timeout_ms(timeout_ms);
        for (name, value) in &self.headers {
            request = request.with_header(name.clone(), value.clone());
        }
        request
    }
}

/// Why a single candidate was given up on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFailure {
    pub url: String,
    pub reason: String,
}

/// Fetch-layer failures.
#[derive(Debug, Error)]
pub enum FetchError {
    /// One candidate exhausted its retry budget.
    #[error("request to {url} failed after {attempts} attempt(s): {message}")]
    RequestFailed {
        url: String,
        attempts: u32,
        message: String,
    },

    /// Every candidate in the chain failed.
    #[error("all data sources unavailable: {}", format_failures(.failures))]
    AllSourcesUnavailable { failures: Vec<SourceFailure> },
}

impl FetchError {
    /// Attempt count for a `RequestFailed`, 0 otherwise.
    pub fn attempts(&self) -> u32 {
        match self {
            Self::RequestFailed { attempts, .. } => *attempts,
            Self::AllSourcesUnavailable { .. } => 0,
        }
    }
}

fn format_failures(failures: &[SourceFailure]) -> String {
    if failures.is_empty() {
        return String::from("no candidates were configured");
    }
    failures
        .iter()
        .map(|f| format!("{}: {}", f.url, f.reason))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Fetch one candidate with retries, returning its parsed JSON body.
///
/// Each attempt runs under `policy.timeout_ms`; a transport error, non-2xx
/// status, or unparseable body consumes one attempt. Between attempts the
/// task sleeps for `policy.delay_for_attempt(attempt)`.
///
/// # Errors
///
/// [`FetchError::RequestFailed`] carrying the total attempt count and the
/// last underlying failure message.
pub async fn fetch_with_retry(
    client: &Arc<dyn HttpClient>,
    candidate: &Candidate,
    policy: &RetryPolicy,
) -> Result<Value, FetchError> {
    let mut last_message = String::new();

    for attempt in 0..=policy.max_retries {
        match client.execute(candidate.to_request(policy.timeout_ms)).await {
            Ok(response) if response.is_success() => {
                match serde_json::from_str::<Value>(&response.body) {
                    Ok(value) => return Ok(value),
                    Err(e) => {
                        last_message = format!("response body was not valid JSON: {e}");
                    }
                }
            }
            Ok(response) => {
                last_message = format!("HTTP {}", response.status);
            }
            Err(error) => {
                last_message = error.message().to_string();
            }
        }

        if attempt < policy.max_retries {
            let delay = policy.delay_for_attempt(attempt);
            tracing::debug!(
                url = %candidate.url,
                attempt = attempt + 1,
                delay_ms = delay.as_millis() as u64,
                reason = %last_message,
                "fetch attempt failed; backing off"
            );
            tokio::time::sleep(delay).await;
        }
    }

    Err(FetchError::RequestFailed {
        url: candidate.url.clone(),
        attempts: policy.max_retries + 1,
        message: last_message,
    })
}

/// Try each candidate in order, returning the first successful payload.
///
/// Strictly sequential: a candidate is attempted only after the previous
/// one has spent its entire retry budget. The cheapest resilience shape for
/// rate-limited public feeds, since it never amplifies request volume.
///
/// # Errors
///
/// [`FetchError::AllSourcesUnavailable`] aggregating each candidate's URL
/// and failure reason.
pub async fn sequential_requests(
    client: &Arc<dyn HttpClient>,
    candidates: &[Candidate],
    policy: &RetryPolicy,
) -> Result<Value, FetchError> {
    let mut failures = Vec::with_capacity(candidates.len());

    for candidate in candidates {
        match fetch_with_retry(client, candidate, policy).await {
            Ok(value) => return Ok(value),
            Err(error) => {
                tracing::warn!(url = %candidate.url, %error, "data source failed");
                failures.push(SourceFailure {
                    url: candidate.url.clone(),
                    reason: error.to_string(),
                });
            }
        }
    }

    Err(FetchError::AllSourcesUnavailable { failures })
}

/// Issue all candidates concurrently and resolve with the first success.
///
/// Losing requests are aborted once a winner resolves; callers must not
/// rely on losers never having completed upstream. Useful when latency
/// matters more than request volume.
///
/// # Errors
///
/// [`FetchError::AllSourcesUnavailable`] aggregating every candidate's
/// failure, in completion order.
pub async fn race_requests(
    client: &Arc<dyn HttpClient>,
    candidates: &[Candidate],
    policy: &RetryPolicy,
) -> Result<Value, FetchError> {
    let mut set = JoinSet::new();

    for candidate in candidates {
        let client = Arc::clone(client);
        let candidate = candidate.clone();
        let policy = policy.clone();
        set.spawn(async move {
            let result = fetch_with_retry(&client, &candidate, &policy).await;
            (candidate.url, result)
        });
    }

    let mut failures = Vec::with_capacity(candidates.len());

    while let Some(joined) = set.join_next().await {
        match joined {
            Ok((_, Ok(value))) => {
                set.abort_all();
                return Ok(value);
            }
            Ok((url, Err(error))) => {
                failures.push(SourceFailure {
                    url,
                    reason: error.to_string(),
                });
            }
            Err(join_error) => {
                failures.push(SourceFailure {
                    url: String::from("<task>"),
                    reason: join_error.to_string(),
                });
            }
        }
    }

    Err(FetchError::AllSourcesUnavailable { failures })
}

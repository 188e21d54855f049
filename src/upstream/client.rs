//! HTTP client for the dealership backend and the sentiment analyzer.
//!
//! # Responsibilities
//! - Build request URLs from the configured base URLs
//! - Issue GET/POST calls with a fixed per-call timeout
//! - Decode JSON bodies into typed records
//! - Turn every network-level failure into an `UpstreamError` (and log it)
//!
//! # Design Decisions
//! - One attempt per call, no retries
//! - Non-success HTTP statuses are failures, not data
//! - Callers always get a `Result`; nothing here panics on a bad upstream

use std::time::{Duration, Instant};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::config::UpstreamConfig;
use crate::observability::metrics;
use crate::upstream::query::{join_url, path_segment};
use crate::upstream::types::{
    Dealer, DealerLookup, NewReview, Review, SentimentResponse, UpstreamError, UpstreamResult,
};

const BACKEND: &str = "backend";
const SENTIMENT: &str = "sentiment";

/// Client for both external services.
///
/// Cheap to clone; the underlying connection pool is shared.
#[derive(Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    backend_url: String,
    sentiment_url: String,
    timeout_secs: u64,
}

impl UpstreamClient {
    /// Create a client from the upstream configuration.
    pub fn new(config: &UpstreamConfig) -> UpstreamResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .user_agent(concat!("dealer-reviews/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(UpstreamError::Client)?;

        // Endpoints start with '/', the analyzer path does not.
        let backend_url = config.backend_url.trim_end_matches('/').to_string();
        let mut sentiment_url = config.sentiment_analyzer_url.clone();
        if !sentiment_url.ends_with('/') {
            sentiment_url.push('/');
        }

        tracing::info!(
            backend_url = %backend_url,
            sentiment_url = %sentiment_url,
            timeout_secs = config.timeout_secs,
            "Upstream client initialized"
        );

        Ok(Self {
            http,
            backend_url,
            sentiment_url,
            timeout_secs: config.timeout_secs,
        })
    }

    /// GET `backend_url + endpoint` with optional query parameters and decode the JSON reply.
    pub async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> UpstreamResult<T> {
        let url = join_url(&self.backend_url, endpoint, params);
        tracing::debug!(url = %url, "GET from backend");
        self.execute(BACKEND, self.http.get(&url), url).await
    }

    /// Score a piece of text with the sentiment analyzer.
    pub async fn analyze_sentiment(&self, text: &str) -> UpstreamResult<SentimentResponse> {
        let url = format!("{}analyze/{}", self.sentiment_url, path_segment(text));
        tracing::debug!(url = %url, "GET from sentiment analyzer");
        self.execute(SENTIMENT, self.http.get(&url), url).await
    }

    /// Forward a review to the backend's insert endpoint.
    pub async fn post_review(&self, review: &NewReview) -> UpstreamResult<Value> {
        self.post_json("/insert_review", review).await
    }

    /// All dealers, or only those of `state`. "All" means no filter.
    pub async fn fetch_dealers(&self, state: &str) -> UpstreamResult<Vec<Dealer>> {
        self.get(&dealers_endpoint(state), &[]).await
    }

    /// A single dealer by id.
    pub async fn fetch_dealer(&self, dealer_id: u64) -> UpstreamResult<DealerLookup> {
        self.get(&format!("/fetchDealer/{}", dealer_id), &[]).await
    }

    /// Reviews of one dealer, in backend order.
    pub async fn fetch_reviews(&self, dealer_id: u64) -> UpstreamResult<Vec<Review>> {
        self.get(&format!("/fetchReviews/dealer/{}", dealer_id), &[]).await
    }

    async fn post_json<B: Serialize + ?Sized>(&self, endpoint: &str, body: &B) -> UpstreamResult<Value> {
        let url = format!("{}{}", self.backend_url, endpoint);
        tracing::debug!(url = %url, "POST to backend");
        self.execute(BACKEND, self.http.post(&url).json(body), url).await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        service: &'static str,
        request: reqwest::RequestBuilder,
        url: String,
    ) -> UpstreamResult<T> {
        let start = Instant::now();
        let result = self.send(request, &url).await;

        match &result {
            Ok(_) => metrics::record_upstream(service, "ok", start),
            Err(e) => {
                tracing::warn!(service, url = %url, error = %e, "Network exception occurred");
                metrics::record_upstream(service, e.kind(), start);
            }
        }

        result
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        url: &str,
    ) -> UpstreamResult<T> {
        let response = request.send().await.map_err(|e| self.transport_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| self.transport_error(url, e))?;

        serde_json::from_slice(&body).map_err(|e| UpstreamError::Decode {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }

    fn transport_error(&self, url: &str, source: reqwest::Error) -> UpstreamError {
        if source.is_timeout() {
            UpstreamError::Timeout {
                url: url.to_string(),
                secs: self.timeout_secs,
            }
        } else {
            UpstreamError::Transport {
                url: url.to_string(),
                source,
            }
        }
    }
}

impl std::fmt::Debug for UpstreamClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamClient")
            .field("backend_url", &self.backend_url)
            .field("sentiment_url", &self.sentiment_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Backend endpoint for a dealer listing.
pub fn dealers_endpoint(state: &str) -> String {
    if state.is_empty() || state == "All" {
        "/fetchDealers".to_string()
    } else {
        format!("/fetchDealers/{}", path_segment(state))
    }
}

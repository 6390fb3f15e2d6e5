//! Outbound HTTP transport for api.weather.gov.
//!
//! # Responsibilities
//! - Build the reqwest client (User-Agent, Accept, per-attempt timeout)
//! - Build upstream URLs with percent-encoded path segments
//! - Apply the retry policy around each GET
//!
//! Callers see one result per logical request; retries are invisible to them
//! apart from latency.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

use crate::config::UpstreamConfig;
use crate::nws::error::ForecastError;
use crate::observability::spans::TRACE_TARGET;
use crate::resilience::retries::{is_retryable_error, is_retryable_status};
use crate::resilience::RetryPolicy;

const GEO_JSON: &str = "application/geo+json";

#[derive(Debug, Error)]
pub enum ClientBuildError {
    #[error("invalid upstream base address: {0}")]
    BaseAddress(#[from] url::ParseError),
    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// HTTP client for the NWS API.
#[derive(Debug, Clone)]
pub struct NwsClient {
    http: reqwest::Client,
    base_address: String,
    retry: RetryPolicy,
}

impl NwsClient {
    pub fn new(config: &UpstreamConfig, retry: RetryPolicy) -> Result<Self, ClientBuildError> {
        let base = Url::parse(&config.base_address)?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GEO_JSON));

        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            http,
            base_address: base.as_str().trim_end_matches('/').to_string(),
            retry,
        })
    }

    /// `{base}/zones/forecast/{zone_id}/forecast`, with the zone id percent-encoded.
    pub fn forecast_url(&self, zone_id: &str) -> String {
        format!(
            "{}/zones/forecast/{}/forecast",
            self.base_address,
            urlencoding::encode(zone_id)
        )
    }

    /// GET `url` and decode the JSON body, retrying transient failures.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ForecastError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let outcome = self.http.get(url).send().await;

            let retryable = match &outcome {
                Ok(response) => is_retryable_status(response.status()),
                Err(e) => is_retryable_error(e),
            };
            if retryable {
                if let Some(delay) = self.retry.next_delay(attempt) {
                    tracing::warn!(
                        target: TRACE_TARGET,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        status = outcome.as_ref().ok().map(|r| r.status().as_u16()),
                        "Retrying upstream request"
                    );
                    drop(outcome);
                    tokio::time::sleep(delay).await;
                    continue;
                }
            }

            let response = outcome.map_err(|source| ForecastError::Transport {
                url: url.to_string(),
                source,
            })?;

            let status = response.status();
            if !status.is_success() {
                return Err(ForecastError::Upstream {
                    status,
                    url: url.to_string(),
                });
            }

            let body = response.bytes().await.map_err(|source| ForecastError::Transport {
                url: url.to_string(),
                source,
            })?;
            return serde_json::from_slice(&body).map_err(|source| ForecastError::Decode {
                url: url.to_string(),
                source,
            });
        }
    }
}

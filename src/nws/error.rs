use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a forecast lookup.
#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("zone id must not be empty")]
    InvalidZoneId,

    /// Injected failure; never reached the network.
    #[error("simulated failure on forecast request #{sequence}")]
    Simulated { sequence: u64 },

    #[error("upstream returned {status} for {url}")]
    Upstream { status: StatusCode, url: String },

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("could not decode forecast from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ForecastError {
    /// Upstream HTTP status, when the failure carries one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ForecastError::Upstream { status, .. } => Some(*status),
            ForecastError::Transport { source, .. } => source.status(),
            _ => None,
        }
    }

    /// True for failures originating upstream or injected in place of an upstream call.
    pub fn is_remote(&self) -> bool {
        !matches!(self, ForecastError::InvalidZoneId)
    }
}

//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses and value ranges (timeouts > 0, TTLs > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServiceConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;
use url::Url;

use crate::config::schema::ServiceConfig;
use crate::resilience::RetryPolicy;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field, e.g. `upstream.base_address`.
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }
    if config.listener.request_timeout_secs == 0 {
        errors.push(ValidationError::new("listener.request_timeout_secs", "must be greater than 0"));
    }

    match Url::parse(&config.upstream.base_address) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => errors.push(ValidationError::new(
            "upstream.base_address",
            format!("unsupported scheme '{}'", url.scheme()),
        )),
        Err(e) => errors.push(ValidationError::new("upstream.base_address", e.to_string())),
    }
    if config.upstream.user_agent.trim().is_empty() {
        errors.push(ValidationError::new("upstream.user_agent", "must not be empty"));
    }
    if config.upstream.request_timeout_secs == 0 {
        errors.push(ValidationError::new("upstream.request_timeout_secs", "must be greater than 0"));
    }

    if config.catalog.zones_path.trim().is_empty() {
        errors.push(ValidationError::new("catalog.zones_path", "must not be empty"));
    }
    if config.catalog.cache_ttl_secs == 0 {
        errors.push(ValidationError::new("catalog.cache_ttl_secs", "must be greater than 0"));
    }

    if config.output_cache.enabled {
        if config.output_cache.zones_ttl_secs == 0 {
            errors.push(ValidationError::new("output_cache.zones_ttl_secs", "must be greater than 0"));
        }
        if config.output_cache.forecast_ttl_secs == 0 {
            errors.push(ValidationError::new("output_cache.forecast_ttl_secs", "must be greater than 0"));
        }
    }

    if config.retries.max_attempts == 0 {
        errors.push(ValidationError::new("retries.max_attempts", "must be at least 1"));
    }
    if config.retries.base_delay_ms > config.retries.max_delay_ms {
        errors.push(ValidationError::new(
            "retries.base_delay_ms",
            "must not exceed retries.max_delay_ms",
        ));
    }

    // Otherwise a hung upstream surfaces as the listener's 408, not a 404.
    let transport_budget =
        RetryPolicy::from_config(&config.retries).worst_case(config.upstream.request_timeout());
    if config.listener.request_timeout_secs > 0
        && Duration::from_secs(config.listener.request_timeout_secs) <= transport_budget
    {
        errors.push(ValidationError::new(
            "listener.request_timeout_secs",
            format!(
                "must exceed the upstream worst case of {:.1}s (attempts x upstream.request_timeout_secs + backoff)",
                transport_budget.as_secs_f64()
            ),
        ));
    }

    if config.faults.enabled && config.faults.every_nth == 0 {
        errors.push(ValidationError::new("faults.every_nth", "must be greater than 0 when faults are enabled"));
    }

    match config.observability.log_format.as_str() {
        "pretty" | "json" => {}
        other => errors.push(ValidationError::new(
            "observability.log_format",
            format!("expected 'pretty' or 'json', got '{}'", other),
        )),
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(validate_config(&ServiceConfig::default()).is_ok());
    }

    #[test]
    fn test_reports_every_error() {
        let mut config = ServiceConfig::default();
        config.upstream.base_address = "ftp://weather.example".into();
        config.upstream.user_agent = "  ".into();
        config.faults.every_nth = 0;
        config.observability.log_format = "xml".into();

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                "upstream.base_address",
                "upstream.user_agent",
                "faults.every_nth",
                "observability.log_format",
            ]
        );
    }

    #[test]
    fn test_listener_timeout_must_outlast_upstream_retries() {
        let mut config = ServiceConfig::default();
        // 3 x 30s attempts plus backoff is about 90.7s.
        config.upstream.request_timeout_secs = 30;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "listener.request_timeout_secs");

        config.listener.request_timeout_secs = 91;
        assert!(validate_config(&config).is_ok());

        config.listener.request_timeout_secs = 30;
        config.retries.enabled = false;
        assert!(validate_config(&config).is_err());
        config.listener.request_timeout_secs = 31;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_disabled_faults_allow_zero_interval() {
        let mut config = ServiceConfig::default();
        config.faults.enabled = false;
        config.faults.every_nth = 0;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_metrics_address_only_checked_when_enabled() {
        let mut config = ServiceConfig::default();
        config.observability.metrics_address = "nowhere".into();
        assert!(validate_config(&config).is_err());

        config.observability.metrics_enabled = false;
        assert!(validate_config(&config).is_ok());
    }
}

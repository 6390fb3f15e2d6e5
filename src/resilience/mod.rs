//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request to api.weather.gov (nws::client):
//!     → per-attempt timeout (reqwest client)
//!     → On failure: retries.rs (check if retryable)
//!     → backoff.rs (exponential delay with jitter) → next attempt
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every external call has a deadline
//! - Retries live in the transport, never in the callers of it
//! - Jittered backoff prevents thundering herd

pub mod backoff;
pub mod retries;

pub use retries::RetryPolicy;

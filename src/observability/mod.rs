//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Zone catalog and forecast fetcher produce:
//!     → diagnostics.rs (counters, latency histogram)
//!     → spans.rs (one span per operation, outcome recorded on close)
//!     → structured log events inside those spans
//!
//! Consumers:
//!     → logging.rs (stdout, pretty or JSON)
//!     → metrics.rs (Prometheus scrape endpoint)
//!     → /diagnostics (JSON snapshot)
//! ```
//!
//! # Design Decisions
//! - Diagnostics are an injected value, not a global, so tests get fresh counters
//! - Metrics are cheap (atomic increments)
//! - Request ID flows through every HTTP span

pub mod diagnostics;
pub mod logging;
pub mod metrics;
pub mod spans;

pub use diagnostics::{DiagnosticsSnapshot, NwsDiagnostics};

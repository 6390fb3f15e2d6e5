//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ServiceConfig (validated, immutable)
//!     → cloned into each subsystem at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_or_default, ConfigError};
pub use schema::CatalogConfig;
pub use schema::FaultConfig;
pub use schema::ListenerConfig;
pub use schema::ObservabilityConfig;
pub use schema::OutputCacheConfig;
pub use schema::RetryConfig;
pub use schema::ServiceConfig;
pub use schema::UpstreamConfig;

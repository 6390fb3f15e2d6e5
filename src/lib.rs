//! NWS forecast API library

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod nws;
pub mod observability;
pub mod resilience;

pub use config::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;

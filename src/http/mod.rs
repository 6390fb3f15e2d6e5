//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, request span)
//!     → handlers.rs (/zones, /forecast/{zone_id}, /health, /alive, /diagnostics)
//!     → output_cache.rs (cached response or a call into the nws subsystem)
//!     → JSON response
//! ```

pub mod handlers;
pub mod output_cache;
pub mod request;
pub mod server;

pub use output_cache::OutputCache;
pub use request::{MakeRequestUuid, X_REQUEST_ID};
pub use server::{AppState, HttpServer, ServerError};

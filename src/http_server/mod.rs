//! # HTTP Server Module
//!
//! Axum server exposing the query API.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/api/connect`, `/api/disconnect` - Session lifecycle
//! - `/api/tables`, `/api/table` - Table listing and unfiltered slices
//! - `/api/query` - Structured queries
//! - `/api/run-sql` - Raw SELECT pass-through

pub mod errors;
pub mod health_routes;
pub mod query_routes;
pub mod server;

pub use errors::{ApiError, ApiResult, ErrorResponse};
pub use query_routes::{QueryState, SESSION_HEADER};
pub use server::HttpServer;

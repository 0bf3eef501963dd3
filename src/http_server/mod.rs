//! # Valve Catalog HTTP Server Module
//!
//! Axum server exposing the valve catalog.
//!
//! # Endpoints
//!
//! - `/valve`, `/valves` - valve CRUD
//! - `/` - redirect to the API explorer at `/openapi/swagger`
//! - `/openapi/openapi.json` - OpenAPI document
//! - `/favicon.ico` - static favicon
//! - `/health` - health check

pub mod config;
pub mod docs_routes;
pub mod errors;
pub mod observability_routes;
pub mod responses;
pub mod server;
pub mod valve_routes;

pub use config::HttpServerConfig;
pub use errors::{ApiError, ApiResult};
pub use responses::{ErrorResponse, ValveDeleted, ValveList};
pub use server::HttpServer;
pub use valve_routes::ValveState;

//! Observability HTTP Routes
//!
//! Health check reporting the service version and whether the database
//! answers.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;

use crate::storage::ValveStore;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,
}

/// Health check route
pub fn health_routes(store: Arc<ValveStore>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .with_state(store)
}

/// Health check handler
async fn health_handler(State(store): State<Arc<ValveStore>>) -> impl IntoResponse {
    let (status, database) = match store.ping().await {
        Ok(()) => (StatusCode::OK, "ok"),
        Err(e) => {
            tracing::error!(error = %e, "health check could not reach the database");
            (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
        }
    };

    let response = HealthResponse {
        status: if status.is_success() { "ok" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: database.to_string(),
    };

    (status, Json(response))
}

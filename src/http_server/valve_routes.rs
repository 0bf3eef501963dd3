//! Valve HTTP Routes
//!
//! - `POST /valve` - add a valve (form fields)
//! - `GET /valves` - list every valve
//! - `DELETE /valve?name=` - remove valves by name
//! - `PUT /valve` - replace a valve's fields by id (form fields)
//!
//! Each handler opens its own storage session and commits before replying.

use std::borrow::Cow;
use std::sync::Arc;

use axum::{
    extract::{
        rejection::{FormRejection, QueryRejection},
        Query, State,
    },
    routing::{get, post},
    Form, Json, Router,
};
use serde::Deserialize;

use super::errors::{ApiError, ApiResult};
use super::responses::{ValveDeleted, ValveList};
use crate::model::{UpdateValveForm, ValidationError, Valve, ValveFields};
use crate::storage::{StorageResult, ValveStore};

// ==================
// Shared State
// ==================

/// Valve state shared across handlers
pub struct ValveState {
    pub store: ValveStore,
    /// Percent-decode delete names a second time, for clients that
    /// double-encode the query string.
    pub decode_names_twice: bool,
}

impl ValveState {
    pub fn new(store: ValveStore) -> Self {
        Self {
            store,
            decode_names_twice: false,
        }
    }

    pub fn with_double_decoding(mut self, enabled: bool) -> Self {
        self.decode_names_twice = enabled;
        self
    }

    /// The name a delete request refers to. The query extractor has already
    /// decoded it once.
    fn resolve_name(&self, raw: String) -> ApiResult<String> {
        if !self.decode_names_twice {
            return Ok(raw);
        }

        urlencoding::decode(&raw)
            .map(Cow::into_owned)
            .map_err(|_| ValidationError::new("name", "is not valid UTF-8 once decoded").into())
    }
}

// ==================
// Request Types
// ==================

#[derive(Debug, Deserialize)]
pub struct DeleteValveQuery {
    pub name: String,
}

// ==================
// Valve Routes
// ==================

/// Create valve routes
pub fn valve_routes(state: Arc<ValveState>) -> Router {
    Router::new()
        .route(
            "/valve",
            post(add_valve_handler)
                .put(update_valve_handler)
                .delete(delete_valve_handler),
        )
        .route("/valves", get(list_valves_handler))
        .with_state(state)
}

// ==================
// Handlers
// ==================

async fn insert_valve(store: &ValveStore, fields: &ValveFields) -> StorageResult<Valve> {
    let mut session = store.session().await?;
    let valve = session.insert(fields).await?;
    session.commit().await?;
    Ok(valve)
}

async fn add_valve_handler(
    State(state): State<Arc<ValveState>>,
    form: Result<Form<ValveFields>, FormRejection>,
) -> ApiResult<Json<Valve>> {
    let Form(fields) = form?;
    fields.validate()?;
    tracing::debug!(name = %fields.name, "adding valve");

    let valve = insert_valve(&state.store, &fields).await.map_err(|e| {
        if e.is_unique_violation() {
            tracing::warn!(name = %fields.name, "valve name already in catalog");
            ApiError::DuplicateName
        } else {
            tracing::warn!(name = %fields.name, error = %e, "could not save valve");
            ApiError::SaveFailed
        }
    })?;

    tracing::debug!(id = valve.id, name = %valve.name(), "added valve");
    Ok(Json(valve))
}

async fn list_valves_handler(State(state): State<Arc<ValveState>>) -> ApiResult<Json<ValveList>> {
    tracing::debug!("listing valves");

    let mut session = state.store.session().await?;
    let valves = session.list().await?;

    tracing::debug!(count = valves.len(), "valves found");
    Ok(Json(ValveList::new(valves)))
}

async fn delete_valve_handler(
    State(state): State<Arc<ValveState>>,
    query: Result<Query<DeleteValveQuery>, QueryRejection>,
) -> ApiResult<Json<ValveDeleted>> {
    let Query(query) = query?;
    let name = state.resolve_name(query.name)?;
    tracing::debug!(name = %name, "deleting valve");

    let mut session = state.store.session().await?;
    let removed = session.delete_by_name(&name).await?;
    session.commit().await?;

    if removed == 0 {
        tracing::warn!(name = %name, "valve to delete not found");
        return Err(ApiError::ValveNotFound);
    }

    tracing::debug!(name = %name, removed, "deleted valve");
    Ok(Json(ValveDeleted::new(name)))
}

async fn update_valve_handler(
    State(state): State<Arc<ValveState>>,
    form: Result<Form<UpdateValveForm>, FormRejection>,
) -> ApiResult<Json<Valve>> {
    let Form(form) = form?;
    let (id, fields) = form.into_parts();
    fields.validate()?;
    tracing::debug!(id, "updating valve");

    let mut session = state.store.session().await?;
    let Some(mut valve) = session.find_by_id(id).await? else {
        tracing::warn!(id, "valve to update not found");
        return Err(ApiError::ValveNotFound);
    };

    valve.fields = fields;
    session.save(&valve).await.map_err(|e| {
        if e.is_unique_violation() {
            tracing::warn!(id, name = %valve.name(), "valve name already in catalog");
        }
        ApiError::from(e)
    })?;
    session.commit().await?;

    tracing::debug!(id, name = %valve.name(), "updated valve");
    Ok(Json(valve))
}

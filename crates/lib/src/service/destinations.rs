//! Routes served by the destination service.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};

use super::error::ApiError;
use super::extract::JsonBody;
use super::middleware::require_access;
use super::types::{HealthResponse, MessageBody};
use crate::Clock;
use crate::auth::{AccessGate, RequiredRoles, SessionClaims};
use crate::catalog::{CatalogError, Destination, DestinationCatalog};

#[derive(Clone)]
pub struct DestinationState {
    pub catalog: Arc<DestinationCatalog>,
    pub clock: Arc<dyn Clock>,
}

impl DestinationState {
    pub fn new(catalog: Arc<DestinationCatalog>, clock: Arc<dyn Clock>) -> Self {
        Self { catalog, clock }
    }
}

/// Build the destination router.
///
/// Reads are public. Creation, replacement and deletion pass through `gate` restricted to
/// `Admin`, whatever roles `gate` was built with.
pub fn router(state: DestinationState, gate: AccessGate) -> Router {
    let admin = Router::new()
        .route("/destinations", post(create))
        .route(
            "/destinations/{id}",
            axum::routing::put(replace).delete(remove),
        )
        .route_layer(from_fn_with_state(
            gate.requiring(RequiredRoles::admin()),
            require_access,
        ));

    Router::new()
        .route("/destinations", get(list))
        .route("/destinations/{id}", get(fetch))
        .route("/health", get(health))
        .merge(admin)
        .with_state(state)
}

async fn list(State(state): State<DestinationState>) -> Json<Vec<Destination>> {
    Json(state.catalog.get_all().await)
}

async fn fetch(
    State(state): State<DestinationState>,
    Path(id): Path<String>,
) -> Result<Json<Destination>, ApiError> {
    let destination = state
        .catalog
        .get(&id)
        .await
        .ok_or(CatalogError::NotFound { id })?;
    Ok(Json(destination))
}

async fn create(
    State(state): State<DestinationState>,
    Extension(claims): Extension<SessionClaims>,
    JsonBody(destination): JsonBody<Destination>,
) -> Result<(StatusCode, Json<Destination>), ApiError> {
    state.catalog.insert(destination.clone()).await?;
    tracing::info!(by = %claims.subject, "Created destination {}", destination.id);
    Ok((StatusCode::CREATED, Json(destination)))
}

async fn replace(
    State(state): State<DestinationState>,
    Extension(claims): Extension<SessionClaims>,
    Path(id): Path<String>,
    JsonBody(mut destination): JsonBody<Destination>,
) -> Result<Json<Destination>, ApiError> {
    destination.id = id;
    let previous = state.catalog.upsert(destination.clone()).await?;
    tracing::info!(
        by = %claims.subject,
        replaced = previous.is_some(),
        "Stored destination {}",
        destination.id
    );
    Ok(Json(destination))
}

async fn remove(
    State(state): State<DestinationState>,
    Extension(claims): Extension<SessionClaims>,
    Path(id): Path<String>,
) -> Result<Json<MessageBody>, ApiError> {
    match state.catalog.delete(&id).await {
        Some(_) => {
            tracing::info!(by = %claims.subject, "Deleted destination {id}");
            Ok(Json(MessageBody::new("Destination deleted")))
        }
        None => Err(CatalogError::NotFound { id }.into()),
    }
}

async fn health(State(state): State<DestinationState>) -> Json<HealthResponse> {
    Json(super::health_body("destinations", state.clock.as_ref()))
}

//! Routes served by the authority: registration, login, identity listing and token
//! validation.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};

use super::error::ApiError;
use super::extract::JsonBody;
use super::middleware::require_access;
use super::types::{HealthResponse, LoginResponse, MessageBody, TokenCheck, ValidationResponse};
use crate::Clock;
use crate::auth::{AccessGate, AuthError, RequiredRoles, SessionClaims, TokenAuthority};
use crate::identity::{
    CredentialStore, Credentials, IdentityProfile, IdentitySummary, Registration, StoreError,
};

/// Shared state of the authority service.
#[derive(Clone)]
pub struct AuthorityState {
    pub store: Arc<CredentialStore>,
    pub authority: Arc<TokenAuthority>,
    pub clock: Arc<dyn Clock>,
}

impl AuthorityState {
    pub fn new(
        store: Arc<CredentialStore>,
        authority: Arc<TokenAuthority>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            authority,
            clock,
        }
    }

    /// Gate backed by this authority's own verifier.
    pub fn gate(&self) -> AccessGate {
        AccessGate::new(self.authority.clone())
    }
}

/// Build the authority router.
///
/// `/user/list` requires `Admin`; `/user/profile` and `/auth/validate` require any valid
/// token; the rest are public.
pub fn router(state: AuthorityState) -> Router {
    let gate = state.gate();

    let admin = Router::new()
        .route("/user/list", get(list_identities))
        .route_layer(from_fn_with_state(
            gate.requiring(RequiredRoles::admin()),
            require_access,
        ));

    let authenticated = Router::new()
        .route("/user/profile", get(profile))
        .route("/auth/validate", get(validate))
        .route_layer(from_fn_with_state(gate, require_access));

    Router::new()
        .route("/user/register", post(register))
        .route("/user/login", post(login))
        .route("/auth/validate-token", post(validate_token))
        .route("/health", get(health))
        .merge(admin)
        .merge(authenticated)
        .with_state(state)
}

async fn register(
    State(state): State<AuthorityState>,
    JsonBody(registration): JsonBody<Registration>,
) -> Result<(StatusCode, Json<MessageBody>), ApiError> {
    let identity = registration.into_identity().await?;
    state.store.create(identity).await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageBody::new("User registered successfully")),
    ))
}

async fn login(
    State(state): State<AuthorityState>,
    JsonBody(credentials): JsonBody<Credentials>,
) -> Result<Json<LoginResponse>, ApiError> {
    let (email, password) = credentials.into_parts()?;
    let identity = state.store.authenticate(&email, &password).await?;
    let token = state.authority.issue(&identity.email, identity.role)?;
    tracing::info!(role = %identity.role, "Issued token for {}", identity.email);
    Ok(Json(LoginResponse {
        token,
        role: identity.role,
    }))
}

async fn list_identities(
    State(state): State<AuthorityState>,
) -> Json<BTreeMap<String, IdentitySummary>> {
    let identities = state
        .store
        .list_all()
        .await
        .into_iter()
        .map(|identity| (identity.email.clone(), identity.summary()))
        .collect();
    Json(identities)
}

async fn profile(
    State(state): State<AuthorityState>,
    Extension(claims): Extension<SessionClaims>,
) -> Result<Json<IdentityProfile>, ApiError> {
    let identity = state
        .store
        .lookup(&claims.subject)
        .await
        .ok_or_else(|| StoreError::NotFound {
            email: claims.subject.clone(),
        })?;
    Ok(Json(identity.profile()))
}

async fn validate(Extension(claims): Extension<SessionClaims>) -> Json<ValidationResponse> {
    Json(claims.into())
}

async fn validate_token(
    State(state): State<AuthorityState>,
    JsonBody(check): JsonBody<TokenCheck>,
) -> Result<Json<MessageBody>, ApiError> {
    let token = check
        .token
        .filter(|t| !t.trim().is_empty())
        .ok_or(AuthError::MissingToken)?;
    state.authority.verify(&token)?;
    Ok(Json(MessageBody::new("Token is valid")))
}

async fn health(State(state): State<AuthorityState>) -> Json<HealthResponse> {
    Json(super::health_body("authority", state.clock.as_ref()))
}

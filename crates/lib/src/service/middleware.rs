//! axum middleware enforcing an [`AccessGate`].

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use super::error::ApiError;
use crate::auth::AccessGate;

/// Reject the request unless `gate` admits it; otherwise store the verified
/// [`crate::auth::SessionClaims`] in the request extensions and continue.
///
/// Install with `axum::middleware::from_fn_with_state(gate, require_access)`.
pub async fn require_access(
    State(gate): State<AccessGate>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let claims = gate.authorize_headers(request.headers()).await?;
    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

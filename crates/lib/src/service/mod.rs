//! HTTP surfaces of the authority and the destination service.
//!
//! Both are plain axum routers. Protected routes are wrapped with [`middleware::require_access`],
//! which runs an [`crate::auth::AccessGate`] and hands the verified claims to the handler as an
//! `Extension<SessionClaims>`.

pub mod authority;
pub mod destinations;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod server;
pub mod types;

pub use authority::AuthorityState;
pub use destinations::DestinationState;
pub use error::ApiError;
pub use extract::JsonBody;
pub use server::RunningServer;

use crate::Clock;
use types::HealthResponse;

pub(crate) fn health_body(service: &str, clock: &dyn Clock) -> HealthResponse {
    HealthResponse {
        status: "healthy".to_string(),
        service: service.to_string(),
        time: clock.now_rfc3339(),
    }
}

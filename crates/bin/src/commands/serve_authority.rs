//! serve-authority command - runs the token authority.

use std::sync::Arc;

use warden::auth::{SigningSecret, TokenAuthority};
use warden::identity::CredentialStore;
use warden::service::{AuthorityState, authority};
use warden::{Clock, SystemClock};

use super::shutdown_signal;
use crate::cli::ServeAuthorityArgs;

const SNAPSHOT_FILE: &str = "identities.json";

/// Run the token authority
pub async fn run(args: &ServeAuthorityArgs) -> Result<(), Box<dyn std::error::Error>> {
    let secret = SigningSecret::new(args.secret.as_bytes())?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let token_authority = Arc::new(TokenAuthority::with_clock(
        &secret,
        args.token_lifetime.into(),
        clock.clone(),
    ));

    let store = match &args.data_dir {
        Some(dir) => {
            tokio::fs::create_dir_all(dir).await?;
            CredentialStore::open(dir.join(SNAPSHOT_FILE)).await
        }
        None => {
            tracing::warn!("No data directory configured; identities will not survive a restart");
            CredentialStore::in_memory()
        }
    };
    tracing::info!("Credential store holds {} identities", store.len().await);

    let state = AuthorityState::new(Arc::new(store), token_authority, clock);
    let app = authority::router(state.clone());

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let local_addr = listener.local_addr()?;

    println!("Warden authority listening on http://{local_addr}");
    println!();
    println!("Available endpoints:");
    println!("  POST /user/register       - Register an identity");
    println!("  POST /user/login          - Exchange credentials for a token");
    println!("  GET  /user/list           - List identities (Admin)");
    println!("  GET  /user/profile        - Caller's profile");
    println!("  GET  /auth/validate       - Validate the bearer token");
    println!("  POST /auth/validate-token - Validate a token in the body");
    println!("  GET  /health              - Health check");
    println!();
    println!("Press Ctrl+C to shutdown");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Err(e) = state.store.save().await {
        tracing::error!("Failed to save identities on shutdown: {e}");
    }

    println!("Server shut down");
    Ok(())
}

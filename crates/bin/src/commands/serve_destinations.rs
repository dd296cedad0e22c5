//! serve-destinations command - runs the destination service.

use std::sync::Arc;
use std::time::Duration;

use warden::auth::{AccessGate, SigningSecret, TokenAuthority, TokenLifetime, TokenVerifier};
use warden::catalog::DestinationCatalog;
use warden::remote::RemoteTrustDelegate;
use warden::service::{DestinationState, destinations};
use warden::{Clock, SystemClock};

use super::shutdown_signal;
use crate::cli::ServeDestinationsArgs;

/// Run the destination service
pub async fn run(args: &ServeDestinationsArgs) -> Result<(), Box<dyn std::error::Error>> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let verifier: Arc<dyn TokenVerifier> = match &args.secret {
        Some(secret) => {
            tracing::info!("Verifying tokens locally");
            let secret = SigningSecret::new(secret.as_bytes())?;
            // Lifetime only affects issuance, which this service never does.
            Arc::new(TokenAuthority::with_clock(
                &secret,
                TokenLifetime::default(),
                clock.clone(),
            ))
        }
        None => {
            let delegate = RemoteTrustDelegate::with_timeout(
                &args.authority_url,
                Duration::from_secs(args.authority_timeout),
            )?;
            tracing::info!("Delegating token validation to {}", delegate.validate_url());
            Arc::new(delegate)
        }
    };

    let state = DestinationState::new(Arc::new(DestinationCatalog::seeded()), clock);
    let app = destinations::router(state, AccessGate::new(verifier));

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let local_addr = listener.local_addr()?;

    println!("Warden destination service listening on http://{local_addr}");
    println!();
    println!("Available endpoints:");
    println!("  GET    /destinations      - List destinations");
    println!("  GET    /destinations/{{id}} - Fetch one destination");
    println!("  POST   /destinations      - Create a destination (Admin)");
    println!("  PUT    /destinations/{{id}} - Replace a destination (Admin)");
    println!("  DELETE /destinations/{{id}} - Delete a destination (Admin)");
    println!("  GET    /health            - Health check");
    println!();
    println!("Press Ctrl+C to shutdown");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    println!("Server shut down");
    Ok(())
}

//! health command - checks that a Warden service answers and is the one expected.

use std::time::Duration;

use url::Url;
use warden::service::types::HealthResponse;

use crate::cli::HealthArgs;

/// Why a service failed its health check.
#[derive(Debug, thiserror::Error)]
pub enum Unhealthy {
    #[error("invalid URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to reach {url}: {source}")]
    Unreachable {
        url: Url,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP status {status}")]
    HttpStatus {
        url: Url,
        status: reqwest::StatusCode,
    },

    #[error("{url} did not return a Warden health body: {source}")]
    NotWarden {
        url: Url,
        #[source]
        source: reqwest::Error,
    },

    #[error("{service} reports status {status}")]
    Status { service: String, status: String },

    #[error("expected service {expected}, found {found}")]
    WrongService { expected: String, found: String },
}

/// `base` with `/health` appended unless it already ends there.
fn health_url(base: &str) -> Result<Url, Unhealthy> {
    let base = base.trim_end_matches('/');
    let url = if base.ends_with("/health") {
        base.to_string()
    } else {
        format!("{base}/health")
    };
    Url::parse(&url).map_err(|source| Unhealthy::InvalidUrl { url, source })
}

/// Fetch the health body at `base` and check it.
///
/// When `expected_service` is set, the body's `service` must name it, so an authority is not
/// mistaken for a destination service listening on the same address.
pub async fn check(
    base: &str,
    expected_service: Option<&str>,
    timeout: Duration,
) -> Result<HealthResponse, Unhealthy> {
    let url = health_url(base)?;
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|source| Unhealthy::Unreachable {
            url: url.clone(),
            source,
        })?;

    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|source| Unhealthy::Unreachable {
            url: url.clone(),
            source,
        })?;
    if !response.status().is_success() {
        return Err(Unhealthy::HttpStatus {
            url,
            status: response.status(),
        });
    }

    let body: HealthResponse = response
        .json()
        .await
        .map_err(|source| Unhealthy::NotWarden { url, source })?;
    if body.status != "healthy" {
        return Err(Unhealthy::Status {
            service: body.service,
            status: body.status,
        });
    }
    match expected_service {
        Some(expected) if body.service != expected => Err(Unhealthy::WrongService {
            expected: expected.to_string(),
            found: body.service,
        }),
        _ => Ok(body),
    }
}

/// Run the health check command
pub async fn run(args: &HealthArgs) -> Result<(), Box<dyn std::error::Error>> {
    let timeout = Duration::from_secs(args.timeout);
    match check(&args.url, args.service.as_deref(), timeout).await {
        Ok(health) => {
            println!("healthy: {} at {}", health.service, health.time);
            Ok(())
        }
        Err(e) => {
            eprintln!("unhealthy: {e}");
            std::process::exit(1);
        }
    }
}

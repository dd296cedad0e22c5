//! CLI argument definitions for the Warden binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use warden::auth::TokenLifetime;

/// Lifetime of issued session tokens
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Lifetime {
    /// 24 hours
    Session,
    /// 1 hour
    Short,
}

impl From<Lifetime> for TokenLifetime {
    fn from(lifetime: Lifetime) -> Self {
        match lifetime {
            Lifetime::Session => TokenLifetime::Session,
            Lifetime::Short => TokenLifetime::Short,
        }
    }
}

/// Warden token authority and destination service
#[derive(Parser, Debug)]
#[command(name = "warden")]
#[command(about = "Warden: token issuance and delegated access control")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the token authority (registration, login, validation)
    ServeAuthority(ServeAuthorityArgs),
    /// Run the destination service
    ServeDestinations(ServeDestinationsArgs),
    /// Check health of a running Warden service
    Health(HealthArgs),
}

/// Arguments for the serve-authority command
#[derive(clap::Args, Debug)]
pub struct ServeAuthorityArgs {
    /// Port to listen on
    #[arg(short, long, default_value_t = 5003, env = "WARDEN_AUTHORITY_PORT")]
    pub port: u16,

    /// Bind address
    #[arg(long, default_value = "0.0.0.0", env = "WARDEN_HOST")]
    pub host: String,

    /// Directory holding the identity snapshot (identities.json).
    /// Identities are kept in memory only when omitted.
    #[arg(short = 'D', long, env = "WARDEN_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Secret used to sign session tokens
    #[arg(long, env = "WARDEN_SECRET", hide_env_values = true)]
    pub secret: String,

    /// Lifetime of issued tokens
    #[arg(long, default_value = "session", env = "WARDEN_TOKEN_LIFETIME")]
    pub token_lifetime: Lifetime,
}

/// Arguments for the serve-destinations command
#[derive(clap::Args, Debug)]
pub struct ServeDestinationsArgs {
    /// Port to listen on
    #[arg(short, long, default_value_t = 5001, env = "WARDEN_DESTINATIONS_PORT")]
    pub port: u16,

    /// Bind address
    #[arg(long, default_value = "0.0.0.0", env = "WARDEN_HOST")]
    pub host: String,

    /// Base URL of the token authority
    #[arg(
        long,
        default_value = "http://localhost:5006",
        env = "WARDEN_AUTHORITY_URL"
    )]
    pub authority_url: String,

    /// Seconds to wait for the authority before denying a request
    #[arg(long, default_value_t = 5, env = "WARDEN_AUTHORITY_TIMEOUT")]
    pub authority_timeout: u64,

    /// Verify tokens locally with this secret instead of asking the authority
    #[arg(long, env = "WARDEN_SECRET", hide_env_values = true)]
    pub secret: Option<String>,
}

/// Arguments for the health command
#[derive(clap::Args, Debug)]
pub struct HealthArgs {
    /// Base URL of the service to check
    #[arg(long, default_value = "http://127.0.0.1:5003", env = "WARDEN_HEALTH_URL")]
    pub url: String,

    /// Service name the health body must report (`authority` or `destinations`)
    #[arg(long, env = "WARDEN_HEALTH_SERVICE")]
    pub service: Option<String>,

    /// Timeout in seconds
    #[arg(short, long, default_value_t = 5, env = "WARDEN_HEALTH_TIMEOUT")]
    pub timeout: u64,
}

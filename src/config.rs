//! Command line and environment configuration for the server.

use std::{net::SocketAddr, path::PathBuf};

use clap::Parser;
use time::Duration;

use crate::{AuthSettings, auth::PasswordHash, db::DEFAULT_MAX_CONNECTIONS};

/// The REST API server for the finance tracker.
///
/// Every option can also be set with the environment variable shown in its help.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(version, about, long_about = None)]
pub struct Config {
    /// File path to the application SQLite database, created if it does not exist.
    #[arg(long, env = "DATABASE_PATH", default_value = "finance.db")]
    pub db_path: PathBuf,

    /// The secret used to sign auth tokens.
    #[arg(long, env = "SECRET", hide_env_values = true)]
    pub secret: String,

    /// The port to serve the API from.
    #[arg(short, long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    /// The address to bind to.
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    pub host: std::net::IpAddr,

    /// The maximum number of open database connections.
    #[arg(long, env = "MAX_CONNECTIONS", default_value_t = DEFAULT_MAX_CONNECTIONS)]
    pub max_connections: usize,

    /// How many hours an auth token is valid for. Tokens never expire if not set.
    #[arg(long, env = "TOKEN_LIFETIME_HOURS")]
    pub token_lifetime_hours: Option<u32>,

    /// Only allow users to log in after they have verified their email.
    #[arg(long, env = "REQUIRE_VERIFIED_EMAIL")]
    pub require_verified_email: bool,

    /// Do not send the email verification token in the registration response.
    #[arg(long, env = "HIDE_VERIFICATION_TOKEN")]
    pub hide_verification_token: bool,

    /// A directory of static files to serve for requests that match no API route.
    #[arg(long, env = "STATIC_DIR")]
    pub static_dir: Option<PathBuf>,
}

impl Config {
    /// The socket address the server listens on.
    pub fn address(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// The registration and log-in settings.
    pub fn auth_settings(&self) -> AuthSettings {
        AuthSettings {
            password_cost: PasswordHash::DEFAULT_COST,
            token_lifetime: self
                .token_lifetime_hours
                .map(|hours| Duration::hours(i64::from(hours))),
            require_verified_email: self.require_verified_email,
            expose_verification_token: !self.hide_verification_token,
        }
    }
}

//! Implements a struct that holds the state of the REST server.

use axum::extract::FromRef;
use time::Duration;

use crate::{
    auth::{PasswordHash, TokenKeys},
    db::DbPool,
};

/// Settings that control registration and log-in.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthSettings {
    /// The bcrypt cost for hashing passwords.
    pub password_cost: u32,
    /// How long issued tokens are valid for, `None` for tokens that never expire.
    pub token_lifetime: Option<Duration>,
    /// Whether users must verify their email before they can log in.
    pub require_verified_email: bool,
    /// Whether the registration response includes the email verification token.
    pub expose_verification_token: bool,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            password_cost: PasswordHash::DEFAULT_COST,
            token_lifetime: None,
            require_verified_email: false,
            expose_verification_token: true,
        }
    }
}

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The pool of database connections.
    pub db_pool: DbPool,

    /// The keys for signing and verifying auth tokens.
    pub token_keys: TokenKeys,

    /// Settings for registration and log-in.
    pub auth_settings: AuthSettings,
}

impl AppState {
    /// Create a new [AppState] from an open connection pool.
    ///
    /// `token_secret` is the shared secret used to sign tokens.
    pub fn new(db_pool: DbPool, token_secret: &str, auth_settings: AuthSettings) -> Self {
        Self {
            token_keys: TokenKeys::new(token_secret, auth_settings.token_lifetime),
            db_pool,
            auth_settings,
        }
    }
}

impl FromRef<AppState> for DbPool {
    fn from_ref(state: &AppState) -> Self {
        state.db_pool.clone()
    }
}

//! Signed JSON Web Tokens that identify a logged in user.

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::{Error, auth::UserID};

/// The contents of a token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// The ID of the user the token was issued to.
    pub id: UserID,
    /// When the token was issued as a Unix timestamp.
    pub iat: i64,
    /// When the token expires as a Unix timestamp.
    ///
    /// Tokens issued without a lifetime never expire.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

/// The keys for signing and verifying tokens with a shared secret (HS256).
#[derive(Clone)]
pub struct TokenKeys {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    lifetime: Option<Duration>,
}

impl std::fmt::Debug for TokenKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenKeys")
            .field("lifetime", &self.lifetime)
            .finish_non_exhaustive()
    }
}

impl TokenKeys {
    /// Create the keys from `secret`.
    ///
    /// Tokens expire after `lifetime`, or never if `lifetime` is `None`.
    pub fn new(secret: &str, lifetime: Option<Duration>) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            lifetime,
        }
    }

    /// Create a signed token for `user_id`.
    ///
    /// # Errors
    /// Returns [Error::TokenCreation] if the claims could not be signed.
    pub fn issue(&self, user_id: UserID) -> Result<String, Error> {
        let now = OffsetDateTime::now_utc();
        let claims = Claims {
            id: user_id,
            iat: now.unix_timestamp(),
            exp: self
                .lifetime
                .map(|lifetime| (now + lifetime).unix_timestamp()),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|error| Error::TokenCreation(error.to_string()))
    }

    /// Check the signature and expiry of `token` and return its claims.
    ///
    /// # Errors
    /// Returns [Error::InvalidToken] if the token is malformed, was signed
    /// with a different secret or has expired.
    pub fn verify(&self, token: &str) -> Result<Claims, Error> {
        let mut validation = Validation::default();
        // `exp` is still checked when present.
        validation.required_spec_claims.clear();

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|token_data| token_data.claims)
            .map_err(|error| {
                tracing::debug!("Rejected token: {error}");
                Error::InvalidToken
            })
    }
}

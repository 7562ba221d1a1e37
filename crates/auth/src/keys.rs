//! Signing key resolution.

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey};

use crate::error::AuthError;

/// Resolves the key that verifies a token.
#[async_trait]
pub trait KeyProvider: Send + Sync {
    /// Returns the decoding key for the token's `kid` header.
    async fn decoding_key(&self, kid: Option<&str>) -> Result<DecodingKey, AuthError>;

    /// Algorithms this provider's keys may be used with.
    fn algorithms(&self) -> &[Algorithm];
}

/// A single fixed key, independent of `kid`.
///
/// Useful for local development against self-issued tokens and for tests.
#[derive(Clone)]
pub struct StaticKey {
    key: DecodingKey,
    algorithms: Vec<Algorithm>,
}

impl StaticKey {
    /// HMAC key shared with the token issuer.
    pub fn hmac(secret: &[u8]) -> Self {
        Self {
            key: DecodingKey::from_secret(secret),
            algorithms: vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512],
        }
    }

    pub fn new(key: DecodingKey, algorithms: Vec<Algorithm>) -> Self {
        Self { key, algorithms }
    }
}

#[async_trait]
impl KeyProvider for StaticKey {
    async fn decoding_key(&self, _kid: Option<&str>) -> Result<DecodingKey, AuthError> {
        Ok(self.key.clone())
    }

    fn algorithms(&self) -> &[Algorithm] {
        &self.algorithms
    }
}

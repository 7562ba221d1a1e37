//! JWT signature and expiry checks.

use std::sync::Arc;

use jsonwebtoken::{decode, decode_header, errors::ErrorKind, Validation};
use stackies_core::auth::{AuthError as CoreError, Claims};

use crate::{error::AuthError, keys::KeyProvider};

/// Verifies bearer tokens against a [`KeyProvider`].
///
/// Checks the signature and `exp`. Audience and issuer are not checked.
#[derive(Clone)]
pub struct JwtVerifier {
    keys: Arc<dyn KeyProvider>,
}

impl JwtVerifier {
    pub fn new(keys: Arc<dyn KeyProvider>) -> Self {
        Self { keys }
    }

    /// Verifies `token` and returns its claims.
    pub async fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let header =
            decode_header(token).map_err(|e| CoreError::InvalidToken(e.to_string()))?;

        if !self.keys.algorithms().contains(&header.alg) {
            return Err(
                CoreError::InvalidToken(format!("unsupported algorithm {:?}", header.alg)).into(),
            );
        }

        let key = self.keys.decoding_key(header.kid.as_deref()).await?;

        let mut validation = Validation::new(header.alg);
        validation.validate_aud = false;

        let data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
            ErrorKind::Json(_) => CoreError::InvalidClaims,
            _ => CoreError::InvalidToken(e.to_string()),
        })?;

        Ok(data.claims)
    }
}

//! Bearer-token middleware and claim extractor.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use stackies_core::auth::{extract_bearer, AuthError as CoreError, Claims};

use crate::{error::AuthError, verifier::JwtVerifier};

/// Rejects requests without a valid bearer token.
///
/// On success the verified claims are stored in the request extensions, where
/// [`BearerClaims`] picks them up.
///
/// ```ignore
/// Router::new()
///     .route("/experiences", get(list))
///     .layer(middleware::from_fn_with_state(verifier, require_bearer))
/// ```
pub async fn require_bearer(
    State(verifier): State<JwtVerifier>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(extract_bearer)
        .ok_or(CoreError::MissingToken)?;

    let claims = verifier.verify(token).await?;
    tracing::debug!(sub = ?claims.get("sub"), "Bearer token accepted");

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

/// Claims of the token accepted by [`require_bearer`].
pub struct BearerClaims(pub Claims);

impl<S> FromRequestParts<S> for BearerClaims
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(BearerClaims)
            .ok_or_else(|| CoreError::MissingToken.into())
    }
}

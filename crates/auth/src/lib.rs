//! Bearer-token authentication for stackies.
//!
//! This crate provides:
//! - JWKS retrieval with periodic and on-demand refresh
//! - JWT verification and an axum middleware guarding routes
//! - The OAuth2 authorization-code callback

mod config;
mod error;
mod extractors;
mod handlers;
mod jwks;
mod keys;
mod verifier;

pub use config::{AuthConfig, JwtConfig, OAuthConfig};
pub use error::AuthError;
pub use extractors::{require_bearer, BearerClaims};
pub use handlers::{callback_routes, CodeExchanger, IdTokenFields};
pub use jwks::JwksCache;
pub use keys::{KeyProvider, StaticKey};
pub use verifier::JwtVerifier;

use std::time::Duration;

use stackies_core::auth::{authorize_url_from_token_url, jwks_url_from_issuer};
use url::Url;

use crate::error::AuthError;

const DEFAULT_JWKS_REFRESH: Duration = Duration::from_secs(60 * 60);
const DEFAULT_JWKS_MIN_REFRESH: Duration = Duration::from_secs(5 * 60);

/// Where to fetch signing keys and how often.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub jwks_url: Url,
    /// Periodic background refresh.
    pub refresh_interval: Duration,
    /// Minimum gap between refreshes triggered by an unknown `kid`.
    pub min_refresh_interval: Duration,
}

/// OAuth2 client used by the `/callback` code exchange.
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: Option<String>,
    pub redirect_url: Url,
    pub token_url: Url,
    pub authorize_url: Url,
}

/// Complete auth configuration.
///
/// Each half is optional: without a JWKS location bearer verification is off,
/// without client credentials the callback route is not mounted.
#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    pub jwt: Option<JwtConfig>,
    pub oauth: Option<OAuthConfig>,
}

impl AuthConfig {
    /// Load from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `ISSUER_URL`: token issuer; JWKS defaults to `{ISSUER_URL}/.well-known/jwks.json`
    /// - `JWKS_URL`: explicit JWKS location (overrides the issuer default)
    /// - `JWKS_REFRESH_SECS`: periodic key refresh (default: 3600)
    /// - `JWKS_MIN_REFRESH_SECS`: rate limit for unknown-kid refreshes (default: 300)
    /// - `CLIENT_ID`: OAuth2 client id (enables the callback together with `TOKEN_URL`)
    /// - `CLIENT_SECRET`: OAuth2 client secret, sent with HTTP Basic auth when set
    /// - `REDIRECT_URL`: redirect URI registered with the provider
    /// - `TOKEN_URL`: token endpoint
    /// - `AUTHORIZE_URL`: authorize endpoint (default: derived from `TOKEN_URL`)
    ///
    /// # Errors
    ///
    /// Returns an error when a configured URL does not parse, or when the
    /// callback is half-configured (client id without token or redirect URL).
    pub fn from_env() -> Result<Self, AuthError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AuthError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let jwks_url = match (get("JWKS_URL"), get("ISSUER_URL")) {
            (Some(url), _) => Some(url),
            (None, Some(issuer)) => Some(jwks_url_from_issuer(&issuer)),
            (None, None) => None,
        };

        let jwt = jwks_url
            .map(|url| -> Result<JwtConfig, AuthError> {
                Ok(JwtConfig {
                    jwks_url: parse_url("JWKS_URL", &url)?,
                    refresh_interval: seconds(get("JWKS_REFRESH_SECS"))
                        .unwrap_or(DEFAULT_JWKS_REFRESH),
                    min_refresh_interval: seconds(get("JWKS_MIN_REFRESH_SECS"))
                        .unwrap_or(DEFAULT_JWKS_MIN_REFRESH),
                })
            })
            .transpose()?;

        let oauth = match get("CLIENT_ID") {
            Some(client_id) => {
                let token_url = get("TOKEN_URL")
                    .ok_or_else(|| AuthError::config("TOKEN_URL is required with CLIENT_ID"))?;
                let redirect_url = get("REDIRECT_URL")
                    .ok_or_else(|| AuthError::config("REDIRECT_URL is required with CLIENT_ID"))?;
                let authorize_url = get("AUTHORIZE_URL")
                    .unwrap_or_else(|| authorize_url_from_token_url(&token_url));

                Some(OAuthConfig {
                    client_id,
                    client_secret: get("CLIENT_SECRET"),
                    redirect_url: parse_url("REDIRECT_URL", &redirect_url)?,
                    token_url: parse_url("TOKEN_URL", &token_url)?,
                    authorize_url: parse_url("AUTHORIZE_URL", &authorize_url)?,
                })
            }
            None => None,
        };

        Ok(Self { jwt, oauth })
    }
}

fn parse_url(name: &str, value: &str) -> Result<Url, AuthError> {
    Url::parse(value).map_err(|e| AuthError::config(format!("{name} must be a valid URL: {e}")))
}

fn seconds(value: Option<String>) -> Option<Duration> {
    value
        .and_then(|v| v.parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
}

//! Remote JSON Web Key Set with periodic refresh.

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use async_trait::async_trait;
use jsonwebtoken::{
    jwk::{Jwk, JwkSet},
    Algorithm, DecodingKey,
};
use stackies_core::auth::AuthError as CoreError;
use tokio::{
    sync::{Mutex, RwLock},
    task::JoinHandle,
};
use url::Url;

use crate::{config::JwtConfig, error::AuthError, keys::KeyProvider};

/// Asymmetric algorithms accepted for keys published in a JWKS.
const JWKS_ALGORITHMS: &[Algorithm] = &[
    Algorithm::RS256,
    Algorithm::RS384,
    Algorithm::RS512,
    Algorithm::PS256,
    Algorithm::PS384,
    Algorithm::PS512,
    Algorithm::ES256,
    Algorithm::ES384,
    Algorithm::EdDSA,
];

/// Cached key set fetched from a JWKS endpoint.
///
/// Keys are refreshed on a fixed interval by [`JwksCache::spawn_refresh`] and,
/// at most once per `min_refresh_interval`, when a token names a `kid` the
/// cache does not know. A failed refresh keeps the previous keys.
pub struct JwksCache {
    url: Url,
    http_client: reqwest::Client,
    keys: RwLock<JwkSet>,
    last_refresh: Mutex<Option<Instant>>,
    min_refresh_interval: Duration,
}

impl JwksCache {
    /// Creates an empty cache. Call [`JwksCache::refresh`] before use.
    pub fn new(url: Url, min_refresh_interval: Duration) -> Result<Self, AuthError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| AuthError::Http(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            url,
            http_client,
            keys: RwLock::new(JwkSet { keys: Vec::new() }),
            last_refresh: Mutex::new(None),
            min_refresh_interval,
        })
    }

    /// Creates a cache and performs the initial fetch.
    ///
    /// # Errors
    ///
    /// Fails when the key set cannot be downloaded or parsed.
    pub async fn connect(config: &JwtConfig) -> Result<Self, AuthError> {
        let cache = Self::new(config.jwks_url.clone(), config.min_refresh_interval)?;
        cache.refresh().await?;
        Ok(cache)
    }

    /// Downloads the key set and swaps it in.
    pub async fn refresh(&self) -> Result<(), AuthError> {
        let mut last_refresh = self.last_refresh.lock().await;
        *last_refresh = Some(Instant::now());

        let set = self.download().await?;
        tracing::debug!(url = %self.url, keys = set.keys.len(), "Fetched JWKS");
        *self.keys.write().await = set;
        Ok(())
    }

    /// Starts the periodic refresh task.
    ///
    /// The first refresh runs one `interval` from now. Abort the returned
    /// handle to stop it.
    pub fn spawn_refresh(self: Arc<Self>, interval: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let start = tokio::time::Instant::now() + interval;
            let mut ticker = tokio::time::interval_at(start, interval);
            loop {
                ticker.tick().await;
                if let Err(e) = self.refresh().await {
                    tracing::warn!(url = %self.url, error = %e, "JWKS refresh failed, keeping previous keys");
                }
            }
        })
    }

    /// Key IDs currently cached.
    pub async fn key_ids(&self) -> Vec<String> {
        self.keys
            .read()
            .await
            .keys
            .iter()
            .filter_map(|k| k.common.key_id.clone())
            .collect()
    }

    async fn download(&self) -> Result<JwkSet, AuthError> {
        let response = self
            .http_client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|e| AuthError::Http(e.to_string()))?
            .error_for_status()
            .map_err(|e| AuthError::Http(e.to_string()))?;

        response
            .json::<JwkSet>()
            .await
            .map_err(|e| CoreError::Jwks(format!("invalid key set: {e}")).into())
    }

    async fn lookup(&self, kid: Option<&str>) -> Result<Option<DecodingKey>, AuthError> {
        let set = self.keys.read().await;
        match find_key(&set, kid) {
            Some(jwk) => DecodingKey::from_jwk(jwk)
                .map(Some)
                .map_err(|e| CoreError::Jwks(e.to_string()).into()),
            None => Ok(None),
        }
    }

    /// Refreshes unless the last refresh was too recent.
    ///
    /// Returns whether a refresh succeeded.
    async fn refresh_for_unknown_kid(&self) -> bool {
        {
            let last_refresh = self.last_refresh.lock().await;
            if let Some(at) = *last_refresh {
                if at.elapsed() < self.min_refresh_interval {
                    return false;
                }
            }
        }

        match self.refresh().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(url = %self.url, error = %e, "JWKS refresh for unknown kid failed");
                false
            }
        }
    }
}

/// Picks the key for a `kid`.
///
/// A token without `kid` is accepted only when the set holds exactly one key.
fn find_key<'a>(set: &'a JwkSet, kid: Option<&str>) -> Option<&'a Jwk> {
    match kid {
        Some(kid) => set.find(kid),
        None if set.keys.len() == 1 => set.keys.first(),
        None => None,
    }
}

#[async_trait]
impl KeyProvider for JwksCache {
    async fn decoding_key(&self, kid: Option<&str>) -> Result<DecodingKey, AuthError> {
        if let Some(key) = self.lookup(kid).await? {
            return Ok(key);
        }

        if self.refresh_for_unknown_kid().await {
            if let Some(key) = self.lookup(kid).await? {
                return Ok(key);
            }
        }

        Err(CoreError::KeyNotFound(kid.map(str::to_string)).into())
    }

    fn algorithms(&self) -> &[Algorithm] {
        JWKS_ALGORITHMS
    }
}

#[cfg(test)]
mod tests {
    use std::{
        net::SocketAddr,
        sync::atomic::{AtomicUsize, Ordering},
    };

    use axum::{extract::State, routing::get, Json, Router};
    use serde_json::{json, Value};

    use super::*;

    fn rsa_jwk(kid: &str) -> Value {
        json!({
            "kty": "RSA",
            "kid": kid,
            "alg": "RS256",
            "use": "sig",
            "n": "sXchDaQebHnPiGvyDOAT4saGEUetSyo9MKLOoWFsueri23bOdgWp4Dy1WlUzewbgBHod5pcM9H95GQRV3JDXboIRROSBigeC5yjU1hGzHHyXss8UDprecbAYxknTcQkhslANGRUZmdTOQ5qTRsLAt6BTYuyvVRdhS8exSZEy_c4gs_7svlJJQ4H9_NxsiIoLwAEk7-Q3UXERGYw_75IDrGA84-lA_-Ct4eTlXHBIY2EaV7t7LjJaynVJCpkv4LKjTTAumiGUIuQhrNhZLuF_RJLqHpM2kgWFLU7-VTdL1VbC2tejvcI2BlMkEpk1BzBZI0KQB0GaDWFLN-aEAw3vRw",
            "e": "AQAB"
        })
    }

    struct JwksServer {
        keys: RwLock<Vec<Value>>,
        hits: AtomicUsize,
    }

    async fn serve_jwks(initial: Vec<Value>) -> (Arc<JwksServer>, Url) {
        let server = Arc::new(JwksServer {
            keys: RwLock::new(initial),
            hits: AtomicUsize::new(0),
        });

        let app = Router::new()
            .route(
                "/.well-known/jwks.json",
                get(|State(s): State<Arc<JwksServer>>| async move {
                    s.hits.fetch_add(1, Ordering::SeqCst);
                    Json(json!({ "keys": *s.keys.read().await }))
                }),
            )
            .with_state(server.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr: SocketAddr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let url = Url::parse(&format!("http://{addr}/.well-known/jwks.json")).unwrap();
        (server, url)
    }

    #[tokio::test]
    async fn connect_fetches_keys() {
        let (server, url) = serve_jwks(vec![rsa_jwk("key-1"), rsa_jwk("key-2")]).await;
        let config = JwtConfig {
            jwks_url: url,
            refresh_interval: Duration::from_secs(3600),
            min_refresh_interval: Duration::from_secs(300),
        };

        let cache = JwksCache::connect(&config).await.unwrap();

        assert_eq!(cache.key_ids().await, vec!["key-1", "key-2"]);
        assert_eq!(server.hits.load(Ordering::SeqCst), 1);
        assert!(cache.decoding_key(Some("key-1")).await.is_ok());
    }

    #[tokio::test]
    async fn connect_fails_when_endpoint_is_down() {
        let config = JwtConfig {
            jwks_url: Url::parse("http://127.0.0.1:9/.well-known/jwks.json").unwrap(),
            refresh_interval: Duration::from_secs(3600),
            min_refresh_interval: Duration::from_secs(300),
        };

        assert!(JwksCache::connect(&config).await.is_err());
    }

    #[tokio::test]
    async fn unknown_kid_triggers_refresh() {
        let (server, url) = serve_jwks(vec![rsa_jwk("old")]).await;
        let cache = JwksCache::new(url, Duration::ZERO).unwrap();
        cache.refresh().await.unwrap();

        server.keys.write().await.push(rsa_jwk("rotated"));

        assert!(cache.decoding_key(Some("rotated")).await.is_ok());
        assert_eq!(server.hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn unknown_kid_refresh_is_rate_limited() {
        let (server, url) = serve_jwks(vec![rsa_jwk("only")]).await;
        let cache = JwksCache::new(url, Duration::from_secs(300)).unwrap();
        cache.refresh().await.unwrap();

        let err = cache.decoding_key(Some("missing")).await.err().unwrap();
        assert!(matches!(
            err,
            AuthError::Core(CoreError::KeyNotFound(Some(ref kid))) if kid == "missing"
        ));
        assert_eq!(server.hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn token_without_kid_uses_single_key() {
        let (_server, url) = serve_jwks(vec![rsa_jwk("solo")]).await;
        let cache = JwksCache::new(url, Duration::from_secs(300)).unwrap();
        cache.refresh().await.unwrap();

        assert!(cache.decoding_key(None).await.is_ok());
    }

    #[tokio::test]
    async fn token_without_kid_is_ambiguous_with_many_keys() {
        let (_server, url) = serve_jwks(vec![rsa_jwk("a"), rsa_jwk("b")]).await;
        let cache = JwksCache::new(url, Duration::from_secs(300)).unwrap();
        cache.refresh().await.unwrap();

        assert!(cache.decoding_key(None).await.is_err());
    }

    #[tokio::test]
    async fn failed_refresh_keeps_previous_keys() {
        let (server, url) = serve_jwks(vec![rsa_jwk("stable")]).await;
        let cache = JwksCache::new(url, Duration::ZERO).unwrap();
        cache.refresh().await.unwrap();

        // A key without the required RSA fields makes the document unparseable.
        server.keys.write().await.push(json!({ "kty": "RSA", "kid": "broken" }));

        assert!(cache.refresh().await.is_err());
        assert_eq!(cache.key_ids().await, vec!["stable"]);
    }

    #[tokio::test]
    async fn periodic_refresh_picks_up_rotated_keys_until_aborted() {
        let (server, url) = serve_jwks(vec![rsa_jwk("old")]).await;
        let cache = Arc::new(JwksCache::new(url, Duration::from_secs(300)).unwrap());
        cache.refresh().await.unwrap();
        server.keys.write().await.push(rsa_jwk("rotated"));

        let handle = cache.clone().spawn_refresh(Duration::from_millis(50));

        let deadline = Instant::now() + Duration::from_secs(5);
        while server.hits.load(Ordering::SeqCst) < 3 {
            assert!(Instant::now() < deadline, "refresh task never ran");
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(cache.key_ids().await, vec!["old", "rotated"]);

        handle.abort();
        assert!(handle.await.unwrap_err().is_cancelled());
        tokio::time::sleep(Duration::from_millis(100)).await;

        let hits = server.hits.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(server.hits.load(Ordering::SeqCst), hits);
    }
}

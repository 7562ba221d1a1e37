//! OAuth2 authorization-code callback.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use oauth2::{
    basic::{
        BasicErrorResponse, BasicRevocationErrorResponse, BasicTokenIntrospectionResponse,
        BasicTokenType,
    },
    reqwest::async_http_client,
    AuthType, AuthUrl, AuthorizationCode, Client, ClientId, ClientSecret, ExtraTokenFields,
    RedirectUrl, RequestTokenError, StandardRevocableToken, StandardTokenResponse,
    TokenResponse as _, TokenUrl,
};
use serde::{Deserialize, Serialize};
use stackies_core::auth::{validate_callback, AuthError as CoreError, CallbackParams, TokenResponse};

use crate::{config::OAuthConfig, error::AuthError};

/// Token endpoint fields beyond RFC 6749.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdTokenFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_token: Option<String>,
}

impl ExtraTokenFields for IdTokenFields {}

type ProviderTokenResponse = StandardTokenResponse<IdTokenFields, BasicTokenType>;

type ProviderClient = Client<
    BasicErrorResponse,
    ProviderTokenResponse,
    BasicTokenType,
    BasicTokenIntrospectionResponse,
    StandardRevocableToken,
    BasicRevocationErrorResponse,
>;

/// Exchanges authorization codes at the provider's token endpoint.
///
/// `client_id` always travels in the form body. With a client secret the
/// request also carries HTTP Basic credentials.
#[derive(Clone)]
pub struct CodeExchanger {
    client: Arc<ProviderClient>,
    /// Set when Basic auth would otherwise keep `client_id` out of the body.
    body_client_id: Option<String>,
}

impl CodeExchanger {
    pub fn new(config: &OAuthConfig) -> Self {
        let auth_url = AuthUrl::from_url(config.authorize_url.clone());
        let token_url = TokenUrl::from_url(config.token_url.clone());
        let redirect_url = RedirectUrl::from_url(config.redirect_url.clone());

        let client = ProviderClient::new(
            ClientId::new(config.client_id.clone()),
            config.client_secret.clone().map(ClientSecret::new),
            auth_url,
            Some(token_url),
        )
        .set_auth_type(AuthType::BasicAuth)
        .set_redirect_uri(redirect_url);

        Self {
            client: Arc::new(client),
            body_client_id: config
                .client_secret
                .as_ref()
                .map(|_| config.client_id.clone()),
        }
    }

    /// Trades `code` for tokens.
    pub async fn exchange(&self, code: &str) -> Result<TokenResponse, AuthError> {
        let mut request = self
            .client
            .exchange_code(AuthorizationCode::new(code.to_string()));
        if let Some(client_id) = &self.body_client_id {
            request = request.add_extra_param("client_id", client_id.clone());
        }

        let token = request
            .request_async(async_http_client)
            .await
            .map_err(|e| {
                let reason = match e {
                    RequestTokenError::ServerResponse(response) => response.to_string(),
                    other => other.to_string(),
                };
                CoreError::CodeExchange(reason)
            })?;

        Ok(TokenResponse {
            access_token: token.access_token().secret().clone(),
            id_token: token.extra_fields().id_token.clone().unwrap_or_default(),
            refresh_token: token
                .refresh_token()
                .map(|t| t.secret().clone())
                .unwrap_or_default(),
            expires_in: token.expires_in().map(|d| d.as_secs()).unwrap_or_default(),
            token_type: token_type_name(token.token_type()),
        })
    }
}

fn token_type_name(token_type: &BasicTokenType) -> String {
    match token_type {
        BasicTokenType::Bearer => "Bearer".to_string(),
        BasicTokenType::Mac => "MAC".to_string(),
        BasicTokenType::Extension(other) => other.clone(),
    }
}

/// Creates the callback router.
///
/// Routes:
/// - `GET /callback` - Exchange the authorization code for tokens
pub fn callback_routes() -> Router<CodeExchanger> {
    Router::new().route("/callback", get(callback))
}

async fn callback(
    State(exchanger): State<CodeExchanger>,
    Query(params): Query<CallbackParams>,
) -> Result<Json<TokenResponse>, AuthError> {
    let code = validate_callback(&params)?;

    let tokens = exchanger.exchange(code).await?;
    tracing::info!(token_type = %tokens.token_type, expires_in = tokens.expires_in, "Code exchanged");

    Ok(Json(tokens))
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;

    use axum::{
        body::Body,
        http::{header::AUTHORIZATION, HeaderMap, Request, StatusCode},
        routing::post,
        Form,
    };
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use url::Url;

    use super::*;

    async fn mock_token_endpoint(
        headers: HeaderMap,
        Form(form): Form<std::collections::HashMap<String, String>>,
    ) -> (StatusCode, Json<Value>) {
        // Confidential clients authenticate with Basic auth, public ones do not.
        let basic_auth = headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("Basic "));
        let expected_auth = form.get("client_secret").is_none()
            && match form.get("client_id").map(String::as_str) {
                Some("client") => basic_auth,
                Some("public-client") => !basic_auth,
                _ => false,
            };

        let good_request = expected_auth
            && form.get("grant_type").map(String::as_str) == Some("authorization_code")
            && form.get("redirect_uri").map(String::as_str)
                == Some("http://localhost:8080/callback")
            && form.get("code").map(String::as_str) == Some("good-code");

        if good_request {
            (
                StatusCode::OK,
                Json(json!({
                    "access_token": "access-123",
                    "id_token": "id-456",
                    "refresh_token": "refresh-789",
                    "expires_in": 3600,
                    "token_type": "Bearer"
                })),
            )
        } else {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "invalid_grant" })),
            )
        }
    }

    async fn serve_token_endpoint() -> Url {
        let app = Router::new().route("/oauth2/token", post(mock_token_endpoint));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr: SocketAddr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Url::parse(&format!("http://{addr}/oauth2/token")).unwrap()
    }

    fn oauth_config(token_url: Url) -> OAuthConfig {
        OAuthConfig {
            client_id: "client".to_string(),
            client_secret: Some("secret".to_string()),
            redirect_url: Url::parse("http://localhost:8080/callback").unwrap(),
            authorize_url: Url::parse("http://localhost/oauth2/authorize").unwrap(),
            token_url,
        }
    }

    fn exchanger(token_url: Url) -> CodeExchanger {
        CodeExchanger::new(&oauth_config(token_url))
    }

    async fn get_callback(exchanger: CodeExchanger, query: &str) -> (StatusCode, Value) {
        let app = callback_routes().with_state(exchanger);
        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/callback{query}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn provider_error_is_400() {
        let exchanger = exchanger(Url::parse("http://127.0.0.1:9/token").unwrap());
        let (status, body) = get_callback(exchanger, "?error=access_denied").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!("authentication error: access_denied"));
    }

    #[tokio::test]
    async fn missing_code_is_400() {
        let exchanger = exchanger(Url::parse("http://127.0.0.1:9/token").unwrap());
        let (status, body) = get_callback(exchanger, "").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!("missing code"));
    }

    #[tokio::test]
    async fn successful_exchange_returns_tokens() {
        let exchanger = exchanger(serve_token_endpoint().await);
        let (status, body) = get_callback(exchanger, "?code=good-code&state=xyz").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "access_token": "access-123",
                "id_token": "id-456",
                "refresh_token": "refresh-789",
                "expires_in": 3600,
                "token_type": "Bearer"
            })
        );
    }

    #[tokio::test]
    async fn rejected_code_is_500() {
        let exchanger = exchanger(serve_token_endpoint().await);
        let (status, body) = get_callback(exchanger, "?code=bad-code").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let message = body.as_str().unwrap();
        assert!(message.starts_with("token exchange failed: "));
        assert!(message.contains("invalid_grant"));
    }

    #[tokio::test]
    async fn exchange_sends_client_id_alongside_basic_auth() {
        let exchanger = exchanger(serve_token_endpoint().await);

        let tokens = exchanger.exchange("good-code").await.unwrap();

        assert_eq!(tokens.access_token, "access-123");
    }

    #[tokio::test]
    async fn public_client_sends_client_id_without_basic_auth() {
        let config = OAuthConfig {
            client_id: "public-client".to_string(),
            client_secret: None,
            ..oauth_config(serve_token_endpoint().await)
        };

        let tokens = CodeExchanger::new(&config).exchange("good-code").await.unwrap();

        assert_eq!(tokens.id_token, "id-456");
    }
}

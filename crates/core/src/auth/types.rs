use serde::{Deserialize, Serialize};

/// Verified JWT claims, kept as the raw JSON object.
pub type Claims = serde_json::Map<String, serde_json::Value>;

/// Tokens returned to the browser after a successful code exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub id_token: String,
    pub refresh_token: String,
    pub expires_in: u64,
    pub token_type: String,
}

/// Query parameters on the OAuth2 redirect.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

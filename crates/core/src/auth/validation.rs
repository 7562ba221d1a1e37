use super::{AuthError, CallbackParams};

/// Extracts the token from an `Authorization` header value.
///
/// The scheme must be exactly `Bearer ` (capital B, one space) and the token
/// must be non-empty.
///
/// # Examples
///
/// ```
/// use stackies_core::auth::extract_bearer;
///
/// assert_eq!(extract_bearer("Bearer abc.def.ghi"), Some("abc.def.ghi"));
/// assert_eq!(extract_bearer("Basic dXNlcjpwYXNz"), None);
/// ```
pub fn extract_bearer(header_value: &str) -> Option<&str> {
    header_value
        .strip_prefix("Bearer ")
        .filter(|token| !token.is_empty())
}

/// Checks the redirect parameters and returns the authorization code.
///
/// An `error` from the provider wins over a code; a missing or empty code is
/// rejected.
pub fn validate_callback(params: &CallbackParams) -> Result<&str, AuthError> {
    if let Some(error) = params.error.as_deref().filter(|e| !e.is_empty()) {
        return Err(AuthError::Provider(error.to_string()));
    }

    params
        .code
        .as_deref()
        .filter(|code| !code.is_empty())
        .ok_or(AuthError::MissingCode)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_bearer_token() {
        assert_eq!(extract_bearer("Bearer token123"), Some("token123"));
    }

    #[test]
    fn rejects_other_schemes() {
        assert_eq!(extract_bearer("Basic abc"), None);
        assert_eq!(extract_bearer("bearer abc"), None);
        assert_eq!(extract_bearer("Bearerabc"), None);
        assert_eq!(extract_bearer(""), None);
    }

    #[test]
    fn rejects_empty_token() {
        assert_eq!(extract_bearer("Bearer "), None);
    }

    #[test]
    fn callback_error_takes_precedence() {
        let params = CallbackParams {
            code: Some("abc".to_string()),
            error: Some("access_denied".to_string()),
            state: None,
        };
        assert_eq!(
            validate_callback(&params),
            Err(AuthError::Provider("access_denied".to_string()))
        );
    }

    #[test]
    fn callback_requires_code() {
        assert_eq!(
            validate_callback(&CallbackParams::default()),
            Err(AuthError::MissingCode)
        );

        let params = CallbackParams {
            code: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(validate_callback(&params), Err(AuthError::MissingCode));
    }

    #[test]
    fn callback_returns_code() {
        let params = CallbackParams {
            code: Some("xyz".to_string()),
            ..Default::default()
        };
        assert_eq!(validate_callback(&params), Ok("xyz"));
    }
}

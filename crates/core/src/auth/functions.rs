/// Standard JWKS location for an OIDC issuer.
///
/// A trailing slash on the issuer is ignored.
pub fn jwks_url_from_issuer(issuer: &str) -> String {
    format!("{}/.well-known/jwks.json", issuer.trim_end_matches('/'))
}

/// Derives the authorize endpoint from a token endpoint.
///
/// Hosted login pages put both endpoints side by side
/// (`…/oauth2/token` and `…/oauth2/authorize`), so the last path segment is
/// replaced with `authorize`.
pub fn authorize_url_from_token_url(token_url: &str) -> String {
    let trimmed = token_url.trim_end_matches('/');
    match trimmed.rsplit_once('/') {
        Some((base, _)) => format!("{base}/authorize"),
        None => format!("{trimmed}/authorize"),
    }
}

use std::collections::BTreeMap;
use std::net::SocketAddr;

use super::MASK;

/// Headers whose values never reach the log.
const MASKED_HEADERS: &[&str] = &["authorization", "cookie"];

/// Flattens header pairs into a name → value map for logging.
///
/// Repeated headers are joined with `", "`. `Authorization` and `Cookie`
/// values are replaced by the mask.
pub fn format_headers<'a, I>(headers: I) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut result: BTreeMap<String, String> = BTreeMap::new();

    for (name, value) in headers {
        if MASKED_HEADERS.iter().any(|h| h.eq_ignore_ascii_case(name)) {
            result.insert(name.to_string(), MASK.to_string());
            continue;
        }

        result
            .entry(name.to_string())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(value);
            })
            .or_insert_with(|| value.to_string());
    }

    result
}

/// Renders a body for the log.
///
/// JSON content types are pretty-printed when the body parses; everything
/// else is decoded as lossy UTF-8. The output is cut to `max_len` bytes.
/// Empty bodies render as `None`.
pub fn render_body(body: &[u8], content_type: Option<&str>, max_len: usize) -> Option<String> {
    if body.is_empty() {
        return None;
    }

    let is_json = content_type
        .map(|ct| ct.contains("application/json"))
        .unwrap_or(false);

    let rendered = if is_json {
        serde_json::from_slice::<serde_json::Value>(body)
            .ok()
            .and_then(|v| serde_json::to_string_pretty(&v).ok())
            .unwrap_or_else(|| String::from_utf8_lossy(body).into_owned())
    } else {
        String::from_utf8_lossy(body).into_owned()
    };

    Some(truncate_utf8(rendered, max_len))
}

/// Truncates a string to at most `max_len` bytes without splitting a char.
pub fn truncate_utf8(mut s: String, max_len: usize) -> String {
    if s.len() <= max_len {
        return s;
    }
    let mut cut = max_len;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    s.truncate(cut);
    s
}

/// Resolves the client address.
///
/// Prefers the first `X-Forwarded-For` hop, then `X-Real-IP`, then the
/// socket peer.
pub fn real_ip(
    forwarded_for: Option<&str>,
    x_real_ip: Option<&str>,
    peer: Option<SocketAddr>,
) -> Option<String> {
    if let Some(first) = forwarded_for
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
    {
        return Some(first.to_string());
    }

    if let Some(ip) = x_real_ip.map(str::trim).filter(|v| !v.is_empty()) {
        return Some(ip.to_string());
    }

    peer.map(|addr| addr.ip().to_string())
}

//! Request/response body logging.
//!
//! Captures a bounded prefix of both bodies, forwards them untouched, and
//! writes one structured event per exchange with sensitive JSON fields and
//! credential headers masked.

use std::{net::SocketAddr, sync::Arc, time::Instant};

use axum::{
    body::{Body, Bytes},
    extract::{ConnectInfo, Request, State},
    http::{
        header::{CONTENT_TYPE, HOST, USER_AGENT},
        HeaderMap, StatusCode,
    },
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use futures_util::{future, stream, StreamExt};
use http_body_util::BodyExt;
use stackies_core::audit::{
    format_headers, mask_sensitive_data, real_ip, render_body, AuditLevel, AuditRecord,
    BodyDumpConfig,
};
use uuid::Uuid;

/// Logs masked request and response bodies.
///
/// Skipped and excluded requests pass straight through. Install with
/// `middleware::from_fn_with_state(config, body_dump)`.
pub async fn body_dump(
    State(config): State<Arc<BodyDumpConfig>>,
    request: Request,
    next: Next,
) -> Response {
    if config.should_skip(request.method().as_str(), request.uri().path()) {
        return next.run(request).await;
    }

    let request_id = Uuid::new_v4();
    let start_time = Instant::now();

    let (parts, body) = request.into_parts();
    let (request_capture, body) = match capture(body, config.capture_limit).await {
        Ok(captured) => captured,
        Err(e) => {
            tracing::warn!(request_id = %request_id, error = %e, "Failed to read request body");
            return (StatusCode::BAD_REQUEST, Json(e.to_string())).into_response();
        }
    };

    let method = parts.method.to_string();
    let uri = parts.uri.to_string();
    let request_headers = header_pairs(&parts.headers);
    let request_content_type = header_value(&parts.headers, CONTENT_TYPE.as_str());
    let host = header_value(&parts.headers, HOST.as_str());
    let user_agent = header_value(&parts.headers, USER_AGENT.as_str());
    let remote_ip = real_ip(
        header_value(&parts.headers, "x-forwarded-for").as_deref(),
        header_value(&parts.headers, "x-real-ip").as_deref(),
        parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr),
    );

    let response = next.run(Request::from_parts(parts, body)).await;

    let (parts, body) = response.into_parts();
    let (response_capture, body) = match capture(body, config.capture_limit).await {
        Ok(captured) => captured,
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "Failed to read response body");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json("failed to read response body"),
            )
                .into_response();
        }
    };

    let mut record = AuditRecord::new(
        method,
        uri,
        parts.status.as_u16(),
        start_time.elapsed(),
        Utc::now(),
    );
    record.remote_ip = remote_ip;
    record.host = host;
    record.user_agent = user_agent;
    record.request_headers = request_headers;
    record.response_headers = header_pairs(&parts.headers);
    record.request_body = logged_body(&config, &request_capture, request_content_type.as_deref());
    record.response_body = logged_body(
        &config,
        &response_capture,
        header_value(&parts.headers, CONTENT_TYPE.as_str()).as_deref(),
    );

    emit(&record, request_id);

    Response::from_parts(parts, body)
}

/// Body prefix held back for the log.
struct Captured {
    bytes: Bytes,
    /// False when the body continues past the capture limit.
    complete: bool,
}

/// Reads at most about `limit` bytes of `body`.
///
/// Returns the captured prefix and a body that yields the same bytes as the
/// original: the prefix first, then whatever was left unread.
async fn capture(mut body: Body, limit: usize) -> Result<(Captured, Body), axum::Error> {
    let mut buffer = Vec::new();

    while buffer.len() < limit {
        let Some(frame) = body.frame().await else {
            let bytes = Bytes::from(buffer);
            let captured = Captured {
                bytes: bytes.clone(),
                complete: true,
            };
            return Ok((captured, Body::from(bytes)));
        };
        if let Ok(data) = frame?.into_data() {
            buffer.extend_from_slice(&data);
        }
    }

    let prefix = Bytes::from(buffer);
    let replay = stream::once(future::ready(Ok::<_, axum::Error>(prefix.clone())));
    let body = Body::from_stream(replay.chain(body.into_data_stream()));

    Ok((
        Captured {
            bytes: prefix,
            complete: false,
        },
        body,
    ))
}

/// Masks and renders a captured body.
///
/// A partial capture cannot be parsed, so its sensitive fields cannot be
/// masked; only its size is logged.
fn logged_body(
    config: &BodyDumpConfig,
    captured: &Captured,
    content_type: Option<&str>,
) -> Option<String> {
    if !captured.complete {
        return Some(format!(
            "[body exceeds {} bytes, not logged]",
            config.capture_limit
        ));
    }

    let masked = mask_sensitive_data(&captured.bytes, &config.mask_fields);
    render_body(&masked, content_type, config.max_body_size)
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn header_pairs(headers: &HeaderMap) -> std::collections::BTreeMap<String, String> {
    format_headers(
        headers
            .iter()
            .filter_map(|(name, value)| Some((name.as_str(), value.to_str().ok()?))),
    )
}

macro_rules! audit_event {
    ($level:ident, $record:expr, $request_id:expr) => {
        tracing::$level!(
            request_id = %$request_id,
            time = %$record.time,
            remote_ip = $record.remote_ip.as_deref(),
            host = $record.host.as_deref(),
            method = %$record.method,
            uri = %$record.uri,
            user_agent = $record.user_agent.as_deref(),
            status = $record.status,
            duration = %$record.duration,
            duration_ms = $record.duration_ms,
            request_headers = ?$record.request_headers,
            response_headers = ?$record.response_headers,
            request_body = $record.request_body.as_deref(),
            response_body = $record.response_body.as_deref(),
            "Body dump"
        )
    };
}

fn emit(record: &AuditRecord, request_id: Uuid) {
    match record.level() {
        AuditLevel::Info => audit_event!(info, record, request_id),
        AuditLevel::Warn => audit_event!(warn, record, request_id),
        AuditLevel::Error => audit_event!(error, record, request_id),
    }
}

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

/// Log level chosen from the response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditLevel {
    Info,
    Warn,
    Error,
}

impl AuditLevel {
    pub fn for_status(status: u16) -> Self {
        match status {
            500.. => AuditLevel::Error,
            400..=499 => AuditLevel::Warn,
            _ => AuditLevel::Info,
        }
    }
}

/// One logged request/response exchange.
#[derive(Debug, Clone, Serialize)]
pub struct AuditRecord {
    pub time: String,
    pub remote_ip: Option<String>,
    pub host: Option<String>,
    pub method: String,
    pub uri: String,
    pub user_agent: Option<String>,
    pub status: u16,
    pub duration: String,
    pub duration_ms: f64,
    pub request_headers: BTreeMap<String, String>,
    pub response_headers: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_body: Option<String>,
}

impl AuditRecord {
    /// Stamps the completion time and elapsed duration.
    ///
    /// The remaining fields start empty and are filled by the caller.
    pub fn new(
        method: impl Into<String>,
        uri: impl Into<String>,
        status: u16,
        elapsed: Duration,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            time: now.to_rfc3339_opts(SecondsFormat::Secs, true),
            remote_ip: None,
            host: None,
            method: method.into(),
            uri: uri.into(),
            user_agent: None,
            status,
            duration: format!("{elapsed:?}"),
            duration_ms: elapsed.as_secs_f64() * 1000.0,
            request_headers: BTreeMap::new(),
            response_headers: BTreeMap::new(),
            request_body: None,
            response_body: None,
        }
    }

    pub fn level(&self) -> AuditLevel {
        AuditLevel::for_status(self.status)
    }
}

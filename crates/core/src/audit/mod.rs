//! Request/response audit logging ("body dump") logic.
//!
//! Everything here is pure: the axum middleware in the server crate buffers
//! the bodies and hands them to these functions for masking and formatting.

mod config;
mod format;
mod masking;
mod record;

pub use config::{
    BodyDumpConfig, Skipper, DEFAULT_CAPTURE_LIMIT, DEFAULT_MASK_FIELDS, DEFAULT_MAX_BODY_SIZE,
};
pub use format::{format_headers, real_ip, render_body, truncate_utf8};
pub use masking::{mask_json_value, mask_sensitive_data, MASK};
pub use record::{AuditLevel, AuditRecord};

/// Default limit for logged bodies (10 KiB).
pub const DEFAULT_MAX_BODY_SIZE: usize = 10 * 1024;

/// Default number of body bytes held in memory per direction (1 MiB).
///
/// Anything past this streams through without being captured.
pub const DEFAULT_CAPTURE_LIMIT: usize = 1024 * 1024;

/// JSON keys masked when no list is configured.
pub const DEFAULT_MASK_FIELDS: &[&str] = &["password", "token", "secret", "authorization", "api_key"];

/// Decides from the request method and path that an exchange is not logged.
pub type Skipper = fn(method: &str, path: &str) -> bool;

/// Body dump settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyDumpConfig {
    /// Maximum number of body bytes written to the log.
    pub max_body_size: usize,
    /// Maximum number of body bytes buffered for logging, per direction.
    pub capture_limit: usize,
    /// Requests for which this returns true are not logged.
    pub skipper: Option<Skipper>,
    /// Requests whose path contains any of these are not logged.
    pub exclude_urls: Vec<String>,
    /// JSON keys whose values are replaced before logging.
    pub mask_fields: Vec<String>,
}

impl Default for BodyDumpConfig {
    fn default() -> Self {
        Self {
            max_body_size: DEFAULT_MAX_BODY_SIZE,
            capture_limit: DEFAULT_CAPTURE_LIMIT,
            skipper: None,
            exclude_urls: Vec::new(),
            mask_fields: DEFAULT_MASK_FIELDS.iter().map(|f| f.to_string()).collect(),
        }
    }
}

impl BodyDumpConfig {
    /// Fills unset values with defaults.
    ///
    /// A zero `max_body_size` or `capture_limit` means "not configured", not
    /// "log nothing". The capture limit never drops below the logged size.
    pub fn normalized(mut self) -> Self {
        if self.max_body_size == 0 {
            self.max_body_size = DEFAULT_MAX_BODY_SIZE;
        }
        if self.capture_limit == 0 {
            self.capture_limit = DEFAULT_CAPTURE_LIMIT;
        }
        self.capture_limit = self.capture_limit.max(self.max_body_size);
        self
    }

    /// Whether an exchange bypasses the dump.
    ///
    /// The skipper is consulted first, then the excluded paths.
    pub fn should_skip(&self, method: &str, path: &str) -> bool {
        self.skipper.is_some_and(|skip| skip(method, path)) || self.is_excluded(path)
    }

    /// Whether the request path matches an excluded pattern.
    pub fn is_excluded(&self, path: &str) -> bool {
        self.exclude_urls
            .iter()
            .any(|pattern| !pattern.is_empty() && path.contains(pattern.as_str()))
    }
}

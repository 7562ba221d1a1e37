use stackies_core::audit::{BodyDumpConfig, DEFAULT_CAPTURE_LIMIT, DEFAULT_MAX_BODY_SIZE};

/// Connection settings for the Postgres pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub max_connections: u32,
}

impl DatabaseConfig {
    /// Connection target without the password, for logs.
    pub fn display_url(&self) -> String {
        format!(
            "postgres://{}@{}:{}/{}",
            self.user, self.host, self.port, self.name
        )
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    /// Body dump settings, `None` when disabled.
    pub body_dump: Option<BodyDumpConfig>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `DB_HOST` - Postgres host (default: "localhost")
    /// - `DB_PORT` - Postgres port (default: 5432)
    /// - `DB_USER` - Postgres user (default: "postgres")
    /// - `DB_PASSWORD` - Postgres password (default: "postgres")
    /// - `DB_NAME` - Database name (default: "stackies_dev")
    /// - `DB_MAX_CONNECTIONS` - Pool size (default: 5)
    /// - `BODY_DUMP` - Log request/response bodies (default: true)
    /// - `BODY_DUMP_MAX_BYTES` - Logged body limit (default: 10240)
    /// - `BODY_DUMP_BUFFER_LIMIT` - Body bytes held in memory per direction (default: 1048576)
    /// - `BODY_DUMP_EXCLUDE` - Comma-separated path patterns to skip
    /// - `BODY_DUMP_MASK_FIELDS` - Comma-separated JSON keys to mask
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database = DatabaseConfig {
            host: get("DB_HOST").unwrap_or_else(|| "localhost".to_string()),
            port: get("DB_PORT").and_then(|v| v.parse().ok()).unwrap_or(5432),
            user: get("DB_USER").unwrap_or_else(|| "postgres".to_string()),
            password: get("DB_PASSWORD").unwrap_or_else(|| "postgres".to_string()),
            name: get("DB_NAME").unwrap_or_else(|| "stackies_dev".to_string()),
            max_connections: get("DB_MAX_CONNECTIONS")
                .and_then(|v| v.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(5),
        };

        let body_dump_enabled = get("BODY_DUMP").map(|v| parse_bool(&v)).unwrap_or(true);

        let body_dump = body_dump_enabled.then(|| {
            let defaults = BodyDumpConfig::default();
            BodyDumpConfig {
                max_body_size: get("BODY_DUMP_MAX_BYTES")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_MAX_BODY_SIZE),
                capture_limit: get("BODY_DUMP_BUFFER_LIMIT")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_CAPTURE_LIMIT),
                skipper: None,
                exclude_urls: get("BODY_DUMP_EXCLUDE")
                    .map(|v| split_list(&v))
                    .unwrap_or_default(),
                mask_fields: get("BODY_DUMP_MASK_FIELDS")
                    .map(|v| split_list(&v))
                    .unwrap_or(defaults.mask_fields),
            }
            .normalized()
        });

        Self {
            database,
            body_dump,
        }
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

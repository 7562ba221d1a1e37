//! Postgres schema definitions and SQL query constants.
//!
//! Pure data, no I/O.

/// SQL statement to create the experiences table.
pub const CREATE_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS experiences (
    id BIGSERIAL PRIMARY KEY,
    title TEXT NOT NULL UNIQUE CHECK (btrim(title) <> '')
)
"#;

/// Insert an experience and return its database-assigned id.
pub const INSERT_EXPERIENCE: &str = "INSERT INTO experiences (title) VALUES ($1) RETURNING id";

/// Every experience in insertion order.
pub const SELECT_EXPERIENCES: &str = "SELECT id, title FROM experiences ORDER BY id";

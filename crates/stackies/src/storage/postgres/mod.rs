//! Postgres storage backend implementation.
//!
//! Uses an `sqlx::PgPool` with runtime-checked queries, so no database is
//! needed at build time.

mod error;
mod repository;
mod schema;

pub use repository::PostgresRepository;

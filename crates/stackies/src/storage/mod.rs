//! Storage backend implementations.
//!
//! This module provides concrete implementations of
//! `stackies_core::storage::ExperienceRepository`.
//!
//! # Feature Flags
//!
//! - `postgres` (default): Postgres storage backend using `sqlx`
//!
//! The in-memory backend is always compiled in. It backs `--in-memory` runs
//! and the router tests.
//!
//! # Examples
//!
//! Build without Postgres:
//! ```bash
//! cargo build -p stackies --no-default-features
//! ```

pub mod inmemory;

#[cfg(feature = "postgres")]
pub mod postgres;

pub use inmemory::InMemoryRepository;

#[cfg(feature = "postgres")]
pub use postgres::PostgresRepository;

//! In-memory storage backend.
//!
//! Stores experiences in a `Vec` behind `Arc<RwLock<_>>`. Data is not
//! persisted and is lost when the process exits.
//!
//! # Example
//!
//! ```rust,ignore
//! use stackies::storage::inmemory::InMemoryRepository;
//!
//! let repo = InMemoryRepository::new();
//! ```

mod repository;

pub use repository::InMemoryRepository;

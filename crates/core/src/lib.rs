//! Functional core for stackies.
//!
//! Pure types and functions shared by the server and the auth crate. Nothing in
//! here talks to the network or a database; the I/O lives in `stackies` and
//! `stackies_auth`.

pub mod audit;
pub mod auth;
pub mod experience;
pub mod storage;

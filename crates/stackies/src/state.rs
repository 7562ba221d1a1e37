//! Application state.
//!
//! Shared by every request handler. The experience use case wraps a
//! repository trait object so the router runs unchanged against Postgres or
//! the in-memory backend.

use std::sync::Arc;

use stackies_auth::{CodeExchanger, JwtVerifier};
use stackies_core::audit::BodyDumpConfig;
use stackies_core::experience::ExperienceService;
use stackies_core::storage::ExperienceRepository;

use crate::storage::InMemoryRepository;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Experience use case.
    pub experiences: ExperienceService,
    /// Bearer verification for `/experiences`. `None` leaves the routes open.
    pub verifier: Option<JwtVerifier>,
    /// OAuth2 code exchange. `None` means `/callback` is not mounted.
    pub exchanger: Option<CodeExchanger>,
    /// Body dump settings. `None` disables the middleware.
    pub body_dump: Option<Arc<BodyDumpConfig>>,
}

impl AppState {
    /// Creates a state over the given repository with every optional layer off.
    pub fn new(repository: Arc<dyn ExperienceRepository>) -> Self {
        Self {
            experiences: ExperienceService::new(repository),
            verifier: None,
            exchanger: None,
            body_dump: None,
        }
    }

    pub fn with_verifier(mut self, verifier: JwtVerifier) -> Self {
        self.verifier = Some(verifier);
        self
    }

    pub fn with_exchanger(mut self, exchanger: CodeExchanger) -> Self {
        self.exchanger = Some(exchanger);
        self
    }

    pub fn with_body_dump(mut self, config: BodyDumpConfig) -> Self {
        self.body_dump = Some(Arc::new(config.normalized()));
        self
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Arc::new(InMemoryRepository::new()))
    }
}

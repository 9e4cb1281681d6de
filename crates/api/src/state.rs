use std::sync::Arc;

use social_core::validation::ValidationRules;
use social_db::Storage;

use crate::config::ServerConfig;
use crate::identity::IdentityResolver;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: every field is an `Arc` or a bundle of `Arc`s.
#[derive(Clone)]
pub struct AppState {
    /// Storage capabilities (Postgres in production, in-memory in tests).
    pub storage: Storage,
    pub config: Arc<ServerConfig>,
    /// Validation rule set, built once at start-up.
    pub rules: Arc<ValidationRules>,
    /// Supplies the viewer's user id for feed, follow and authoring routes.
    pub identity: Arc<dyn IdentityResolver>,
}

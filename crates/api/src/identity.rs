//! Viewer identity.
//!
//! Handlers never look up "who is asking" themselves; they take a [`Viewer`]
//! extractor, which asks the [`IdentityResolver`] held in [`AppState`].

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use social_core::error::CoreError;
use social_core::types::DbId;

use crate::error::AppError;
use crate::state::AppState;

/// Supplies the authenticated viewer's user id for a request.
pub trait IdentityResolver: Send + Sync {
    /// `None` means the request carries no usable identity.
    fn resolve(&self, parts: &Parts) -> Option<DbId>;
}

/// Resolver that reports the same user for every request.
#[derive(Debug, Clone, Copy)]
pub struct FixedIdentity(pub DbId);

impl IdentityResolver for FixedIdentity {
    fn resolve(&self, _parts: &Parts) -> Option<DbId> {
        Some(self.0)
    }
}

/// The user on whose behalf the request runs.
#[derive(Debug, Clone, Copy)]
pub struct Viewer {
    pub user_id: DbId,
}

impl FromRequestParts<AppState> for Viewer {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        state
            .identity
            .resolve(parts)
            .map(|user_id| Viewer { user_id })
            .ok_or_else(|| AppError::Core(CoreError::Unauthorized("No viewer identity".into())))
    }
}

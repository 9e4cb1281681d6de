//! Entity context extractors.
//!
//! A handler that operates on an existing post or user takes the loaded row as
//! an argument instead of fetching it itself. A missing row rejects the
//! request with 404 before the handler runs.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use social_core::types::DbId;
use social_db::models::post::Post;
use social_db::models::user::User;

use crate::error::AppError;
use crate::extract::ApiPath;
use crate::state::AppState;

/// The post addressed by `/posts/{id}`.
#[derive(Debug, Clone)]
pub struct PostContext(pub Post);

impl FromRequestParts<AppState> for PostContext {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let ApiPath(post_id) = ApiPath::<DbId>::from_request_parts(parts, state).await?;
        let post = state.storage.posts.get_by_id(post_id).await?;
        Ok(PostContext(post))
    }
}

/// The user addressed by `/users/{id}`.
#[derive(Debug, Clone)]
pub struct UserContext(pub User);

impl FromRequestParts<AppState> for UserContext {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let ApiPath(user_id) = ApiPath::<DbId>::from_request_parts(parts, state).await?;
        let user = state.storage.users.get_by_id(user_id).await?;
        Ok(UserContext(user))
    }
}

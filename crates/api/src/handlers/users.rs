//! Handlers for user lookup and follow edges.
//!
//! `{id}` in the path is always the target; the follower is the viewer.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use social_core::error::CoreError;
use social_core::types::DbId;
use social_db::StoreError;

use crate::error::{AppError, AppResult};
use crate::extract::ApiPath;
use crate::identity::Viewer;
use crate::middleware::context::UserContext;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/users/{id}
pub async fn get_user(UserContext(user): UserContext) -> AppResult<impl IntoResponse> {
    Ok(Json(DataResponse { data: user }))
}

/// PUT /api/v1/users/{id}/follow
///
/// 204 on success, 409 if the edge already exists.
pub async fn follow_user(
    viewer: Viewer,
    State(state): State<AppState>,
    UserContext(target): UserContext,
) -> AppResult<impl IntoResponse> {
    if target.id == viewer.user_id {
        return Err(CoreError::field("user_id", "cannot follow yourself").into());
    }

    state
        .storage
        .followers
        .follow(viewer.user_id, target.id)
        .await
        .map_err(|e| match e {
            StoreError::Conflict(_) => {
                AppError::Core(CoreError::Conflict("Already following this user".into()))
            }
            other => AppError::Store(other),
        })?;

    tracing::info!(follower_id = viewer.user_id, user_id = target.id, "Follow edge created");

    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/users/{id}/unfollow
///
/// Always 204; removing an edge that does not exist is a no-op.
pub async fn unfollow_user(
    viewer: Viewer,
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<DbId>,
) -> AppResult<impl IntoResponse> {
    state
        .storage
        .followers
        .unfollow(viewer.user_id, user_id)
        .await?;

    tracing::info!(follower_id = viewer.user_id, user_id, "Follow edge removed");

    Ok(StatusCode::NO_CONTENT)
}

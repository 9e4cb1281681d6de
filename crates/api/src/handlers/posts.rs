//! Handlers for post CRUD.
//!
//! Updates go through the conditional write in
//! [`PostStore::update`](social_db::store::PostStore::update): the handler
//! overlays the payload onto the loaded row and a stale version surfaces as
//! 409 without any retry.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use social_core::types::DbId;
use social_db::models::post::{CreatePost, PostDetail, UpdatePost};
use social_db::models::user::UserSummary;

use crate::error::AppResult;
use crate::extract::{ApiJson, ApiPath};
use crate::identity::Viewer;
use crate::middleware::context::PostContext;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/posts
pub async fn create_post(
    viewer: Viewer,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreatePost>,
) -> AppResult<impl IntoResponse> {
    state.rules.check(&input)?;

    let post = state.storage.posts.create(viewer.user_id, &input).await?;

    tracing::info!(post_id = post.id, user_id = viewer.user_id, "Post created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: post })))
}

/// GET /api/v1/posts/{id}
///
/// The post with its author summary and comments, oldest comment first.
pub async fn get_post(
    State(state): State<AppState>,
    PostContext(post): PostContext,
) -> AppResult<impl IntoResponse> {
    let author = state.storage.users.get_by_id(post.user_id).await?;
    let comments = state.storage.comments.list_by_post(post.id).await?;

    Ok(Json(DataResponse {
        data: PostDetail {
            user: UserSummary::from(&author),
            post,
            comments,
        },
    }))
}

/// PATCH /api/v1/posts/{id}
pub async fn update_post(
    State(state): State<AppState>,
    PostContext(mut post): PostContext,
    ApiJson(input): ApiJson<UpdatePost>,
) -> AppResult<impl IntoResponse> {
    state.rules.check(&input)?;

    input.apply_to(&mut post);
    state.storage.posts.update(&mut post).await?;

    tracing::info!(post_id = post.id, version = post.version, "Post updated");

    Ok(Json(DataResponse { data: post }))
}

/// DELETE /api/v1/posts/{id}
pub async fn delete_post(
    State(state): State<AppState>,
    ApiPath(post_id): ApiPath<DbId>,
) -> AppResult<impl IntoResponse> {
    state.storage.posts.delete(post_id).await?;

    tracing::info!(post_id, "Post deleted");

    Ok(StatusCode::NO_CONTENT)
}

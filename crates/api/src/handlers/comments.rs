use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use social_db::models::comment::CreateComment;

use crate::error::AppResult;
use crate::extract::ApiJson;
use crate::identity::Viewer;
use crate::middleware::context::PostContext;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/posts/{id}/comments
///
/// Append a comment by the viewer. Comments are never edited afterwards.
pub async fn create_comment(
    viewer: Viewer,
    State(state): State<AppState>,
    PostContext(post): PostContext,
    ApiJson(input): ApiJson<CreateComment>,
) -> AppResult<impl IntoResponse> {
    state.rules.check(&input)?;

    let comment = state
        .storage
        .comments
        .create(post.id, viewer.user_id, &input)
        .await?;

    tracing::info!(comment_id = comment.id, post_id = post.id, "Comment created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: comment })))
}

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use social_core::pagination::FeedQuery;

use crate::error::AppResult;
use crate::identity::Viewer;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/users/feed
///
/// Posts by the viewer and by everyone the viewer follows, newest first
/// unless `sort=asc`. Query keys: `limit`, `offset`, `sort`, `tags`
/// (comma-separated), `search`, `since`, `until`. All invalid keys are
/// reported together as a 422.
pub async fn user_feed(
    viewer: Viewer,
    State(state): State<AppState>,
    Query(raw): Query<Vec<(String, String)>>,
) -> AppResult<impl IntoResponse> {
    let query = FeedQuery::default().resolve(
        raw.iter().map(|(k, v)| (k.as_str(), v.as_str())),
        &state.rules,
    )?;

    let posts = state.storage.posts.user_feed(viewer.user_id, &query).await?;

    tracing::debug!(
        viewer_id = viewer.user_id,
        count = posts.len(),
        offset = query.offset,
        "Feed page served"
    );

    Ok(Json(DataResponse { data: posts }))
}

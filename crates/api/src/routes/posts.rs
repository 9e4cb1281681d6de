//! Route definitions for posts and their comments.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{comments, posts};
use crate::state::AppState;

/// Routes mounted at `/posts`.
///
/// ```text
/// POST   /                 -> create_post
/// GET    /{id}             -> get_post
/// PATCH  /{id}             -> update_post
/// DELETE /{id}             -> delete_post
/// POST   /{id}/comments    -> comments::create_comment
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(posts::create_post))
        .route(
            "/{id}",
            get(posts::get_post)
                .patch(posts::update_post)
                .delete(posts::delete_post),
        )
        .route("/{id}/comments", post(comments::create_comment))
}

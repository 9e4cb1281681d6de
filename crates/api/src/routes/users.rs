//! Route definitions for users, follow edges and the feed.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::{feed, users};
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// GET    /feed             -> feed::user_feed
/// GET    /{id}             -> get_user
/// PUT    /{id}/follow      -> follow_user
/// PUT    /{id}/unfollow    -> unfollow_user
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/feed", get(feed::user_feed))
        .route("/{id}", get(users::get_user))
        .route("/{id}/follow", put(users::follow_user))
        .route("/{id}/unfollow", put(users::unfollow_user))
}

pub mod health;
pub mod posts;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /users/feed                   viewer's feed (GET)
/// /users/{id}                   get
/// /users/{id}/follow            follow (PUT)
/// /users/{id}/unfollow          unfollow (PUT)
///
/// /posts                        create (POST)
/// /posts/{id}                   get, update (PATCH), delete
/// /posts/{id}/comments          create comment (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/users", users::router())
        .nest("/posts", posts::router())
}

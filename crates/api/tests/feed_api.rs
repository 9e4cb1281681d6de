//! HTTP tests for the viewer's feed and its query parameters.

mod common;

use axum::http::StatusCode;
use chrono::{Duration, TimeZone, Utc};
use common::{body_json, build_test_app, create_post, create_user, get, post_json, put_empty};
use serde_json::{json, Value};
use social_db::memory::MemoryStore;
use social_db::models::post::CreatePost;
use social_db::store::PostStore;

fn titles(json: &Value) -> Vec<String> {
    json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn feed_contains_own_and_followed_posts_newest_first() {
    let store = MemoryStore::new();
    let alice = create_user(&store, "alice").await;
    let bob = create_user(&store, "bob").await;
    let carol = create_user(&store, "carol").await;

    let base = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
    let own = create_post(&store, alice.id, "Alice writes").await;
    let followed = create_post(&store, bob.id, "Bob writes").await;
    let stranger = create_post(&store, carol.id, "Carol writes").await;
    store.set_post_created_at(own.id, base).await;
    store
        .set_post_created_at(followed.id, base + Duration::hours(1))
        .await;
    store
        .set_post_created_at(stranger.id, base + Duration::hours(2))
        .await;

    let response = put_empty(
        build_test_app(&store, alice.id),
        &format!("/api/v1/users/{}/follow", bob.id),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(build_test_app(&store, alice.id), "/api/v1/users/feed").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(titles(&json), vec!["Bob writes", "Alice writes"]);
    assert_eq!(json["data"][0]["username"], "bob");
    assert_eq!(json["data"][0]["comments_count"], 0);
}

#[tokio::test]
async fn feed_of_user_without_follows_shows_own_posts() {
    let store = MemoryStore::new();
    let alice = create_user(&store, "alice").await;
    create_post(&store, alice.id, "Solo").await;

    let json = body_json(get(build_test_app(&store, alice.id), "/api/v1/users/feed").await).await;

    assert_eq!(titles(&json), vec!["Solo"]);
}

#[tokio::test]
async fn feed_reports_comment_counts() {
    let store = MemoryStore::new();
    let alice = create_user(&store, "alice").await;
    let post = create_post(&store, alice.id, "Discussed").await;
    let uri = format!("/api/v1/posts/{}/comments", post.id);
    for content in ["one", "two", "three"] {
        let response = post_json(
            build_test_app(&store, alice.id),
            &uri,
            json!({ "content": content }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let json = body_json(get(build_test_app(&store, alice.id), "/api/v1/users/feed").await).await;

    assert_eq!(json["data"][0]["comments_count"], 3);
}

#[tokio::test]
async fn unfollowed_author_drops_out_of_feed() {
    let store = MemoryStore::new();
    let alice = create_user(&store, "alice").await;
    let bob = create_user(&store, "bob").await;
    create_post(&store, bob.id, "Bob writes").await;

    put_empty(
        build_test_app(&store, alice.id),
        &format!("/api/v1/users/{}/follow", bob.id),
    )
    .await;
    let json = body_json(get(build_test_app(&store, alice.id), "/api/v1/users/feed").await).await;
    assert_eq!(titles(&json), vec!["Bob writes"]);

    put_empty(
        build_test_app(&store, alice.id),
        &format!("/api/v1/users/{}/unfollow", bob.id),
    )
    .await;
    let json = body_json(get(build_test_app(&store, alice.id), "/api/v1/users/feed").await).await;
    assert!(titles(&json).is_empty());
}

#[tokio::test]
async fn pages_concatenate_to_the_full_ordering() {
    let store = MemoryStore::new();
    let alice = create_user(&store, "alice").await;
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    for i in 0..5 {
        let post = create_post(&store, alice.id, &format!("Post {i}")).await;
        store
            .set_post_created_at(post.id, base + Duration::minutes(i))
            .await;
    }

    let mut seen = Vec::new();
    for offset in [0, 2, 4] {
        let uri = format!("/api/v1/users/feed?limit=2&offset={offset}&sort=asc");
        let json = body_json(get(build_test_app(&store, alice.id), &uri).await).await;
        seen.extend(titles(&json));
    }

    assert_eq!(seen, vec!["Post 0", "Post 1", "Post 2", "Post 3", "Post 4"]);
}

#[tokio::test]
async fn feed_filters_by_tags_and_search() {
    let store = MemoryStore::new();
    let alice = create_user(&store, "alice").await;
    for (title, tags) in [
        ("Async in practice", vec!["rust", "async"]),
        ("Borrowing basics", vec!["rust"]),
        ("Cooking pasta", vec!["food"]),
    ] {
        PostStore::create(
            &store,
            alice.id,
            &CreatePost {
                title: title.to_string(),
                content: "body".to_string(),
                tags: tags.into_iter().map(str::to_string).collect(),
            },
        )
        .await
        .unwrap();
    }

    let json = body_json(
        get(
            build_test_app(&store, alice.id),
            "/api/v1/users/feed?tags=rust,async",
        )
        .await,
    )
    .await;
    assert_eq!(titles(&json), vec!["Async in practice"]);

    let json = body_json(
        get(
            build_test_app(&store, alice.id),
            "/api/v1/users/feed?search=BORROW",
        )
        .await,
    )
    .await;
    assert_eq!(titles(&json), vec!["Borrowing basics"]);
}

#[tokio::test]
async fn feed_filters_by_time_window() {
    let store = MemoryStore::new();
    let alice = create_user(&store, "alice").await;
    let base = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
    for (i, title) in ["Early", "Middle", "Late"].into_iter().enumerate() {
        let post = create_post(&store, alice.id, title).await;
        store
            .set_post_created_at(post.id, base + Duration::days(i as i64))
            .await;
    }

    let uri = "/api/v1/users/feed?since=2024-06-02%2000:00:00&until=2024-06-02T00:00:00Z";
    let json = body_json(get(build_test_app(&store, alice.id), uri).await).await;

    assert_eq!(titles(&json), vec!["Middle"]);
}

#[tokio::test]
async fn invalid_parameters_are_reported_together() {
    let store = MemoryStore::new();
    let alice = create_user(&store, "alice").await;
    let app = build_test_app(&store, alice.id);

    let response = get(app, "/api/v1/users/feed?limit=abc&offset=-1&sort=sideways").await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Validation failed");
    assert_eq!(json["errors"]["limit"], "limit must be an integer");
    assert!(json["errors"]["offset"].is_string());
    assert_eq!(json["errors"]["sort"], "sort must be one of: asc, desc");
}

#[tokio::test]
async fn limit_above_maximum_is_rejected() {
    let store = MemoryStore::new();
    let alice = create_user(&store, "alice").await;
    let app = build_test_app(&store, alice.id);

    let response = get(app, "/api/v1/users/feed?limit=21").await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert!(json["errors"]["limit"].is_string());
}

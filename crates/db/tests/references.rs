//! Writes that reference missing rows must fail the same way on both
//! backends: `NotFound` naming the absent row, never a raw database error.

use assert_matches::assert_matches;
use sqlx::PgPool;
use social_db::memory::MemoryStore;
use social_db::models::comment::CreateComment;
use social_db::models::post::CreatePost;
use social_db::models::user::NewUser;
use social_db::{Storage, StoreError};

fn backends(pool: PgPool) -> [(&'static str, Storage); 2] {
    [
        ("postgres", Storage::postgres(pool)),
        ("memory", MemoryStore::new().storage()),
    ]
}

fn orphan_post() -> CreatePost {
    CreatePost {
        title: "orphan".to_string(),
        content: "no author".to_string(),
        tags: vec!["rust".to_string()],
    }
}

fn comment() -> CreateComment {
    CreateComment {
        content: "hello".to_string(),
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_references_are_not_found_on_every_backend(pool: PgPool) {
    for (backend, storage) in backends(pool) {
        let post = storage.posts.create(999, &orphan_post()).await;
        assert_matches!(
            post,
            Err(StoreError::NotFound { entity: "User", id: 999 }),
            "{backend}: post by missing author"
        );

        let follow = storage.followers.follow(999, 998).await;
        assert_matches!(
            follow,
            Err(StoreError::NotFound { entity: "User", .. }),
            "{backend}: follow between missing users"
        );

        let reply = storage.comments.create(777, 999, &comment()).await;
        assert_matches!(
            reply,
            Err(StoreError::NotFound { entity: "Post", id: 777 }),
            "{backend}: comment on missing post"
        );
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_user_is_named_when_the_other_side_exists(pool: PgPool) {
    for (backend, storage) in backends(pool) {
        let alice = storage
            .users
            .create(&NewUser {
                username: "alice".to_string(),
                email: "alice@example.com".to_string(),
                password_hash: "hash".to_string(),
            })
            .await
            .unwrap()
            .id;
        let post = storage
            .posts
            .create(
                alice,
                &CreatePost {
                    title: "real".to_string(),
                    ..orphan_post()
                },
            )
            .await
            .unwrap();

        assert_matches!(
            storage.comments.create(post.id, 999, &comment()).await,
            Err(StoreError::NotFound { entity: "User", id: 999 }),
            "{backend}: comment by missing user"
        );
        assert_matches!(
            storage.followers.follow(999, alice).await,
            Err(StoreError::NotFound { entity: "User", id: 999 }),
            "{backend}: missing follower"
        );
        assert_matches!(
            storage.followers.follow(alice, 999).await,
            Err(StoreError::NotFound { entity: "User", id: 999 }),
            "{backend}: missing followee"
        );
    }
}

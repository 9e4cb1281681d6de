//! In-memory implementation of every storage capability.
//!
//! Mirrors the PostgreSQL semantics closely enough to stand in for it in
//! tests: unique constraints, foreign keys (a missing referenced row is
//! `NotFound`), cascade on post delete, the version-guarded update, and feed
//! ordering `(created_at, id)`.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use social_core::pagination::{FeedQuery, SortDirection};
use social_core::types::{DbId, Timestamp};
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::models::comment::{Comment, CommentWithAuthor, CreateComment};
use crate::models::post::{CreatePost, Post, PostWithMetadata};
use crate::models::user::{NewUser, User, UserSummary};
use crate::store::{
    CommentStore, FollowerStore, PostStore, Storage, StorageHealth, UserStore,
};

#[derive(Default)]
struct Tables {
    next_id: DbId,
    users: BTreeMap<DbId, User>,
    posts: BTreeMap<DbId, Post>,
    comments: BTreeMap<DbId, Comment>,
    /// `(user_id, follower_id)` pairs.
    followers: BTreeMap<(DbId, DbId), Timestamp>,
}

impl Tables {
    fn allocate_id(&mut self) -> DbId {
        self.next_id += 1;
        self.next_id
    }

    /// Foreign-key check: the referenced user must exist.
    fn require_user(&self, id: DbId) -> Result<(), StoreError> {
        if self.users.contains_key(&id) {
            Ok(())
        } else {
            Err(StoreError::NotFound { entity: "User", id })
        }
    }
}

/// Shared handle to the in-memory tables. Cloning shares the data.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bundle this store behind every capability trait.
    pub fn storage(&self) -> Storage {
        Storage {
            posts: Arc::new(self.clone()),
            users: Arc::new(self.clone()),
            comments: Arc::new(self.clone()),
            followers: Arc::new(self.clone()),
            health: Arc::new(self.clone()),
        }
    }

    /// Overwrite a post's creation time. Lets tests pin feed ordering.
    pub async fn set_post_created_at(&self, id: DbId, created_at: Timestamp) {
        if let Some(post) = self.tables.write().await.posts.get_mut(&id) {
            post.created_at = created_at;
        }
    }
}

impl Storage {
    /// Fresh, empty in-memory storage.
    pub fn in_memory() -> Self {
        MemoryStore::new().storage()
    }
}

#[async_trait]
impl PostStore for MemoryStore {
    async fn create(&self, user_id: DbId, input: &CreatePost) -> Result<Post, StoreError> {
        let mut tables = self.tables.write().await;
        tables.require_user(user_id)?;

        let id = tables.allocate_id();
        let post = Post {
            id,
            title: input.title.clone(),
            content: input.content.clone(),
            user_id,
            version: 0,
            tags: input.tags.clone(),
            created_at: Utc::now(),
            updated_at: None,
        };
        tables.posts.insert(id, post.clone());
        Ok(post)
    }

    async fn get_by_id(&self, id: DbId) -> Result<Post, StoreError> {
        self.tables
            .read()
            .await
            .posts
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound { entity: "Post", id })
    }

    async fn update(&self, post: &mut Post) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        let stored = tables
            .posts
            .get_mut(&post.id)
            .filter(|stored| stored.version == post.version)
            .ok_or(StoreError::PreconditionFailed {
                entity: "Post",
                id: post.id,
                expected_version: post.version,
            })?;

        stored.title = post.title.clone();
        stored.content = post.content.clone();
        stored.version += 1;
        stored.updated_at = Some(Utc::now());

        post.version = stored.version;
        post.updated_at = stored.updated_at;
        Ok(())
    }

    async fn delete(&self, id: DbId) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if tables.posts.remove(&id).is_none() {
            return Err(StoreError::NotFound { entity: "Post", id });
        }
        tables.comments.retain(|_, c| c.post_id != id);
        Ok(())
    }

    async fn user_feed(
        &self,
        viewer_id: DbId,
        query: &FeedQuery,
    ) -> Result<Vec<PostWithMetadata>, StoreError> {
        let tables = self.tables.read().await;

        let mut authors: BTreeSet<DbId> = tables
            .followers
            .keys()
            .filter(|(_, follower_id)| *follower_id == viewer_id)
            .map(|(user_id, _)| *user_id)
            .collect();
        authors.insert(viewer_id);

        let needle = query.search.as_deref().map(str::to_lowercase);

        let mut matching: Vec<&Post> = tables
            .posts
            .values()
            .filter(|p| authors.contains(&p.user_id))
            .filter(|p| query.tags.iter().all(|t| p.tags.contains(t)))
            .filter(|p| match &needle {
                Some(n) => {
                    p.title.to_lowercase().contains(n) || p.content.to_lowercase().contains(n)
                }
                None => true,
            })
            .filter(|p| query.since.map_or(true, |since| p.created_at >= since))
            .filter(|p| query.until.map_or(true, |until| p.created_at <= until))
            .collect();

        matching.sort_by_key(|p| (p.created_at, p.id));
        if query.sort == SortDirection::Desc {
            matching.reverse();
        }

        let offset = usize::try_from(query.offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(query.limit).unwrap_or(0);

        Ok(matching
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|p| PostWithMetadata {
                post: p.clone(),
                username: tables
                    .users
                    .get(&p.user_id)
                    .map(|u| u.username.clone())
                    .unwrap_or_default(),
                comments_count: tables.comments.values().filter(|c| c.post_id == p.id).count()
                    as i64,
            })
            .collect())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create(&self, input: &NewUser) -> Result<User, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.username == input.username) {
            return Err(StoreError::Conflict(
                "duplicate value violates unique constraint uq_users_username".into(),
            ));
        }
        if tables.users.values().any(|u| u.email == input.email) {
            return Err(StoreError::Conflict(
                "duplicate value violates unique constraint uq_users_email".into(),
            ));
        }

        let id = tables.allocate_id();
        let user = User {
            id,
            username: input.username.clone(),
            email: input.email.clone(),
            created_at: Utc::now(),
            updated_at: None,
        };
        tables.users.insert(id, user.clone());
        Ok(user)
    }

    async fn get_by_id(&self, id: DbId) -> Result<User, StoreError> {
        self.tables
            .read()
            .await
            .users
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound { entity: "User", id })
    }
}

#[async_trait]
impl CommentStore for MemoryStore {
    async fn create(
        &self,
        post_id: DbId,
        user_id: DbId,
        input: &CreateComment,
    ) -> Result<Comment, StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.posts.contains_key(&post_id) {
            return Err(StoreError::NotFound {
                entity: "Post",
                id: post_id,
            });
        }
        tables.require_user(user_id)?;

        let id = tables.allocate_id();
        let comment = Comment {
            id,
            post_id,
            user_id,
            content: input.content.clone(),
            created_at: Utc::now(),
        };
        tables.comments.insert(id, comment.clone());
        Ok(comment)
    }

    async fn list_by_post(&self, post_id: DbId) -> Result<Vec<CommentWithAuthor>, StoreError> {
        let tables = self.tables.read().await;
        let mut comments: Vec<CommentWithAuthor> = tables
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .filter_map(|c| {
                tables.users.get(&c.user_id).map(|u| CommentWithAuthor {
                    comment: c.clone(),
                    user: UserSummary::from(u),
                })
            })
            .collect();
        comments.sort_by_key(|c| (c.comment.created_at, c.comment.id));
        Ok(comments)
    }
}

#[async_trait]
impl FollowerStore for MemoryStore {
    async fn follow(&self, follower_id: DbId, user_id: DbId) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        tables.require_user(user_id)?;
        tables.require_user(follower_id)?;
        if tables.followers.contains_key(&(user_id, follower_id)) {
            return Err(StoreError::Conflict(
                "duplicate value violates unique constraint uq_followers_pair".into(),
            ));
        }
        tables.followers.insert((user_id, follower_id), Utc::now());
        Ok(())
    }

    async fn unfollow(&self, follower_id: DbId, user_id: DbId) -> Result<(), StoreError> {
        self.tables
            .write()
            .await
            .followers
            .remove(&(user_id, follower_id));
        Ok(())
    }
}

#[async_trait]
impl StorageHealth for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::Duration;

    async fn user(store: &MemoryStore, name: &str) -> User {
        UserStore::create(
            store,
            &NewUser {
                username: name.into(),
                email: format!("{name}@example.com"),
                password_hash: "x".into(),
            },
        )
        .await
        .unwrap()
    }

    async fn post(store: &MemoryStore, author: DbId, title: &str, tags: &[&str]) -> Post {
        PostStore::create(
            store,
            author,
            &CreatePost {
                title: title.into(),
                content: format!("{title} body"),
                tags: tags.iter().map(|t| t.to_string()).collect(),
            },
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn feed_includes_own_and_followed_posts_only() {
        let store = MemoryStore::new();
        let alice = user(&store, "alice").await;
        let bob = user(&store, "bob").await;
        let carol = user(&store, "carol").await;
        store.follow(alice.id, bob.id).await.unwrap();

        let own = post(&store, alice.id, "mine", &[]).await;
        let followed = post(&store, bob.id, "bobs", &[]).await;
        post(&store, carol.id, "strangers", &[]).await;

        let feed = store.user_feed(alice.id, &FeedQuery::default()).await.unwrap();
        let ids: Vec<DbId> = feed.iter().map(|p| p.post.id).collect();
        assert_eq!(ids, vec![followed.id, own.id]);
        assert_eq!(feed[0].username, "bob");
    }

    #[tokio::test]
    async fn feed_counts_comments_without_duplicating_rows() {
        let store = MemoryStore::new();
        let alice = user(&store, "alice").await;
        let p = post(&store, alice.id, "busy", &[]).await;
        for i in 0..3 {
            CommentStore::create(
                &store,
                p.id,
                alice.id,
                &CreateComment {
                    content: format!("comment {i}"),
                },
            )
            .await
            .unwrap();
        }

        let feed = store.user_feed(alice.id, &FeedQuery::default()).await.unwrap();
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].comments_count, 3);
    }

    #[tokio::test]
    async fn feed_applies_tag_search_and_window_filters() {
        let store = MemoryStore::new();
        let alice = user(&store, "alice").await;
        let old = post(&store, alice.id, "Async Rust", &["rust", "async"]).await;
        let new = post(&store, alice.id, "Gardening", &["rust"]).await;
        let base = Utc::now() - Duration::days(10);
        store.set_post_created_at(old.id, base).await;
        store
            .set_post_created_at(new.id, base + Duration::days(5))
            .await;

        let by_tags = FeedQuery {
            tags: vec!["rust".into(), "async".into()],
            ..FeedQuery::default()
        };
        let feed = store.user_feed(alice.id, &by_tags).await.unwrap();
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].post.id, old.id);

        let by_search = FeedQuery {
            search: Some("garden".into()),
            ..FeedQuery::default()
        };
        let feed = store.user_feed(alice.id, &by_search).await.unwrap();
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].post.id, new.id);

        let by_window = FeedQuery {
            since: Some(base + Duration::days(1)),
            ..FeedQuery::default()
        };
        let feed = store.user_feed(alice.id, &by_window).await.unwrap();
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].post.id, new.id);
    }

    #[tokio::test]
    async fn version_guard_rejects_stale_writer() {
        let store = MemoryStore::new();
        let alice = user(&store, "alice").await;
        let original = post(&store, alice.id, "draft", &[]).await;

        let mut first = original.clone();
        let mut second = original.clone();
        first.title = "first".into();
        second.title = "second".into();

        store.update(&mut first).await.unwrap();
        assert_eq!(first.version, 1);

        let err = store.update(&mut second).await.unwrap_err();
        assert_matches!(
            err,
            StoreError::PreconditionFailed { expected_version: 0, .. }
        );
        assert_eq!(second.version, 0, "failed update must not touch the caller's copy");

        let stored = PostStore::get_by_id(&store, original.id).await.unwrap();
        assert_eq!(stored.title, "first");
        assert_eq!(stored.version, 1);
    }

    #[tokio::test]
    async fn delete_cascades_to_comments() {
        let store = MemoryStore::new();
        let alice = user(&store, "alice").await;
        let p = post(&store, alice.id, "doomed", &[]).await;
        CommentStore::create(
            &store,
            p.id,
            alice.id,
            &CreateComment {
                content: "bye".into(),
            },
        )
        .await
        .unwrap();

        store.delete(p.id).await.unwrap();
        assert!(store.list_by_post(p.id).await.unwrap().is_empty());
        assert_matches!(store.delete(p.id).await, Err(StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn duplicate_username_is_conflict() {
        let store = MemoryStore::new();
        user(&store, "alice").await;
        let err = UserStore::create(
            &store,
            &NewUser {
                username: "alice".into(),
                email: "other@example.com".into(),
                password_hash: "x".into(),
            },
        )
        .await
        .unwrap_err();
        assert_matches!(err, StoreError::Conflict(_));
    }

    #[tokio::test]
    async fn follow_requires_both_users() {
        let store = MemoryStore::new();
        let alice = user(&store, "alice").await;

        assert_matches!(
            store.follow(alice.id, 999).await,
            Err(StoreError::NotFound { entity: "User", id: 999 })
        );
        assert_matches!(
            store.follow(999, alice.id).await,
            Err(StoreError::NotFound { entity: "User", id: 999 })
        );
        assert!(store.tables.read().await.followers.is_empty());
    }

    #[tokio::test]
    async fn writes_referencing_missing_rows_are_not_found() {
        let store = MemoryStore::new();
        let alice = user(&store, "alice").await;
        let p = post(&store, alice.id, "real", &[]).await;
        let input = CreateComment {
            content: "hello".into(),
        };

        let missing_author = PostStore::create(
            &store,
            999,
            &CreatePost {
                title: "orphan".into(),
                content: "nobody wrote this".into(),
                tags: vec![],
            },
        )
        .await;
        assert_matches!(missing_author, Err(StoreError::NotFound { entity: "User", id: 999 }));

        assert_matches!(
            CommentStore::create(&store, 777, alice.id, &input).await,
            Err(StoreError::NotFound { entity: "Post", id: 777 })
        );
        assert_matches!(
            CommentStore::create(&store, p.id, 999, &input).await,
            Err(StoreError::NotFound { entity: "User", id: 999 })
        );
    }
}

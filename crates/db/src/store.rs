//! Storage capability traits.
//!
//! Handlers depend on these traits through [`Storage`], never on a concrete
//! backend, so the PostgreSQL implementation and the in-memory one in
//! [`crate::memory`] are interchangeable.

use std::sync::Arc;

use async_trait::async_trait;
use social_core::pagination::FeedQuery;
use social_core::types::DbId;

use crate::error::StoreError;
use crate::models::comment::{Comment, CommentWithAuthor, CreateComment};
use crate::models::post::{CreatePost, Post, PostWithMetadata};
use crate::models::user::{NewUser, User};
use crate::repositories::{PgCommentStore, PgFollowerStore, PgPostStore, PgUserStore};
use crate::DbPool;

#[async_trait]
pub trait PostStore: Send + Sync {
    /// Insert a post at version 0.
    async fn create(&self, user_id: DbId, input: &CreatePost) -> Result<Post, StoreError>;

    /// Fetch a post, or [`StoreError::NotFound`].
    async fn get_by_id(&self, id: DbId) -> Result<Post, StoreError>;

    /// Write `post.title` / `post.content` if the stored version still equals
    /// `post.version`, advancing it by exactly one.
    ///
    /// On success `post.version` and `post.updated_at` are replaced with the
    /// values the backend returned. If no row matches the id at that version
    /// the result is [`StoreError::PreconditionFailed`] and `post` is left
    /// untouched. No retry is attempted.
    async fn update(&self, post: &mut Post) -> Result<(), StoreError>;

    /// Delete by id. Zero rows affected is [`StoreError::NotFound`].
    async fn delete(&self, id: DbId) -> Result<(), StoreError>;

    /// One page of posts written by `viewer_id` or by anyone `viewer_id`
    /// follows, each with author username and comment count.
    async fn user_feed(
        &self,
        viewer_id: DbId,
        query: &FeedQuery,
    ) -> Result<Vec<PostWithMetadata>, StoreError>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a user. Duplicate username or email is [`StoreError::Conflict`].
    async fn create(&self, input: &NewUser) -> Result<User, StoreError>;

    async fn get_by_id(&self, id: DbId) -> Result<User, StoreError>;
}

#[async_trait]
pub trait CommentStore: Send + Sync {
    async fn create(
        &self,
        post_id: DbId,
        user_id: DbId,
        input: &CreateComment,
    ) -> Result<Comment, StoreError>;

    /// Comments on a post with their authors, oldest first.
    async fn list_by_post(&self, post_id: DbId) -> Result<Vec<CommentWithAuthor>, StoreError>;
}

#[async_trait]
pub trait FollowerStore: Send + Sync {
    /// Insert the edge `follower_id -> user_id`. An existing edge is
    /// [`StoreError::Conflict`].
    async fn follow(&self, follower_id: DbId, user_id: DbId) -> Result<(), StoreError>;

    /// Remove the edge if present. Absence is success.
    async fn unfollow(&self, follower_id: DbId, user_id: DbId) -> Result<(), StoreError>;
}

#[async_trait]
pub trait StorageHealth: Send + Sync {
    async fn ping(&self) -> Result<(), StoreError>;
}

/// The four storage capabilities plus a liveness check.
#[derive(Clone)]
pub struct Storage {
    pub posts: Arc<dyn PostStore>,
    pub users: Arc<dyn UserStore>,
    pub comments: Arc<dyn CommentStore>,
    pub followers: Arc<dyn FollowerStore>,
    pub health: Arc<dyn StorageHealth>,
}

impl Storage {
    /// PostgreSQL-backed storage sharing one pool.
    pub fn postgres(pool: DbPool) -> Self {
        Self {
            posts: Arc::new(PgPostStore::new(pool.clone())),
            users: Arc::new(PgUserStore::new(pool.clone())),
            comments: Arc::new(PgCommentStore::new(pool.clone())),
            followers: Arc::new(PgFollowerStore::new(pool.clone())),
            health: Arc::new(PgHealth { pool }),
        }
    }
}

struct PgHealth {
    pool: DbPool,
}

#[async_trait]
impl StorageHealth for PgHealth {
    async fn ping(&self) -> Result<(), StoreError> {
        crate::bounded(crate::health_check(&self.pool)).await
    }
}

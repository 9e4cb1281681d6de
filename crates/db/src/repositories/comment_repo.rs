//! Repository for the `comments` table.

use async_trait::async_trait;
use social_core::types::DbId;

use crate::error::StoreError;
use crate::models::comment::{Comment, CommentAuthorRow, CommentWithAuthor, CreateComment};
use crate::store::CommentStore;
use crate::{bounded, DbPool};

pub struct PgCommentStore {
    pool: DbPool,
}

impl PgCommentStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentStore for PgCommentStore {
    async fn create(
        &self,
        post_id: DbId,
        user_id: DbId,
        input: &CreateComment,
    ) -> Result<Comment, StoreError> {
        bounded(
            sqlx::query_as::<_, Comment>(
                "INSERT INTO comments (post_id, user_id, content)
                 VALUES ($1, $2, $3)
                 RETURNING id, post_id, user_id, content, created_at",
            )
            .bind(post_id)
            .bind(user_id)
            .bind(&input.content)
            .fetch_one(&self.pool),
        )
        .await
        .map_err(|e| {
            e.missing_reference(|constraint| match constraint {
                "fk_comments_post" => ("Post", post_id),
                _ => ("User", user_id),
            })
        })
    }

    async fn list_by_post(&self, post_id: DbId) -> Result<Vec<CommentWithAuthor>, StoreError> {
        let rows = bounded(
            sqlx::query_as::<_, CommentAuthorRow>(
                "SELECT c.id, c.post_id, c.user_id, c.content, c.created_at, u.username
                 FROM comments c
                 JOIN users u ON u.id = c.user_id
                 WHERE c.post_id = $1
                 ORDER BY c.created_at ASC, c.id ASC",
            )
            .bind(post_id)
            .fetch_all(&self.pool),
        )
        .await?;

        Ok(rows.into_iter().map(CommentAuthorRow::into_view).collect())
    }
}

//! Repository for the `posts` table, including feed aggregation and the
//! version-guarded update.

use async_trait::async_trait;
use social_core::pagination::FeedQuery;
use social_core::types::{DbId, Timestamp};

use crate::error::StoreError;
use crate::models::post::{CreatePost, Post, PostWithMetadata};
use crate::store::PostStore;
use crate::{bounded, DbPool};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, content, user_id, version, tags, created_at, updated_at";

pub struct PgPostStore {
    pool: DbPool,
}

impl PgPostStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostStore for PgPostStore {
    async fn create(&self, user_id: DbId, input: &CreatePost) -> Result<Post, StoreError> {
        let query = format!(
            "INSERT INTO posts (title, content, user_id, tags)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        bounded(
            sqlx::query_as::<_, Post>(&query)
                .bind(&input.title)
                .bind(&input.content)
                .bind(user_id)
                .bind(&input.tags)
                .fetch_one(&self.pool),
        )
        .await
        .map_err(|e| e.missing_reference(|_| ("User", user_id)))
    }

    async fn get_by_id(&self, id: DbId) -> Result<Post, StoreError> {
        let query = format!("SELECT {COLUMNS} FROM posts WHERE id = $1");
        bounded(
            sqlx::query_as::<_, Post>(&query)
                .bind(id)
                .fetch_optional(&self.pool),
        )
        .await?
        .ok_or(StoreError::NotFound { entity: "Post", id })
    }

    async fn update(&self, post: &mut Post) -> Result<(), StoreError> {
        // Single statement: the compare and the increment are one atomic write.
        let row = bounded(
            sqlx::query_as::<_, (i64, Timestamp)>(
                "UPDATE posts
                 SET title = $1, content = $2, version = version + 1, updated_at = NOW()
                 WHERE id = $3 AND version = $4
                 RETURNING version, updated_at",
            )
            .bind(&post.title)
            .bind(&post.content)
            .bind(post.id)
            .bind(post.version)
            .fetch_optional(&self.pool),
        )
        .await?;

        match row {
            Some((version, updated_at)) => {
                post.version = version;
                post.updated_at = Some(updated_at);
                Ok(())
            }
            None => Err(StoreError::PreconditionFailed {
                entity: "Post",
                id: post.id,
                expected_version: post.version,
            }),
        }
    }

    async fn delete(&self, id: DbId) -> Result<(), StoreError> {
        let result = bounded(
            sqlx::query("DELETE FROM posts WHERE id = $1")
                .bind(id)
                .execute(&self.pool),
        )
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound { entity: "Post", id });
        }
        Ok(())
    }

    async fn user_feed(
        &self,
        viewer_id: DbId,
        query: &FeedQuery,
    ) -> Result<Vec<PostWithMetadata>, StoreError> {
        // Comment counts come from a grouped sub-select so a post with N
        // comments still yields exactly one row.
        let sql = format!(
            "SELECT p.id, p.title, p.content, p.user_id, p.version, p.tags,
                    p.created_at, p.updated_at, u.username,
                    COALESCE(c.comments_count, 0) AS comments_count
             FROM posts p
             JOIN users u ON u.id = p.user_id
             LEFT JOIN (
                 SELECT post_id, COUNT(*) AS comments_count
                 FROM comments
                 GROUP BY post_id
             ) c ON c.post_id = p.id
             WHERE (p.user_id = $1
                    OR p.user_id IN (SELECT f.user_id FROM followers f WHERE f.follower_id = $1))
               AND (cardinality($4::text[]) = 0 OR p.tags @> $4::text[])
               AND ($5::text IS NULL OR p.title ILIKE $5 OR p.content ILIKE $5)
               AND ($6::timestamptz IS NULL OR p.created_at >= $6)
               AND ($7::timestamptz IS NULL OR p.created_at <= $7)
             ORDER BY p.created_at {dir}, p.id {dir}
             LIMIT $2 OFFSET $3",
            dir = query.sort.as_sql(),
        );

        bounded(
            sqlx::query_as::<_, PostWithMetadata>(&sql)
                .bind(viewer_id)
                .bind(query.limit)
                .bind(query.offset)
                .bind(&query.tags)
                .bind(query.search.as_deref().map(like_pattern))
                .bind(query.since)
                .bind(query.until)
                .fetch_all(&self.pool),
        )
        .await
    }
}

/// Wrap user text as a `LIKE` substring pattern, escaping its wildcards.
fn like_pattern(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + 2);
    escaped.push('%');
    for ch in text.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

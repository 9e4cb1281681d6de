//! Repository for the `followers` table.

use async_trait::async_trait;
use social_core::types::DbId;

use crate::error::StoreError;
use crate::store::FollowerStore;
use crate::{bounded, DbPool};

pub struct PgFollowerStore {
    pool: DbPool,
}

impl PgFollowerStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FollowerStore for PgFollowerStore {
    async fn follow(&self, follower_id: DbId, user_id: DbId) -> Result<(), StoreError> {
        // A duplicate edge surfaces as `StoreError::Conflict` via the
        // unique-violation mapping in `StoreError::from`.
        bounded(
            sqlx::query("INSERT INTO followers (user_id, follower_id) VALUES ($1, $2)")
                .bind(user_id)
                .bind(follower_id)
                .execute(&self.pool),
        )
        .await
        .map_err(|e| {
            e.missing_reference(|constraint| match constraint {
                "fk_followers_follower" => ("User", follower_id),
                _ => ("User", user_id),
            })
        })?;
        Ok(())
    }

    async fn unfollow(&self, follower_id: DbId, user_id: DbId) -> Result<(), StoreError> {
        bounded(
            sqlx::query("DELETE FROM followers WHERE user_id = $1 AND follower_id = $2")
                .bind(user_id)
                .bind(follower_id)
                .execute(&self.pool),
        )
        .await?;
        Ok(())
    }
}

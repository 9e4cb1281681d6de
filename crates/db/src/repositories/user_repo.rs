//! Repository for the `users` table.

use async_trait::async_trait;
use social_core::types::DbId;

use crate::error::StoreError;
use crate::models::user::{NewUser, User};
use crate::store::UserStore;
use crate::{bounded, DbPool};

/// Public columns. `password_hash` is write-only and never selected.
const COLUMNS: &str = "id, username, email, created_at, updated_at";

pub struct PgUserStore {
    pool: DbPool,
}

impl PgUserStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create(&self, input: &NewUser) -> Result<User, StoreError> {
        let query = format!(
            "INSERT INTO users (username, email, password_hash)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        bounded(
            sqlx::query_as::<_, User>(&query)
                .bind(&input.username)
                .bind(&input.email)
                .bind(&input.password_hash)
                .fetch_one(&self.pool),
        )
        .await
    }

    async fn get_by_id(&self, id: DbId) -> Result<User, StoreError> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        bounded(
            sqlx::query_as::<_, User>(&query)
                .bind(id)
                .fetch_optional(&self.pool),
        )
        .await?
        .ok_or(StoreError::NotFound { entity: "User", id })
    }
}

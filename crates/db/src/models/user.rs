//! User rows and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use social_core::types::{DbId, Timestamp};

/// A row from the `users` table. The password hash is never selected.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub created_at: Timestamp,
    pub updated_at: Option<Timestamp>,
}

/// Author summary embedded in post and comment views.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct UserSummary {
    pub id: DbId,
    pub username: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
        }
    }
}

/// Insert payload for `users`. Carries an already-hashed credential.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

//! Comment rows and DTOs. Comments are append-only.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use social_core::types::{DbId, Timestamp};

use crate::models::user::UserSummary;

/// A row from the `comments` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Comment {
    pub id: DbId,
    pub post_id: DbId,
    pub user_id: DbId,
    pub content: String,
    pub created_at: Timestamp,
}

/// A comment joined with its author, as shown on the post detail view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommentWithAuthor {
    #[serde(flatten)]
    pub comment: Comment,
    pub user: UserSummary,
}

/// Flat row shape for the comment/author join.
#[derive(Debug, FromRow)]
pub(crate) struct CommentAuthorRow {
    #[sqlx(flatten)]
    pub comment: Comment,
    pub username: String,
}

impl CommentAuthorRow {
    pub(crate) fn into_view(self) -> CommentWithAuthor {
        let user = UserSummary {
            id: self.comment.user_id,
            username: self.username,
        };
        CommentWithAuthor {
            comment: self.comment,
            user,
        }
    }
}

/// Request body for `POST /posts/{id}/comments`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateComment {
    #[validate(length(min = 1, max = 1000))]
    pub content: String,
}

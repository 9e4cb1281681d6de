//! Post rows, feed rows and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use social_core::types::{DbId, Timestamp};

use crate::models::comment::CommentWithAuthor;
use crate::models::user::UserSummary;

/// A row from the `posts` table.
///
/// `version` starts at 0 and only moves through the conditional update in
/// [`PostStore::update`](crate::store::PostStore::update).
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Post {
    pub id: DbId,
    pub title: String,
    pub content: String,
    pub user_id: DbId,
    pub version: i64,
    pub tags: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Option<Timestamp>,
}

/// Feed entry: a post with its author's username and comment count.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct PostWithMetadata {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub post: Post,
    pub username: String,
    pub comments_count: i64,
}

/// Detail view: the post with its author and comments attached.
#[derive(Debug, Clone, Serialize)]
pub struct PostDetail {
    #[serde(flatten)]
    pub post: Post,
    pub user: UserSummary,
    pub comments: Vec<CommentWithAuthor>,
}

/// Request body for `POST /posts`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreatePost {
    #[validate(length(min = 1, max = 100))]
    pub title: String,
    #[validate(length(min = 1, max = 1000))]
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Request body for `PATCH /posts/{id}`. Absent fields keep their value.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdatePost {
    #[validate(length(min = 3, max = 100))]
    pub title: Option<String>,
    #[validate(length(min = 3, max = 1000))]
    pub content: Option<String>,
    /// Version the client read. When absent the freshly loaded version is
    /// used, so only a concurrent writer between load and write can conflict.
    #[validate(range(min = 0))]
    pub version: Option<i64>,
}

impl UpdatePost {
    /// Overlay the present fields onto a previously loaded post.
    ///
    /// A supplied `version` becomes the expected version for the conditional
    /// write; it is never incremented here.
    pub fn apply_to(self, post: &mut Post) {
        if let Some(version) = self.version {
            post.version = version;
        }
        if let Some(title) = self.title {
            post.title = title;
        }
        if let Some(content) = self.content {
            post.content = content;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn post() -> Post {
        Post {
            id: 7,
            title: "Original title".into(),
            content: "Original content".into(),
            user_id: 1,
            version: 3,
            tags: vec!["rust".into()],
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn absent_fields_keep_prior_values() {
        let mut p = post();
        UpdatePost {
            title: Some("New title".into()),
            content: None,
            version: None,
        }
        .apply_to(&mut p);

        assert_eq!(p.title, "New title");
        assert_eq!(p.content, "Original content");
        assert_eq!(p.version, 3);
    }

    #[test]
    fn supplied_version_becomes_expected_version() {
        let mut p = post();
        UpdatePost {
            content: Some("Edited content".into()),
            version: Some(1),
            ..Default::default()
        }
        .apply_to(&mut p);

        assert_eq!(p.version, 1);
        assert_eq!(p.title, "Original title");
        assert_eq!(p.content, "Edited content");
    }

    #[test]
    fn feed_row_serializes_flat() {
        let row = PostWithMetadata {
            post: post(),
            username: "alice".into(),
            comments_count: 2,
        };
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["username"], "alice");
        assert_eq!(json["comments_count"], 2);
        assert_eq!(json["version"], 3);
    }
}

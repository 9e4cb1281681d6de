//! PostgreSQL repositories.
//!
//! Each repository owns a clone of the pool and implements one storage
//! capability trait from [`crate::store`]. Every statement runs under
//! [`crate::QUERY_TIMEOUT`].

pub mod comment_repo;
pub mod follower_repo;
pub mod post_repo;
pub mod user_repo;

pub use comment_repo::PgCommentStore;
pub use follower_repo::PgFollowerStore;
pub use post_repo::PgPostStore;
pub use user_repo::PgUserStore;

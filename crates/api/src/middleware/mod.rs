//! Request-scoped extractors that run before a handler body.
//!
//! - [`context::PostContext`] -- Loads the post named by the `{id}` path segment.
//! - [`context::UserContext`] -- Loads the user named by the `{id}` path segment.

pub mod context;

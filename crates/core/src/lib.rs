//! Domain building blocks shared by the storage and HTTP layers.
//!
//! This crate performs no I/O: it holds the id/timestamp aliases, the error
//! taxonomy, the feed query resolver and the validation rule set.

pub mod error;
pub mod pagination;
pub mod password;
pub mod types;
pub mod validation;

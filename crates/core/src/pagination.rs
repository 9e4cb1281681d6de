//! Feed pagination and filter parameters.
//!
//! [`FeedQuery::resolve`] turns untrusted query-string pairs into a bounded
//! query. Parse failures and structural failures are gathered into a single
//! [`CoreError::Validation`] map rather than stopping at the first problem.

use std::borrow::Cow;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::error::CoreError;
use crate::types::Timestamp;
use crate::validation::{FieldErrors, ValidationRules};

// ---------------------------------------------------------------------------
// Bounds
// ---------------------------------------------------------------------------

/// Page size used when the client does not send `limit`.
pub const DEFAULT_FEED_LIMIT: i64 = 20;

/// Largest accepted `limit`.
pub const MAX_FEED_LIMIT: i64 = 20;

/// Most tags a single feed request may filter on.
pub const MAX_FEED_TAGS: usize = 5;

/// Longest accepted `search` string, in characters.
pub const MAX_SEARCH_LEN: u64 = 100;

/// Alternative to RFC 3339 accepted for `since` / `until` (interpreted as UTC).
const PLAIN_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ---------------------------------------------------------------------------
// Sort direction
// ---------------------------------------------------------------------------

/// Ordering of the feed by post creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    /// Parse the wire value. Case-sensitive: only `asc` and `desc`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "asc" => Some(SortDirection::Asc),
            "desc" => Some(SortDirection::Desc),
            _ => None,
        }
    }

    /// SQL keyword for `ORDER BY`. Never derived from client input.
    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

// ---------------------------------------------------------------------------
// Feed query
// ---------------------------------------------------------------------------

/// A validated, bounded feed request. Built per request, never stored.
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct FeedQuery {
    #[validate(range(min = 1, max = MAX_FEED_LIMIT))]
    pub limit: i64,
    #[validate(range(min = 0))]
    pub offset: i64,
    pub sort: SortDirection,
    /// Posts must carry every listed tag.
    #[validate(custom(function = "validate_tag_count"))]
    pub tags: Vec<String>,
    /// Case-insensitive match against title or content.
    #[validate(length(max = MAX_SEARCH_LEN))]
    pub search: Option<String>,
    /// Inclusive lower bound on `created_at`.
    pub since: Option<Timestamp>,
    /// Inclusive upper bound on `created_at`.
    pub until: Option<Timestamp>,
}

impl Default for FeedQuery {
    fn default() -> Self {
        Self {
            limit: DEFAULT_FEED_LIMIT,
            offset: 0,
            sort: SortDirection::Desc,
            tags: Vec::new(),
            search: None,
            since: None,
            until: None,
        }
    }
}

impl FeedQuery {
    /// Override `self` (the defaults) with recognised keys from `raw`.
    ///
    /// Unknown keys are ignored. Every parse failure and every bound violation
    /// is reported in one error map. No side effects.
    pub fn resolve<'a, I>(self, raw: I, rules: &ValidationRules) -> Result<FeedQuery, CoreError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut query = self;
        let mut errors = FieldErrors::new();

        for (key, value) in raw {
            match key {
                "limit" => match value.trim().parse::<i64>() {
                    Ok(limit) => query.limit = limit,
                    Err(_) => {
                        errors.insert("limit".into(), "limit must be an integer".into());
                    }
                },
                "offset" => match value.trim().parse::<i64>() {
                    Ok(offset) => query.offset = offset,
                    Err(_) => {
                        errors.insert("offset".into(), "offset must be an integer".into());
                    }
                },
                "sort" => match SortDirection::parse(value) {
                    Some(sort) => query.sort = sort,
                    None => {
                        errors.insert("sort".into(), "sort must be one of: asc, desc".into());
                    }
                },
                "tags" => {
                    query.tags = value
                        .split(',')
                        .map(str::trim)
                        .filter(|t| !t.is_empty())
                        .map(str::to_string)
                        .collect();
                }
                "search" => {
                    let trimmed = value.trim();
                    query.search = (!trimmed.is_empty()).then(|| trimmed.to_string());
                }
                "since" => match parse_timestamp(value) {
                    Some(ts) => query.since = Some(ts),
                    None => {
                        errors.insert("since".into(), timestamp_reason("since"));
                    }
                },
                "until" => match parse_timestamp(value) {
                    Some(ts) => query.until = Some(ts),
                    None => {
                        errors.insert("until".into(), timestamp_reason("until"));
                    }
                },
                _ => {}
            }
        }

        // Parse errors take precedence over structural ones for the same field.
        for (field, reason) in rules.collect(&query) {
            errors.entry(field).or_insert(reason);
        }

        if let (Some(since), Some(until)) = (query.since, query.until) {
            if since > until {
                errors
                    .entry("until".into())
                    .or_insert_with(|| "until must not be earlier than since".into());
            }
        }

        if errors.is_empty() {
            Ok(query)
        } else {
            Err(CoreError::Validation(errors))
        }
    }
}

fn validate_tag_count(tags: &[String]) -> Result<(), ValidationError> {
    if tags.len() > MAX_FEED_TAGS {
        return Err(ValidationError::new("tags").with_message(Cow::Owned(format!(
            "at most {MAX_FEED_TAGS} tags are allowed"
        ))));
    }
    Ok(())
}

fn parse_timestamp(value: &str) -> Option<Timestamp> {
    let value = value.trim();
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, PLAIN_TIMESTAMP_FORMAT)
                .ok()
                .map(|naive| naive.and_utc())
        })
}

fn timestamp_reason(field: &str) -> String {
    format!("{field} must be an RFC 3339 timestamp or YYYY-MM-DD HH:MM:SS")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

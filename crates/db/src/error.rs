use social_core::types::DbId;

/// PostgreSQL SQLSTATE for `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

/// PostgreSQL SQLSTATE for `foreign_key_violation`.
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Failure of a storage operation.
///
/// Every backend reports through this type so the HTTP layer can translate
/// it in one place.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// A uniqueness constraint rejected the write.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Conditional update matched no row at the expected version.
    #[error("{entity} {id} is no longer at version {expected_version}")]
    PreconditionFailed {
        entity: &'static str,
        id: DbId,
        expected_version: i64,
    },

    /// A write referenced a row that does not exist. Carries the name of the
    /// violated foreign key until [`StoreError::missing_reference`] resolves
    /// it to a [`StoreError::NotFound`].
    #[error("missing referenced row ({0})")]
    MissingReference(String),

    #[error("storage call exceeded {}s", crate::QUERY_TIMEOUT.as_secs())]
    Timeout,

    #[error("database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let constraint = db_err.constraint().unwrap_or("unknown").to_string();
            match db_err.code().as_deref() {
                Some(UNIQUE_VIOLATION) => {
                    return StoreError::Conflict(format!(
                        "duplicate value violates unique constraint {constraint}"
                    ));
                }
                Some(FOREIGN_KEY_VIOLATION) => return StoreError::MissingReference(constraint),
                _ => {}
            }
        }
        StoreError::Database(err)
    }
}

impl StoreError {
    /// Turn [`StoreError::MissingReference`] into the `NotFound` of the row
    /// the violated constraint points at. `resolve` maps a constraint name to
    /// that row; every other error passes through unchanged.
    pub(crate) fn missing_reference(
        self,
        resolve: impl FnOnce(&str) -> (&'static str, DbId),
    ) -> Self {
        match self {
            StoreError::MissingReference(constraint) => {
                let (entity, id) = resolve(&constraint);
                StoreError::NotFound { entity, id }
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn non_database_errors_stay_database() {
        assert_matches!(
            StoreError::from(sqlx::Error::RowNotFound),
            StoreError::Database(sqlx::Error::RowNotFound)
        );
        assert_matches!(
            StoreError::from(sqlx::Error::PoolTimedOut),
            StoreError::Database(_)
        );
    }

    #[test]
    fn missing_reference_resolves_to_not_found() {
        let err = StoreError::MissingReference("fk_comments_post".into()).missing_reference(
            |constraint| match constraint {
                "fk_comments_post" => ("Post", 7),
                _ => ("User", 3),
            },
        );
        assert_matches!(err, StoreError::NotFound { entity: "Post", id: 7 });

        assert_matches!(
            StoreError::Timeout.missing_reference(|_| ("User", 1)),
            StoreError::Timeout
        );
    }

    #[test]
    fn timeout_message_names_the_bound() {
        assert_eq!(StoreError::Timeout.to_string(), "storage call exceeded 15s");
    }
}

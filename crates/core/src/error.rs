use crate::types::DbId;
use crate::validation::FieldErrors;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// Per-field structural errors, keyed by field name.
    #[error("Validation failed: {}", format_fields(.0))]
    Validation(FieldErrors),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// A conditional update matched no row at the expected version.
    #[error("Precondition failed: {entity} {id} is no longer at version {expected_version}")]
    PreconditionFailed {
        entity: &'static str,
        id: DbId,
        expected_version: i64,
    },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}

impl CoreError {
    /// Shorthand for a validation error on a single field.
    pub fn field(field: &str, reason: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(field.to_string(), reason.into());
        CoreError::Validation(errors)
    }
}

fn format_fields(errors: &FieldErrors) -> String {
    errors
        .iter()
        .map(|(field, reason)| format!("{field}: {reason}"))
        .collect::<Vec<_>>()
        .join("; ")
}

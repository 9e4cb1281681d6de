//! Immutable validation rule set.
//!
//! [`ValidationRules`] is built once at start-up and shared (behind an `Arc`)
//! with every handler. It runs `validator`-derived checks and turns the result
//! into a flat `field -> reason` map so callers see every failure at once.

use std::collections::{BTreeMap, HashMap};

use serde_json::Value;
use validator::{Validate, ValidationError};

use crate::error::CoreError;

/// Field name to human-readable reason. Ordered for stable responses.
pub type FieldErrors = BTreeMap<String, String>;

/// Message used when a failure code has no template.
const FALLBACK_MESSAGE: &str = "Invalid value";

/// Explicitly constructed set of validation message rules.
///
/// Codes registered with [`ValidationRules::with_message`] always produce the
/// given text. `required`, `length` and `range` are rendered from the failing
/// field and the bounds recorded by `validator`. A message attached directly
/// to a `#[validate(...)]` attribute wins over everything else.
#[derive(Debug, Clone)]
pub struct ValidationRules {
    fixed: HashMap<&'static str, &'static str>,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationRules {
    pub fn new() -> Self {
        Self {
            fixed: HashMap::new(),
        }
    }

    /// Register a fixed message for a failure code. Consumes the builder so a
    /// rule set cannot change once it has been handed to the router.
    pub fn with_message(mut self, code: &'static str, message: &'static str) -> Self {
        self.fixed.insert(code, message);
        self
    }

    /// Validate `value`, returning [`CoreError::Validation`] with every failing
    /// field if anything is wrong.
    pub fn check<T: Validate>(&self, value: &T) -> Result<(), CoreError> {
        let errors = self.collect(value);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(CoreError::Validation(errors))
        }
    }

    /// Validate `value` and return the flattened field errors (empty if valid).
    pub fn collect<T: Validate>(&self, value: &T) -> FieldErrors {
        let mut out = FieldErrors::new();
        let Err(errors) = value.validate() else {
            return out;
        };

        for (field, failures) in errors.field_errors() {
            let field = field.to_string();
            // First failure per field is enough for the client.
            if let Some(first) = failures.first() {
                let reason = self.describe(&field, first);
                out.insert(field, reason);
            }
        }
        out
    }

    fn describe(&self, field: &str, err: &ValidationError) -> String {
        if let Some(message) = &err.message {
            return message.to_string();
        }
        if let Some(fixed) = self.fixed.get(err.code.as_ref()) {
            return (*fixed).to_string();
        }

        let min = err.params.get("min").map(display_param);
        let max = err.params.get("max").map(display_param);

        match err.code.as_ref() {
            "required" => format!("{field} is required"),
            "length" => match (min, max) {
                (Some(min), Some(max)) => {
                    format!("{field} must be between {min} and {max} characters")
                }
                (Some(min), None) => format!("{field} must be at least {min} characters"),
                (None, Some(max)) => format!("{field} must be at most {max} characters"),
                (None, None) => FALLBACK_MESSAGE.to_string(),
            },
            "range" => match (min, max) {
                (Some(min), Some(max)) => format!("{field} must be between {min} and {max}"),
                (Some(min), None) => format!("{field} must be at least {min}"),
                (None, Some(max)) => format!("{field} must be at most {max}"),
                (None, None) => FALLBACK_MESSAGE.to_string(),
            },
            _ => FALLBACK_MESSAGE.to_string(),
        }
    }
}

/// Render a `validator` bound without a trailing `.0` on whole numbers.
fn display_param(value: &Value) -> String {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.to_string()
            } else if let Some(f) = n.as_f64().filter(|f| f.fract() == 0.0) {
                format!("{}", f as i64)
            } else {
                n.to_string()
            }
        }
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

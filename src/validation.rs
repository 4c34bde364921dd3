//! Payload Validation
//!
//! Flattens `validator` derive output into a flat list of field errors.

use serde::Serialize;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Dotted path of the offending field (`images.0.url`)
    pub field: String,
    /// Human-readable message
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Validates a payload against its declared rules.
///
/// Returns an empty list when the payload is valid. Errors are sorted by
/// field path so output is stable across runs.
pub fn validate<T: Validate>(payload: &T) -> Vec<FieldError> {
    let mut out = Vec::new();
    if let Err(errors) = payload.validate() {
        flatten("", &errors, &mut out);
    }
    out.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.message.cmp(&b.message)));
    out
}

fn flatten(prefix: &str, errors: &ValidationErrors, out: &mut Vec<FieldError>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };

        match kind {
            ValidationErrorsKind::Field(list) => {
                for err in list {
                    let message = match &err.message {
                        Some(msg) => msg.to_string(),
                        None => format!("{} is invalid ({})", path, err.code),
                    };
                    out.push(FieldError::new(path.clone(), message));
                }
            }
            ValidationErrorsKind::Struct(nested) => flatten(&path, nested, out),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    flatten(&format!("{}.{}", path, index), nested, out);
                }
            }
        }
    }
}

//! Document validation against the derived JSON Schema.

use jsonschema::error::{ValidationError, ValidationErrorKind};
use serde_json::Value;
use tracing::debug;

use crate::document::Document;
use crate::error::{SchemaError, ValidateError, Violation};
use crate::rewriter::{to_json_schema, to_standard_schema, without_required};
use crate::types::{escape_pointer, SchemaNode};

/// Message for a string that fails its `pattern`, such as a malformed ObjectId.
pub const PATTERN_MISMATCH: &str = "String does not match pattern";

/// Message for a required property missing from the document.
pub const PROPERTY_REQUIRED: &str = "Property is required";

/// Which `required` flags take part in validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Required properties must be present.
    Full,
    /// Required flags are ignored; only present fields are checked.
    Partial,
}

/// Validate a document against an ObjectId schema.
///
/// ObjectId nodes are checked as 24-character hex strings. Native ObjectIds
/// in the document are checked in their hex form.
///
/// # Errors
///
/// Returns `ValidateError::Invalid` with every violation in the order the
/// validator reports them, or `ValidateError::Schema` if the derived schema
/// cannot be compiled.
pub fn validate(schema: &SchemaNode, doc: &Document, mode: Mode) -> Result<(), ValidateError> {
    let derived = match mode {
        Mode::Full => to_json_schema(schema),
        Mode::Partial => without_required(&to_json_schema(schema)),
    };

    validate_against_schema(&to_standard_schema(&derived), &doc.to_json(), mode)
}

/// Validate a JSON payload against an already-lowered JSON Schema.
pub fn validate_against_schema(
    schema: &Value,
    payload: &Value,
    mode: Mode,
) -> Result<(), ValidateError> {
    let validator = jsonschema::validator_for(schema).map_err(|e| SchemaError::InvalidSchema {
        message: e.to_string(),
    })?;

    let errors: Vec<Violation> = validator.iter_errors(payload).map(to_violation).collect();

    debug!(?mode, violations = errors.len(), "validated document");

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidateError::Invalid { errors })
    }
}

fn to_violation(error: ValidationError<'_>) -> Violation {
    let path = error.instance_path.to_string();
    match &error.kind {
        ValidationErrorKind::Pattern { .. } => Violation {
            path,
            message: PATTERN_MISMATCH.to_string(),
        },
        ValidationErrorKind::Required { property } => {
            // Point at the missing property rather than its parent object.
            let name = match property {
                Value::String(name) => escape_pointer(name),
                other => other.to_string(),
            };
            Violation {
                path: format!("{}/{}", path, name),
                message: PROPERTY_REQUIRED.to_string(),
            }
        }
        _ => Violation {
            path,
            message: error.to_string(),
        },
    }
}

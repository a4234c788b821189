//! # Document Validation
//!
//! Structural checks run on candidate JSON before it is reconciled into the
//! field model. Filter shapes are deliberately not checked here: an
//! unrecognised filter is dropped when the field is decoded.

use serde_json::Value;

use crate::error::StructuralError;
use crate::profile::Profile;
use crate::type_field;

/// Check `document` has the shape of a Presentation Definition for the
/// profile.
///
/// # Errors
///
/// Returns [`StructuralError::MissingConstraints`] when `constraints.fields`
/// is absent, and [`StructuralError::MissingTypeField`] when a `jwt` or
/// `sd-jwt` document has no field with a `$.type` or `$.vct` path.
pub fn validate(document: &Value, profile: Profile) -> Result<(), StructuralError> {
    let Some(fields) =
        document.get("constraints").and_then(|c| c.get("fields")).and_then(Value::as_array)
    else {
        return Err(StructuralError::MissingConstraints);
    };

    if profile == Profile::MsoMdoc {
        return Ok(());
    }
    if !fields.iter().any(has_type_path) {
        return Err(StructuralError::MissingTypeField);
    }

    Ok(())
}

fn has_type_path(field: &Value) -> bool {
    match field.get("path") {
        Some(Value::String(path)) => type_field::is_type_path(path),
        Some(Value::Array(paths)) => {
            paths.iter().filter_map(Value::as_str).any(type_field::is_type_path)
        }
        _ => false,
    }
}

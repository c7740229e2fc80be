//! Field-by-field comparison of the two metadata sources.
//!
//! Conflicts are advisory: they describe which value the merge kept and never
//! stop the merge itself.

use crate::model::{ConflictWarning, OperationKey, RawMetadata};
use serde_json::Value;

/// Resolution recorded on every conflict. The decorator source always wins.
pub const OVERRIDE_WINS: &str = "override wins";

/// Scalar fields compared by plain equality
pub const SCALAR_FIELDS: [&str; 5] = [
    "summary",
    "description",
    "operationId",
    "deprecated",
    "externalDocs",
];

/// List fields where the decorator list replaces the docstring list wholesale
pub const REPLACE_LIST_FIELDS: [&str; 2] = ["tags", "security"];

/// Compare `base` (docstring) and `overlay` (decorator) metadata.
///
/// Emits one warning per scalar or replace-list field defined with different values
/// on both sides, one per parameter name defined differently on both sides, and one
/// per status code defined on both sides. A `null` value counts as undefined.
pub fn detect_conflicts(
    base: &RawMetadata,
    overlay: &RawMetadata,
    key: &OperationKey,
) -> Vec<ConflictWarning> {
    let mut conflicts = Vec::new();

    for field in SCALAR_FIELDS.iter().chain(REPLACE_LIST_FIELDS.iter()) {
        if let (Some(base_value), Some(overlay_value)) = (defined(base, field), defined(overlay, field)) {
            // An empty decorator list keeps the docstring list.
            if overlay_value.as_array().is_some_and(Vec::is_empty) {
                continue;
            }
            if base_value != overlay_value {
                conflicts.push(conflict(key, field, base_value, overlay_value));
            }
        }
    }

    if let (Some(Value::Array(base_params)), Some(Value::Array(overlay_params))) =
        (defined(base, "parameters"), defined(overlay, "parameters"))
    {
        for overlay_param in overlay_params {
            let Some(name) = overlay_param.get("name").and_then(Value::as_str) else {
                continue;
            };
            let base_param = base_params
                .iter()
                .find(|p| p.get("name").and_then(Value::as_str) == Some(name));
            if let Some(base_param) = base_param {
                if base_param != overlay_param {
                    let field = format!("parameters.{}", name);
                    conflicts.push(conflict(key, &field, base_param, overlay_param));
                }
            }
        }
    }

    // Any status code present on both sides is flagged, even when the entries are equal.
    if let (Some(Value::Object(base_responses)), Some(Value::Object(overlay_responses))) =
        (defined(base, "responses"), defined(overlay, "responses"))
    {
        for (code, overlay_response) in overlay_responses {
            if let Some(base_response) = base_responses.get(code) {
                let field = format!("responses.{}", code);
                conflicts.push(conflict(key, &field, base_response, overlay_response));
            }
        }
    }

    conflicts
}

fn defined<'a>(metadata: &'a RawMetadata, field: &str) -> Option<&'a Value> {
    metadata.get(field).filter(|v| !v.is_null())
}

fn conflict(key: &OperationKey, field: &str, base: &Value, overlay: &Value) -> ConflictWarning {
    ConflictWarning {
        operation: key.clone(),
        field: field.to_string(),
        base_value: base.clone(),
        override_value: overlay.clone(),
        resolution: OVERRIDE_WINS.to_string(),
    }
}

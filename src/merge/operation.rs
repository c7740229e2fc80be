//! Operation-level merge: applies the field precedence table.
//!
//! The decorator source is authoritative. It is passed as `overlay`; the docstring
//! source is passed as `base`.
//!
//! | Field | Rule |
//! |---|---|
//! | `summary`, `description`, `operationId`, `deprecated`, `externalDocs` | overlay if defined, else base |
//! | `tags`, `security` | non-empty overlay list replaces base |
//! | `parameters` | [`merge_list`] keyed by `name` |
//! | `requestBody` | overlay, subject to its `methods` filter |
//! | `responses` | [`merge_responses`], overlay entries subject to their `methods` filter |
//! | anything else | overlay if defined, else base |

use super::conflict::{detect_conflicts, REPLACE_LIST_FIELDS, SCALAR_FIELDS};
use super::{merge_list, merge_responses};
use crate::model::{
    ConflictWarning, HttpMethod, OperationKey, OperationMetadata, RawMetadata, METHODS_FILTER_KEY,
};
use log::debug;
use serde_json::{Map, Value};

/// Knobs for a single merge call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeOptions {
    /// Method of the endpoint being merged, used to evaluate `methods` filters.
    /// When absent, filtered entries always apply.
    pub endpoint_method: Option<HttpMethod>,
    /// Run the conflict detector alongside the merge
    pub detect_conflicts: bool,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            endpoint_method: None,
            detect_conflicts: true,
        }
    }
}

impl MergeOptions {
    pub fn for_method(method: HttpMethod) -> Self {
        Self {
            endpoint_method: Some(method),
            ..Self::default()
        }
    }

    pub fn without_conflicts(mut self) -> Self {
        self.detect_conflicts = false;
        self
    }
}

/// Output of [`merge_operation`]
#[derive(Debug, Clone, PartialEq)]
pub struct MergeResult {
    pub operation: OperationMetadata,
    pub conflicts: Vec<ConflictWarning>,
}

/// Merge docstring (`base`) and decorator (`overlay`) metadata for one operation.
///
/// Inputs are only borrowed; the result is built from copies. Merging a result again
/// with empty metadata returns it unchanged.
pub fn merge_operation(
    base: &RawMetadata,
    overlay: &RawMetadata,
    key: &OperationKey,
    options: &MergeOptions,
) -> MergeResult {
    debug!("Merging metadata for {}", key);

    let mut merged = Map::new();

    for field in SCALAR_FIELDS.iter().chain(REPLACE_LIST_FIELDS.iter()) {
        let value = match (defined(base, field), defined(overlay, field)) {
            (Some(Value::Array(base_list)), Some(Value::Array(overlay_list))) => {
                Some(Value::Array(merge_list(base_list, overlay_list, None)))
            }
            (base_value, overlay_value) => overlay_value.or(base_value).cloned(),
        };
        if let Some(value) = value {
            merged.insert(field.to_string(), value);
        }
    }

    if let Some(parameters) = merge_parameters(base, overlay) {
        merged.insert("parameters".to_string(), parameters);
    }

    if let Some(body) = merge_request_body(base, overlay, key, options.endpoint_method) {
        merged.insert("requestBody".to_string(), body);
    }

    if let Some(responses) = merge_response_field(base, overlay, options.endpoint_method) {
        merged.insert("responses".to_string(), responses);
    }

    for field in base.keys().chain(overlay.keys()) {
        if is_recognized(field) || merged.contains_key(field) {
            continue;
        }
        if let Some(value) = defined(overlay, field).or_else(|| defined(base, field)) {
            debug!("Passing through custom field '{}' for {}", field, key);
            merged.insert(field.clone(), value.clone());
        }
    }

    let conflicts = if options.detect_conflicts {
        detect_conflicts(base, overlay, key)
    } else {
        Vec::new()
    };

    debug!(
        "Merged {} fields for {} ({} conflicts)",
        merged.len(),
        key,
        conflicts.len()
    );

    MergeResult {
        operation: OperationMetadata::new(merged),
        conflicts,
    }
}

fn is_recognized(field: &str) -> bool {
    SCALAR_FIELDS.contains(&field)
        || REPLACE_LIST_FIELDS.contains(&field)
        || matches!(field, "parameters" | "requestBody" | "responses")
}

fn defined<'a>(metadata: &'a RawMetadata, field: &str) -> Option<&'a Value> {
    metadata.get(field).filter(|v| !v.is_null())
}

fn merge_parameters(base: &RawMetadata, overlay: &RawMetadata) -> Option<Value> {
    match (defined(base, "parameters"), defined(overlay, "parameters")) {
        (Some(Value::Array(base_list)), Some(Value::Array(overlay_list))) => {
            Some(Value::Array(merge_list(base_list, overlay_list, Some("name"))))
        }
        // A malformed side is kept as-is so validation can report it.
        (base_value, overlay_value) => overlay_value.or(base_value).cloned(),
    }
}

fn merge_request_body(
    base: &RawMetadata,
    overlay: &RawMetadata,
    key: &OperationKey,
    endpoint_method: Option<HttpMethod>,
) -> Option<Value> {
    let base_body = defined(base, "requestBody").map(strip_methods);

    let Some(overlay_body) = defined(overlay, "requestBody") else {
        return base_body;
    };

    if applies_to(overlay_body, endpoint_method) {
        Some(strip_methods(overlay_body))
    } else {
        debug!("Decorator requestBody does not apply to {}", key);
        base_body
    }
}

fn merge_response_field(
    base: &RawMetadata,
    overlay: &RawMetadata,
    endpoint_method: Option<HttpMethod>,
) -> Option<Value> {
    match (defined(base, "responses"), defined(overlay, "responses")) {
        (None, None) => None,
        (Some(Value::Object(base_map)), Some(Value::Object(overlay_map))) => {
            Some(Value::Object(merge_responses(
                &strip_response_methods(base_map),
                &filter_responses(overlay_map, endpoint_method),
            )))
        }
        (Some(Value::Object(base_map)), None) => {
            Some(Value::Object(strip_response_methods(base_map)))
        }
        (_, Some(Value::Object(overlay_map))) => {
            Some(Value::Object(filter_responses(overlay_map, endpoint_method)))
        }
        // Malformed shapes are kept so validation can report them.
        (base_value, overlay_value) => overlay_value.or(base_value).cloned(),
    }
}

/// Keep the overlay responses whose `methods` filter admits the endpoint method.
fn filter_responses(
    responses: &Map<String, Value>,
    endpoint_method: Option<HttpMethod>,
) -> Map<String, Value> {
    responses
        .iter()
        .filter(|(_, response)| applies_to(response, endpoint_method))
        .map(|(code, response)| (code.clone(), strip_methods(response)))
        .collect()
}

fn strip_response_methods(responses: &Map<String, Value>) -> Map<String, Value> {
    responses
        .iter()
        .map(|(code, response)| (code.clone(), strip_methods(response)))
        .collect()
}

/// Evaluate a `methods` filter. Entries without a filter, or merged without a known
/// endpoint method, always apply.
fn applies_to(entry: &Value, endpoint_method: Option<HttpMethod>) -> bool {
    let Some(method) = endpoint_method else {
        return true;
    };

    match entry.get(METHODS_FILTER_KEY) {
        Some(Value::Array(methods)) => methods
            .iter()
            .filter_map(Value::as_str)
            .any(|m| method.matches(m)),
        Some(Value::String(single)) => method.matches(single),
        _ => true,
    }
}

fn strip_methods(entry: &Value) -> Value {
    match entry {
        Value::Object(map) if map.contains_key(METHODS_FILTER_KEY) => {
            let mut stripped = map.clone();
            stripped.remove(METHODS_FILTER_KEY);
            Value::Object(stripped)
        }
        other => other.clone(),
    }
}

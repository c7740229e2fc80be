use super::{join_path, OperationCheck};
use crate::model::{KnownNames, OperationKey, OperationMetadata, ValidationFinding};
use serde_json::Value;

/// Prefix of a `$ref` pointing at a schema component
pub const SCHEMA_REF_PREFIX: &str = "#/components/schemas/";

/// Reports `$ref`s to schema components that the target document does not declare.
///
/// Scanned locations:
/// - `responses.<code>.content.<media>.schema`
/// - `requestBody.content.<media>.schema`
/// - `parameters[i].schema` and `parameters[i].content.<media>.schema`
///
/// Each schema is walked recursively, so references nested in `properties`, `items`
/// or `allOf` are found too. References to anything other than a schema component
/// are ignored.
pub struct SchemaReferenceCheck;

impl OperationCheck for SchemaReferenceCheck {
    fn name(&self) -> &'static str {
        "schema_references"
    }

    fn check(
        &self,
        operation: &OperationMetadata,
        key: &OperationKey,
        known: &KnownNames,
    ) -> Vec<ValidationFinding> {
        let mut references = Vec::new();

        if let Some(Value::Object(responses)) = operation.get("responses") {
            for (code, response) in responses {
                let path = join_path("responses", code);
                collect_content_refs(response.get("content"), &path, &mut references);
            }
        }

        if let Some(body) = operation.get("requestBody") {
            collect_content_refs(body.get("content"), "requestBody", &mut references);
        }

        if let Some(Value::Array(parameters)) = operation.get("parameters") {
            for (index, parameter) in parameters.iter().enumerate() {
                let path = format!("parameters[{}]", index);
                if let Some(schema) = parameter.get("schema") {
                    collect_refs(schema, &join_path(&path, "schema"), &mut references);
                }
                collect_content_refs(parameter.get("content"), &path, &mut references);
            }
        }

        references
            .into_iter()
            .filter(|(_, name)| !known.has_schema(name))
            .map(|(field, name)| {
                ValidationFinding::error(
                    key,
                    field,
                    format!("references unknown schema '{}'", name),
                )
            })
            .collect()
    }
}

/// Scan `<prefix>.content.<media>.schema` for references
fn collect_content_refs(content: Option<&Value>, prefix: &str, out: &mut Vec<(String, String)>) {
    let Some(Value::Object(content)) = content else {
        return;
    };
    let content_path = join_path(prefix, "content");
    for (media_type, media) in content {
        if let Some(schema) = media.get("schema") {
            let path = join_path(&join_path(&content_path, media_type), "schema");
            collect_refs(schema, &path, out);
        }
    }
}

/// Walk a schema tree, recording `(field path, schema name)` for each component reference.
fn collect_refs(value: &Value, path: &str, out: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                if key == "$ref" {
                    if let Some(name) = child.as_str().and_then(|r| r.strip_prefix(SCHEMA_REF_PREFIX)) {
                        out.push((path.to_string(), name.to_string()));
                    }
                } else {
                    collect_refs(child, &join_path(path, key), out);
                }
            }
        }
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                collect_refs(item, &format!("{}[{}]", path, index), out);
            }
        }
        _ => {}
    }
}

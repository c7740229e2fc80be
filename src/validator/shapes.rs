use super::{join_path, OperationCheck};
use crate::model::{value_kind, KnownNames, OperationKey, OperationMetadata, ValidationFinding};
use serde_json::Value;

/// Fields that must hold a string
pub const STRING_FIELDS: [&str; 3] = ["summary", "description", "operationId"];

/// Reports recognised fields whose value has the wrong shape.
///
/// Covers the fields no other check walks: the string fields, `deprecated`,
/// `externalDocs`, `tags`, `requestBody` and every `content` map under
/// `requestBody` and `responses`. A `null` value counts as absent.
pub struct FieldShapeCheck;

impl OperationCheck for FieldShapeCheck {
    fn name(&self) -> &'static str {
        "field_shapes"
    }

    fn check(
        &self,
        operation: &OperationMetadata,
        key: &OperationKey,
        _known: &KnownNames,
    ) -> Vec<ValidationFinding> {
        let mut findings = Vec::new();

        for field in STRING_FIELDS {
            if let Some(value) = present(operation.get(field)) {
                if !value.is_string() {
                    findings.push(mismatch(key, field, "a string", value));
                }
            }
        }

        if let Some(value) = present(operation.get("deprecated")) {
            if !value.is_boolean() {
                findings.push(mismatch(key, "deprecated", "a boolean", value));
            }
        }

        if let Some(value) = present(operation.get("externalDocs")) {
            if !value.is_object() {
                findings.push(mismatch(key, "externalDocs", "a mapping", value));
            }
        }

        match present(operation.get("tags")) {
            None => {}
            Some(Value::Array(tags)) => {
                for (index, tag) in tags.iter().enumerate() {
                    if !tag.is_string() {
                        findings.push(mismatch(key, &format!("tags[{}]", index), "a string", tag));
                    }
                }
            }
            Some(other) => findings.push(mismatch(key, "tags", "a list", other)),
        }

        match present(operation.get("requestBody")) {
            None => {}
            Some(Value::Object(body)) => {
                check_content(body.get("content"), "requestBody", key, &mut findings);
            }
            Some(other) => findings.push(mismatch(key, "requestBody", "a mapping", other)),
        }

        // Non-map responses and entries are reported by the responses check.
        if let Some(Value::Object(responses)) = operation.get("responses") {
            for (code, response) in responses {
                if let Value::Object(response) = response {
                    let path = join_path("responses", code);
                    check_content(response.get("content"), &path, key, &mut findings);
                }
            }
        }

        findings
    }
}

fn check_content(
    content: Option<&Value>,
    prefix: &str,
    key: &OperationKey,
    findings: &mut Vec<ValidationFinding>,
) {
    if let Some(content) = present(content) {
        if !content.is_object() {
            findings.push(mismatch(key, &join_path(prefix, "content"), "a mapping", content));
        }
    }
}

fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

fn mismatch(key: &OperationKey, field: &str, expected: &str, found: &Value) -> ValidationFinding {
    ValidationFinding::error(
        key,
        field,
        format!("{} must be {}, found {}", field, expected, value_kind(found)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HttpMethod, Severity};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn fields(op: Value) -> Vec<String> {
        let op = OperationMetadata::try_from(op).unwrap();
        let key = OperationKey::new("/pets", HttpMethod::Post);
        let findings = FieldShapeCheck.check(&op, &key, &KnownNames::default());
        assert!(findings.iter().all(|f| f.severity == Severity::Error));
        findings.into_iter().map(|f| f.field).collect()
    }

    #[test]
    fn test_well_formed_operation() {
        let op = json!({
            "summary": "Create a pet",
            "description": "Adds a pet to the store",
            "operationId": "createPet",
            "deprecated": false,
            "externalDocs": {"url": "https://example.com"},
            "tags": ["pets"],
            "requestBody": {"content": {"application/json": {}}},
            "responses": {"201": {"description": "Created", "content": {"application/json": {}}}}
        });

        assert!(fields(op).is_empty());
    }

    #[test]
    fn test_non_string_scalars() {
        let op = json!({"summary": 42, "description": ["a"], "operationId": {"id": 1}});

        assert_eq!(fields(op), vec!["summary", "description", "operationId"]);
    }

    #[test]
    fn test_deprecated_and_external_docs() {
        let op = json!({"deprecated": "yes", "externalDocs": "https://example.com"});

        assert_eq!(fields(op), vec!["deprecated", "externalDocs"]);
    }

    #[test]
    fn test_tags_must_be_list_of_strings() {
        assert_eq!(fields(json!({"tags": "pets"})), vec!["tags"]);
        assert_eq!(fields(json!({"tags": ["pets", 7, null]})), vec!["tags[1]", "tags[2]"]);
    }

    #[test]
    fn test_request_body_must_be_mapping() {
        assert_eq!(fields(json!({"requestBody": "oops"})), vec!["requestBody"]);
        assert_eq!(
            fields(json!({"requestBody": {"content": "application/json"}})),
            vec!["requestBody.content"]
        );
    }

    #[test]
    fn test_response_content_must_be_mapping() {
        let op = json!({"responses": {
            "200": {"description": "OK", "content": ["bad"]},
            "404": {"description": "Missing"},
            "500": "not a mapping"
        }});

        assert_eq!(fields(op), vec!["responses.200.content"]);
    }

    #[test]
    fn test_null_counts_as_absent() {
        let op = json!({"summary": null, "tags": null, "requestBody": null});

        assert!(fields(op).is_empty());
    }

    #[test]
    fn test_message_names_expected_shape() {
        let op = OperationMetadata::try_from(json!({"requestBody": "oops"})).unwrap();
        let key = OperationKey::new("/pets", HttpMethod::Post);

        let findings = FieldShapeCheck.check(&op, &key, &KnownNames::default());

        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.contains("a mapping"));
        assert!(findings[0].message.contains("string"));
    }
}

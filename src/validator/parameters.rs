use super::OperationCheck;
use crate::model::{value_kind, KnownNames, OperationKey, OperationMetadata, ValidationFinding};
use serde_json::Value;

/// Allowed values of a parameter's `in` field
pub const PARAMETER_LOCATIONS: [&str; 4] = ["path", "query", "header", "cookie"];

/// Checks that every parameter has a `name`, a valid `in`, and a `schema` or
/// `content`, and that path parameters are marked `required: true`.
///
/// Parameters given as a `$ref` object are resolved elsewhere and are skipped.
pub struct ParameterCheck;

impl OperationCheck for ParameterCheck {
    fn name(&self) -> &'static str {
        "parameters"
    }

    fn check(
        &self,
        operation: &OperationMetadata,
        key: &OperationKey,
        _known: &KnownNames,
    ) -> Vec<ValidationFinding> {
        let parameters = match operation.get("parameters") {
            None => return Vec::new(),
            Some(Value::Array(parameters)) => parameters,
            Some(other) => {
                return vec![ValidationFinding::error(
                    key,
                    "parameters",
                    format!("parameters must be a list, found {}", value_kind(other)),
                )];
            }
        };

        let mut findings = Vec::new();
        for (index, parameter) in parameters.iter().enumerate() {
            let field = format!("parameters[{}]", index);
            check_parameter(parameter, &field, key, &mut findings);
        }
        findings
    }
}

fn check_parameter(
    parameter: &Value,
    field: &str,
    key: &OperationKey,
    findings: &mut Vec<ValidationFinding>,
) {
    let Value::Object(parameter) = parameter else {
        findings.push(ValidationFinding::error(
            key,
            field,
            format!("parameter must be a mapping, found {}", value_kind(parameter)),
        ));
        return;
    };

    if parameter.contains_key("$ref") {
        return;
    }

    let name = parameter
        .get("name")
        .and_then(Value::as_str)
        .filter(|n| !n.trim().is_empty());
    let label = name.unwrap_or("<unnamed>");

    if name.is_none() {
        findings.push(ValidationFinding::error(
            key,
            format!("{}.name", field),
            "parameter is missing 'name'",
        ));
    }

    let location = parameter.get("in").and_then(Value::as_str);
    match location {
        None => findings.push(ValidationFinding::error(
            key,
            format!("{}.in", field),
            format!("parameter '{}' is missing 'in'", label),
        )),
        Some(loc) if !PARAMETER_LOCATIONS.contains(&loc) => {
            findings.push(ValidationFinding::error(
                key,
                format!("{}.in", field),
                format!(
                    "parameter '{}' has invalid location '{}' (expected one of {})",
                    label,
                    loc,
                    PARAMETER_LOCATIONS.join(", ")
                ),
            ))
        }
        Some(_) => {}
    }

    if !parameter.contains_key("schema") && !parameter.contains_key("content") {
        findings.push(ValidationFinding::error(
            key,
            field,
            format!("parameter '{}' must define 'schema' or 'content'", label),
        ));
    }

    if location == Some("path") && parameter.get("required") != Some(&Value::Bool(true)) {
        findings.push(ValidationFinding::error(
            key,
            format!("{}.required", field),
            format!("path parameter '{}' must be marked required: true", label),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HttpMethod, Severity};
    use serde_json::json;

    fn run(op: Value) -> Vec<ValidationFinding> {
        let op = OperationMetadata::try_from(op).unwrap();
        let key = OperationKey::new("/users/{id}", HttpMethod::Get);
        ParameterCheck.check(&op, &key, &KnownNames::default())
    }

    #[test]
    fn test_path_parameter_must_be_required() {
        let findings = run(json!({"parameters": [
            {"name": "id", "in": "path", "required": false, "schema": {"type": "string"}}
        ]}));

        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Error);
        assert_eq!(findings[0].field, "parameters[0].required");
        assert!(findings[0].message.contains("'id'"));
    }

    #[test]
    fn test_path_parameter_missing_required() {
        let findings = run(json!({"parameters": [
            {"name": "id", "in": "path", "schema": {"type": "string"}}
        ]}));

        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.contains("'id'"));
    }

    #[test]
    fn test_valid_parameters() {
        let findings = run(json!({"parameters": [
            {"name": "id", "in": "path", "required": true, "schema": {"type": "string"}},
            {"name": "page", "in": "query", "schema": {"type": "integer"}},
            {"name": "filter", "in": "query", "content": {"application/json": {}}},
            {"name": "session", "in": "cookie", "schema": {"type": "string"}},
            {"$ref": "#/components/parameters/TraceId"}
        ]}));

        assert!(findings.is_empty());
    }

    #[test]
    fn test_missing_fields() {
        let findings = run(json!({"parameters": [{"description": "nothing else"}]}));
        let fields: Vec<&str> = findings.iter().map(|f| f.field.as_str()).collect();

        assert_eq!(
            fields,
            vec!["parameters[0].name", "parameters[0].in", "parameters[0]"]
        );
    }

    #[test]
    fn test_invalid_location() {
        let findings = run(json!({"parameters": [
            {"name": "x", "in": "body", "schema": {"type": "string"}}
        ]}));

        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.contains("body"));
    }

    #[test]
    fn test_malformed_entries_are_reported() {
        let findings = run(json!({"parameters": [
            "id",
            {"name": "ok", "in": "query", "schema": {}}
        ]}));

        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].field, "parameters[0]");
        assert!(findings[0].message.contains("string"));

        let findings = run(json!({"parameters": {"id": {}}}));
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].field, "parameters");
    }
}

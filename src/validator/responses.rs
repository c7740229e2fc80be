use super::{join_path, OperationCheck};
use crate::model::{value_kind, KnownNames, OperationKey, OperationMetadata, ValidationFinding};
use serde_json::Value;

/// Requires a non-empty `description` on every response and warns when an
/// operation declares no responses at all. A missing `responses` field counts
/// as empty.
pub struct ResponseCheck;

impl OperationCheck for ResponseCheck {
    fn name(&self) -> &'static str {
        "responses"
    }

    fn check(
        &self,
        operation: &OperationMetadata,
        key: &OperationKey,
        _known: &KnownNames,
    ) -> Vec<ValidationFinding> {
        let responses = match operation.get("responses") {
            Some(Value::Object(responses)) => responses,
            None => {
                return vec![no_responses(key)];
            }
            Some(other) => {
                return vec![ValidationFinding::error(
                    key,
                    "responses",
                    format!("responses must be a mapping, found {}", value_kind(other)),
                )];
            }
        };

        if responses.is_empty() {
            return vec![no_responses(key)];
        }

        let mut findings = Vec::new();
        for (code, response) in responses {
            let field = join_path("responses", code);
            let Value::Object(response) = response else {
                findings.push(ValidationFinding::error(
                    key,
                    field,
                    format!("response must be a mapping, found {}", value_kind(response)),
                ));
                continue;
            };

            let has_description = response
                .get("description")
                .and_then(Value::as_str)
                .is_some_and(|d| !d.trim().is_empty());
            if !has_description {
                findings.push(ValidationFinding::error(
                    key,
                    join_path(&field, "description"),
                    format!("response '{}' is missing a description", code),
                ));
            }
        }
        findings
    }
}

fn no_responses(key: &OperationKey) -> ValidationFinding {
    ValidationFinding::warning(key, "responses", "operation declares no responses")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HttpMethod, Severity};
    use serde_json::json;

    fn run(op: Value) -> Vec<ValidationFinding> {
        let op = OperationMetadata::try_from(op).unwrap();
        let key = OperationKey::new("/orders", HttpMethod::Post);
        ResponseCheck.check(&op, &key, &KnownNames::default())
    }

    #[test]
    fn test_missing_description() {
        let findings = run(json!({"responses": {
            "200": {"description": "OK"},
            "400": {"content": {}},
            "500": {"description": "  "}
        }}));

        let fields: Vec<&str> = findings.iter().map(|f| f.field.as_str()).collect();
        assert_eq!(fields, vec!["responses.400.description", "responses.500.description"]);
        assert!(findings.iter().all(|f| f.severity == Severity::Error));
    }

    #[test]
    fn test_empty_responses_warns_once() {
        let findings = run(json!({"responses": {}}));
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Warning);

        let findings = run(json!({"summary": "S"}));
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Warning);
    }

    #[test]
    fn test_malformed_responses() {
        let findings = run(json!({"responses": ["200"]}));
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Error);

        let findings = run(json!({"responses": {"200": "OK"}}));
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].field, "responses.200");
    }
}

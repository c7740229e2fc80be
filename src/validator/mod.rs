//! Structural validation of merged operations.
//!
//! Each check is an independent [`OperationCheck`] implementation that inspects one
//! merged operation and returns findings. Checks never fail: malformed shapes are
//! reported as findings so that one bad operation cannot stop a batch.
//!
//! # Checks
//!
//! - **Schema references**: see [`references::SchemaReferenceCheck`]
//! - **Status codes**: see [`status_codes::StatusCodeCheck`]
//! - **Parameters**: see [`parameters::ParameterCheck`]
//! - **Responses**: see [`responses::ResponseCheck`]
//! - **Security schemes**: see [`security::SecuritySchemeCheck`]
//! - **Field shapes**: see [`shapes::FieldShapeCheck`]
//!
//! # Example
//!
//! ```
//! use openapi_reconcile::model::{HttpMethod, KnownNames, OperationKey, OperationMetadata};
//! use openapi_reconcile::validator::validate_operation;
//! use serde_json::json;
//!
//! let operation = OperationMetadata::try_from(json!({
//!     "responses": {"200": {"description": "OK"}}
//! })).unwrap();
//! let key = OperationKey::new("/health", HttpMethod::Get);
//! let findings = validate_operation(&operation, &key, &KnownNames::default());
//! assert!(findings.is_empty());
//! ```

pub mod parameters;
pub mod references;
pub mod responses;
pub mod security;
pub mod shapes;
pub mod status_codes;

use crate::model::{KnownNames, OperationKey, OperationMetadata, ValidationFinding};
use log::debug;

/// A single structural rule applied to a merged operation.
pub trait OperationCheck: Send + Sync {
    /// Short identifier used in debug logs
    fn name(&self) -> &'static str;

    /// Inspect `operation` and report every violation found.
    fn check(
        &self,
        operation: &OperationMetadata,
        key: &OperationKey,
        known: &KnownNames,
    ) -> Vec<ValidationFinding>;
}

/// Runs a fixed list of checks and concatenates their findings.
pub struct Validator {
    checks: Vec<Box<dyn OperationCheck>>,
}

impl Validator {
    /// Create a validator running all built-in checks
    pub fn new() -> Self {
        Self::with_checks(vec![
            Box::new(references::SchemaReferenceCheck),
            Box::new(status_codes::StatusCodeCheck),
            Box::new(parameters::ParameterCheck),
            Box::new(responses::ResponseCheck),
            Box::new(security::SecuritySchemeCheck),
            Box::new(shapes::FieldShapeCheck),
        ])
    }

    /// Create a validator running only the given checks, in order
    pub fn with_checks(checks: Vec<Box<dyn OperationCheck>>) -> Self {
        Self { checks }
    }

    pub fn check_names(&self) -> Vec<&'static str> {
        self.checks.iter().map(|c| c.name()).collect()
    }

    /// Run every configured check against one merged operation.
    ///
    /// # Arguments
    ///
    /// * `operation` - The merged operation to inspect
    /// * `key` - Path and method, copied into every finding
    /// * `known` - Component names declared by the target document
    ///
    /// # Returns
    ///
    /// Returns the findings of all checks, concatenated in check order.
    pub fn validate(
        &self,
        operation: &OperationMetadata,
        key: &OperationKey,
        known: &KnownNames,
    ) -> Vec<ValidationFinding> {
        let mut findings = Vec::new();
        for check in &self.checks {
            let found = check.check(operation, key, known);
            if !found.is_empty() {
                debug!("{} reported {} findings for {}", check.name(), found.len(), key);
            }
            findings.extend(found);
        }
        findings
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

/// Run every built-in check against one merged operation.
///
/// Equivalent to `Validator::new().validate(operation, key, known)`. Callers
/// validating many operations should build one [`Validator`] and reuse it.
pub fn validate_operation(
    operation: &OperationMetadata,
    key: &OperationKey,
    known: &KnownNames,
) -> Vec<ValidationFinding> {
    Validator::new().validate(operation, key, known)
}

/// Append a segment to a dotted field path
pub(crate) fn join_path(prefix: &str, segment: impl std::fmt::Display) -> String {
    if prefix.is_empty() {
        segment.to_string()
    } else {
        format!("{}.{}", prefix, segment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HttpMethod, Severity};
    use serde_json::json;

    fn operation(value: serde_json::Value) -> OperationMetadata {
        OperationMetadata::try_from(value).unwrap()
    }

    #[test]
    fn test_validator_runs_all_checks() {
        let validator = Validator::new();
        assert_eq!(
            validator.check_names(),
            vec![
                "schema_references",
                "status_codes",
                "parameters",
                "responses",
                "security_schemes",
                "field_shapes"
            ]
        );
    }

    #[test]
    fn test_valid_operation_has_no_findings() {
        let op = operation(json!({
            "summary": "Get a user",
            "parameters": [
                {"name": "id", "in": "path", "required": true, "schema": {"type": "integer"}}
            ],
            "responses": {
                "200": {
                    "description": "OK",
                    "content": {"application/json": {"schema": {"$ref": "#/components/schemas/User"}}}
                },
                "default": {"description": "Unexpected error"}
            },
            "security": [{"bearerAuth": []}]
        }));
        let known = KnownNames::new(["User"], ["bearerAuth"]);
        let key = OperationKey::new("/users/{id}", HttpMethod::Get);

        assert!(validate_operation(&op, &key, &known).is_empty());
    }

    #[test]
    fn test_findings_are_concatenated_in_check_order() {
        let op = operation(json!({
            "parameters": [{"name": "id", "in": "path", "schema": {"type": "integer"}}],
            "responses": {
                "999": {
                    "description": "Odd",
                    "content": {"application/json": {"schema": {"$ref": "#/components/schemas/Ghost"}}}
                }
            },
            "security": [{"missing": []}]
        }));
        let key = OperationKey::new("/users/{id}", HttpMethod::Get);

        let findings = validate_operation(&op, &key, &KnownNames::default());
        let severities: Vec<Severity> = findings.iter().map(|f| f.severity).collect();

        assert_eq!(
            severities,
            vec![Severity::Error, Severity::Warning, Severity::Error, Severity::Error]
        );
        assert!(findings[0].message.contains("Ghost"));
        assert!(findings[1].field.contains("999"));
        assert!(findings[2].message.contains("id"));
        assert!(findings[3].message.contains("missing"));
    }

    #[test]
    fn test_malformed_shapes_are_errors() {
        let op = operation(json!({
            "summary": 42,
            "tags": "pets",
            "requestBody": "oops",
            "responses": {"200": {"description": "OK", "content": ["bad"]}}
        }));
        let key = OperationKey::new("/pets", HttpMethod::Post);

        let findings = validate_operation(&op, &key, &KnownNames::default());
        let mut fields: Vec<&str> = findings.iter().map(|f| f.field.as_str()).collect();
        fields.sort();

        assert_eq!(
            fields,
            vec!["requestBody", "responses.200.content", "summary", "tags"]
        );
        assert!(findings.iter().all(ValidationFinding::is_error));
    }

    #[test]
    fn test_custom_check_list() {
        let validator = Validator::with_checks(vec![Box::new(status_codes::StatusCodeCheck)]);
        let op = operation(json!({"responses": {}}));
        let key = OperationKey::new("/", HttpMethod::Get);

        // Only the status-code check runs, so the empty-responses warning is not raised.
        assert!(validator.validate(&op, &key, &KnownNames::default()).is_empty());
    }

    #[test]
    fn test_join_path() {
        assert_eq!(join_path("", "responses"), "responses");
        assert_eq!(join_path("responses", 200), "responses.200");
    }
}

use super::OperationCheck;
use crate::model::{value_kind, KnownNames, OperationKey, OperationMetadata, ValidationFinding};
use serde_json::Value;

/// Reports security requirements naming a scheme the document does not declare.
///
/// An empty requirement object (`{}`) marks the operation as optionally
/// unauthenticated and is accepted.
pub struct SecuritySchemeCheck;

impl OperationCheck for SecuritySchemeCheck {
    fn name(&self) -> &'static str {
        "security_schemes"
    }

    fn check(
        &self,
        operation: &OperationMetadata,
        key: &OperationKey,
        known: &KnownNames,
    ) -> Vec<ValidationFinding> {
        let requirements = match operation.get("security") {
            None => return Vec::new(),
            Some(Value::Array(requirements)) => requirements,
            Some(other) => {
                return vec![ValidationFinding::error(
                    key,
                    "security",
                    format!("security must be a list, found {}", value_kind(other)),
                )];
            }
        };

        let mut findings = Vec::new();
        for (index, requirement) in requirements.iter().enumerate() {
            let field = format!("security[{}]", index);
            let Value::Object(requirement) = requirement else {
                findings.push(ValidationFinding::error(
                    key,
                    field,
                    format!(
                        "security requirement must be a mapping, found {}",
                        value_kind(requirement)
                    ),
                ));
                continue;
            };

            for scheme in requirement.keys() {
                if !known.has_security_scheme(scheme) {
                    findings.push(ValidationFinding::error(
                        key,
                        format!("{}.{}", field, scheme),
                        format!("references unknown security scheme '{}'", scheme),
                    ));
                }
            }
        }
        findings
    }
}

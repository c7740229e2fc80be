//! Value types shared by the merge and validation engines.
//!
//! Metadata trees are plain [`serde_json::Value`] maps. The crate relies on the default
//! `BTreeMap` backing of [`serde_json::Map`], so every traversal visits keys in sorted
//! order and repeated runs produce identical output.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Untyped metadata tree produced by one extraction source.
pub type RawMetadata = Map<String, Value>;

/// Internal control key used to restrict `requestBody` and response entries to a
/// subset of HTTP methods. It never appears in an [`OperationMetadata`].
pub const METHODS_FILTER_KEY: &str = "methods";

/// HTTP methods an operation can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
    Trace,
}

impl HttpMethod {
    /// Lower-case form, as used for path item keys in an OpenAPI document.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Delete => "delete",
            HttpMethod::Patch => "patch",
            HttpMethod::Head => "head",
            HttpMethod::Options => "options",
            HttpMethod::Trace => "trace",
        }
    }

    /// Case-insensitive comparison against a method name taken from metadata.
    pub fn matches(&self, name: &str) -> bool {
        self.as_str().eq_ignore_ascii_case(name.trim())
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str().to_ascii_uppercase())
    }
}

impl FromStr for HttpMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "get" => Ok(HttpMethod::Get),
            "post" => Ok(HttpMethod::Post),
            "put" => Ok(HttpMethod::Put),
            "delete" => Ok(HttpMethod::Delete),
            "patch" => Ok(HttpMethod::Patch),
            "head" => Ok(HttpMethod::Head),
            "options" => Ok(HttpMethod::Options),
            "trace" => Ok(HttpMethod::Trace),
            other => Err(Error::InvalidArgument(format!(
                "unsupported HTTP method: {}",
                other
            ))),
        }
    }
}

/// Identifies one API operation. Only used to label diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OperationKey {
    pub path: String,
    pub method: HttpMethod,
}

impl OperationKey {
    pub fn new(path: impl Into<String>, method: HttpMethod) -> Self {
        Self {
            path: path.into(),
            method,
        }
    }
}

impl fmt::Display for OperationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

/// A merged operation, ready to be written under `paths.<path>.<method>`.
///
/// The constructor strips the internal `methods` filter from `requestBody` and from
/// every response entry, so no value of this type carries control fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperationMetadata(RawMetadata);

impl OperationMetadata {
    pub fn new(mut fields: RawMetadata) -> Self {
        if let Some(Value::Object(body)) = fields.get_mut("requestBody") {
            body.remove(METHODS_FILTER_KEY);
        }
        if let Some(Value::Object(responses)) = fields.get_mut("responses") {
            for response in responses.values_mut() {
                if let Value::Object(response) = response {
                    response.remove(METHODS_FILTER_KEY);
                }
            }
        }
        Self(fields)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn as_map(&self) -> &RawMetadata {
        &self.0
    }

    pub fn into_inner(self) -> RawMetadata {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }
}

impl From<RawMetadata> for OperationMetadata {
    fn from(fields: RawMetadata) -> Self {
        Self::new(fields)
    }
}

impl TryFrom<Value> for OperationMetadata {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Object(fields) => Ok(Self::new(fields)),
            other => Err(Error::InvalidMetadata(format!(
                "operation must be a mapping, found {}",
                value_kind(&other)
            ))),
        }
    }
}

/// Raised when both sources define the same field with different values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictWarning {
    pub operation: OperationKey,
    pub field: String,
    /// Value from the docstring (base) source
    pub base_value: Value,
    /// Value from the decorator (override) source
    pub override_value: Value,
    pub resolution: String,
}

impl fmt::Display for ConflictWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: field '{}' differs between docstring ({}) and decorator ({}); {}",
            self.operation, self.field, self.base_value, self.override_value, self.resolution
        )
    }
}

/// Severity of a validation finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Structurally invalid fragment (unknown reference, missing required field)
    Error,
    /// Suspicious but legal fragment
    Warning,
    /// Advisory only
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        };
        write!(f, "{}", label)
    }
}

/// One problem found by a validation check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationFinding {
    pub severity: Severity,
    pub operation: OperationKey,
    /// Dotted path of the offending field, e.g. `responses.200.description`
    pub field: String,
    pub message: String,
}

impl ValidationFinding {
    pub fn new(
        severity: Severity,
        operation: &OperationKey,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            operation: operation.clone(),
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn error(operation: &OperationKey, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, operation, field, message)
    }

    pub fn warning(operation: &OperationKey, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, operation, field, message)
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ValidationFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} {}: {}",
            self.severity, self.operation, self.field, self.message
        )
    }
}

/// Snapshot of the component names already declared in the target document.
///
/// Built once per validation batch and shared read-only between workers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnownNames {
    pub schemas: BTreeSet<String>,
    pub security_schemes: BTreeSet<String>,
}

impl KnownNames {
    pub fn new<S, T>(schemas: S, security_schemes: T) -> Self
    where
        S: IntoIterator,
        S::Item: Into<String>,
        T: IntoIterator,
        T::Item: Into<String>,
    {
        Self {
            schemas: schemas.into_iter().map(Into::into).collect(),
            security_schemes: security_schemes.into_iter().map(Into::into).collect(),
        }
    }

    /// Collect the keys of `components.schemas` and `components.securitySchemes`.
    pub fn from_document(document: &Value) -> Self {
        let component_keys = |section: &str| -> BTreeSet<String> {
            document
                .get("components")
                .and_then(|c| c.get(section))
                .and_then(Value::as_object)
                .map(|m| m.keys().cloned().collect())
                .unwrap_or_default()
        };

        Self {
            schemas: component_keys("schemas"),
            security_schemes: component_keys("securitySchemes"),
        }
    }

    pub fn has_schema(&self, name: &str) -> bool {
        self.schemas.contains(name)
    }

    pub fn has_security_scheme(&self, name: &str) -> bool {
        self.security_schemes.contains(name)
    }
}

/// Short name of a value's variant, for diagnostics.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "mapping",
    }
}

//! Assembly of merged operations into an OpenAPI document.

use crate::model::{HttpMethod, KnownNames, OperationKey, OperationMetadata};
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// OpenAPI version written into new documents
pub const OPENAPI_VERSION: &str = "3.0.0";

/// OpenAPI Info object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Info {
    /// API title
    pub title: String,
    /// API version
    pub version: String,
    /// API description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Builds the target document, one merged operation at a time.
///
/// The builder either starts from a blank document or wraps an existing one, in which
/// case its declared components also supply the [`KnownNames`] used for validation.
pub struct DocumentBuilder {
    document: Map<String, Value>,
}

impl DocumentBuilder {
    /// Create a new DocumentBuilder with default info
    pub fn new() -> Self {
        debug!("Initializing DocumentBuilder");
        let mut document = Map::new();
        document.insert("openapi".to_string(), Value::from(OPENAPI_VERSION));
        document.insert(
            "info".to_string(),
            info_value(&Info {
                title: "Generated API".to_string(),
                version: "1.0.0".to_string(),
                description: Some("API documentation reconciled from handler metadata".to_string()),
            }),
        );
        document.insert("paths".to_string(), Value::Object(Map::new()));
        Self { document }
    }

    /// Wrap an existing document. A non-object value starts a blank document.
    pub fn from_document(document: Value) -> Self {
        match document {
            Value::Object(mut document) => {
                if !document.get("paths").is_some_and(Value::is_object) {
                    document.insert("paths".to_string(), Value::Object(Map::new()));
                }
                Self { document }
            }
            _ => Self::new(),
        }
    }

    /// Set custom info for the API
    pub fn with_info(mut self, title: String, version: String, description: Option<String>) -> Self {
        let info = Info {
            title,
            version,
            description,
        };
        self.document.insert("info".to_string(), info_value(&info));
        self
    }

    /// Names declared under `components` in the current document
    pub fn known_names(&self) -> KnownNames {
        KnownNames::from_document(&Value::Object(self.document.clone()))
    }

    /// Write a merged operation under `paths.<path>.<method>`, replacing any previous
    /// operation for the same key.
    pub fn add_operation(&mut self, key: &OperationKey, operation: &OperationMetadata) {
        let path = convert_path_format(&key.path);
        debug!("Adding operation: {} {}", key.method, path);

        let paths = self
            .document
            .entry("paths")
            .or_insert_with(|| Value::Object(Map::new()));
        if !paths.is_object() {
            *paths = Value::Object(Map::new());
        }

        if let Value::Object(paths) = paths {
            let item = paths
                .entry(path)
                .or_insert_with(|| Value::Object(Map::new()));
            if !item.is_object() {
                *item = Value::Object(Map::new());
            }
            if let Value::Object(item) = item {
                item.insert(key.method.as_str().to_string(), operation.to_value());
            }
        }
    }

    /// Look up an operation previously written to the document
    pub fn operation(&self, path: &str, method: HttpMethod) -> Option<&Value> {
        self.document
            .get("paths")?
            .get(convert_path_format(path))?
            .get(method.as_str())
    }

    /// Build the final OpenAPI document
    pub fn build(self) -> Value {
        debug!("Building final OpenAPI document");
        Value::Object(self.document)
    }
}

impl Default for DocumentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn info_value(info: &Info) -> Value {
    let mut map = Map::new();
    map.insert("title".to_string(), Value::from(info.title.clone()));
    map.insert("version".to_string(), Value::from(info.version.clone()));
    if let Some(description) = &info.description {
        map.insert("description".to_string(), Value::from(description.clone()));
    }
    Value::Object(map)
}

/// Convert path format from :param or {param} to OpenAPI {param} format
pub fn convert_path_format(path: &str) -> String {
    path.split('/')
        .map(|part| match part.strip_prefix(':') {
            Some(name) => format!("{{{}}}", name),
            None => part.to_string(),
        })
        .collect::<Vec<_>>()
        .join("/")
}

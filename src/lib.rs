//! OpenAPI Reconcile - one canonical OpenAPI operation from two metadata sources.
//!
//! Handlers often describe their API operation twice: through stackable decorators
//! carrying keyword arguments, and through a YAML block inside the doc comment. This
//! library merges the two already-extracted metadata trees with a fixed precedence
//! (decorators win), reports where they disagree, and validates the result against
//! the structural rules of the target OpenAPI document.
//!
//! # Architecture
//!
//! 1. [`model`] - value types: operation keys, merged operations, warnings, findings
//! 2. [`merge`] - deep merge, list merge, response merge, conflict detection and the
//!    operation-level precedence table
//! 3. [`validator`] - independent structural checks over a merged operation
//! 4. [`docstring`] - splits a doc comment into prose and its YAML metadata block
//! 5. [`pipeline`] - per-operation and parallel batch reconciliation
//! 6. [`document`] - writes merged operations into an OpenAPI document
//! 7. [`serializer`] - YAML/JSON input and output
//!
//! The merge and validation engines are pure functions of their inputs. They never
//! print; every conflict and finding is returned to the caller.
//!
//! # Example Usage
//!
//! ```
//! use openapi_reconcile::{
//!     merge::operation::{merge_operation, MergeOptions},
//!     model::{HttpMethod, KnownNames, OperationKey, RawMetadata},
//!     validator::validate_operation,
//! };
//! use serde_json::json;
//!
//! let doc: RawMetadata = serde_json::from_value(json!({
//!     "summary": "Old",
//!     "responses": {"404": {"description": "Not found"}}
//! })).unwrap();
//! let decorator: RawMetadata = serde_json::from_value(json!({
//!     "summary": "New",
//!     "responses": {"200": {"description": "OK"}}
//! })).unwrap();
//!
//! let key = OperationKey::new("/users/{id}", HttpMethod::Get);
//! let merged = merge_operation(&doc, &decorator, &key, &MergeOptions::for_method(HttpMethod::Get));
//! assert_eq!(merged.operation.get("summary"), Some(&json!("New")));
//! assert_eq!(merged.conflicts.len(), 1);
//!
//! let findings = validate_operation(&merged.operation, &key, &KnownNames::default());
//! assert!(findings.is_empty());
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module which provides a complete CLI application.

pub mod cli;
pub mod model;
pub mod merge;
pub mod validator;
pub mod docstring;
pub mod pipeline;
pub mod document;
pub mod serializer;
pub mod error;

//! Per-operation and batch reconciliation.
//!
//! Each operation runs docstring parsing, merge and validation independently. One
//! malformed operation yields an `Err` outcome for that operation only; the rest of
//! the batch is still processed.

use crate::docstring::parse_docstring;
use crate::merge::operation::{merge_operation, MergeOptions};
use crate::model::{
    ConflictWarning, HttpMethod, KnownNames, OperationKey, OperationMetadata, RawMetadata,
    Severity, ValidationFinding,
};
use crate::validator::Validator;
use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Metadata collected for one handler by the extraction step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationInput {
    pub path: String,
    pub method: HttpMethod,
    /// Decorator-sourced metadata
    #[serde(default)]
    pub decorator: RawMetadata,
    /// Raw doc comment text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docstring: Option<String>,
    /// Already-parsed doc metadata; used instead of `docstring` when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<RawMetadata>,
}

impl OperationInput {
    pub fn new(path: impl Into<String>, method: HttpMethod) -> Self {
        Self {
            path: path.into(),
            method,
            decorator: RawMetadata::new(),
            docstring: None,
            doc: None,
        }
    }

    pub fn key(&self) -> OperationKey {
        OperationKey::new(self.path.clone(), self.method)
    }
}

/// A successfully merged operation with its diagnostics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciledOperation {
    pub key: OperationKey,
    pub operation: OperationMetadata,
    pub conflicts: Vec<ConflictWarning>,
    pub findings: Vec<ValidationFinding>,
}

impl ReconciledOperation {
    pub fn has_errors(&self) -> bool {
        self.findings.iter().any(ValidationFinding::is_error)
    }
}

/// Outcome for one operation: `Err` holds the findings that prevented a merge.
pub type OperationOutcome = std::result::Result<ReconciledOperation, Vec<ValidationFinding>>;

/// Parse, merge and validate one operation.
///
/// Validation findings are always returned inside `Ok`; `Err` is reserved for input
/// that cannot be merged at all, such as an unparsable docstring.
pub fn reconcile_operation(
    input: &OperationInput,
    validator: &Validator,
    known: &KnownNames,
    detect_conflicts: bool,
) -> OperationOutcome {
    let key = input.key();

    let doc_metadata = match (&input.doc, &input.docstring) {
        (Some(doc), _) => doc.clone(),
        (None, Some(text)) => parse_docstring(text).map_err(|e| {
            vec![ValidationFinding::error(
                &key,
                "docstring",
                format!("docstring could not be parsed: {}", e),
            )]
        })?,
        (None, None) => RawMetadata::new(),
    };

    let mut options = MergeOptions::for_method(input.method);
    options.detect_conflicts = detect_conflicts;

    let merged = merge_operation(&doc_metadata, &input.decorator, &key, &options);
    let findings = validator.validate(&merged.operation, &key, known);

    Ok(ReconciledOperation {
        key,
        operation: merged.operation,
        conflicts: merged.conflicts,
        findings,
    })
}

/// Outcomes for a batch, in input order.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub outcomes: Vec<(OperationKey, OperationOutcome)>,
}

impl BatchReport {
    /// Operations that merged successfully
    pub fn reconciled(&self) -> impl Iterator<Item = &ReconciledOperation> {
        self.outcomes.iter().filter_map(|(_, o)| o.as_ref().ok())
    }

    /// Operations that could not be merged
    pub fn failed(&self) -> impl Iterator<Item = (&OperationKey, &Vec<ValidationFinding>)> {
        self.outcomes
            .iter()
            .filter_map(|(key, o)| o.as_ref().err().map(|f| (key, f)))
    }

    pub fn conflicts(&self) -> impl Iterator<Item = &ConflictWarning> {
        self.reconciled().flat_map(|r| r.conflicts.iter())
    }

    /// Every finding, from merged and failed operations alike
    pub fn findings(&self) -> impl Iterator<Item = &ValidationFinding> {
        self.outcomes.iter().flat_map(|(_, outcome)| match outcome {
            Ok(reconciled) => reconciled.findings.iter(),
            Err(findings) => findings.iter(),
        })
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.findings().filter(|f| f.severity == severity).count()
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }
}

/// Reconcile many operations in parallel.
///
/// `known` is shared read-only by all workers. Outcomes keep the order of `inputs`.
pub fn reconcile_batch(
    inputs: &[OperationInput],
    known: &KnownNames,
    detect_conflicts: bool,
) -> BatchReport {
    debug!("Reconciling {} operations", inputs.len());
    let validator = Validator::new();

    let outcomes = inputs
        .par_iter()
        .map(|input| {
            (
                input.key(),
                reconcile_operation(input, &validator, known, detect_conflicts),
            )
        })
        .collect();

    BatchReport { outcomes }
}

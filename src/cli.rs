use anyhow::Result;
use clap::{Parser, ValueEnum};
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// OpenAPI Reconcile - Merge decorator and docstring metadata into validated OpenAPI operations
#[derive(Parser, Debug)]
#[command(name = "openapi-reconcile")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Path to the extracted operations file (YAML or JSON)
    #[arg(value_name = "INPUT")]
    pub input_path: PathBuf,

    /// Existing OpenAPI document to merge into and to take known component names from
    #[arg(short = 'd', long = "document", value_name = "FILE")]
    pub document_path: Option<PathBuf>,

    /// Output format (yaml or json)
    #[arg(short = 'f', long = "format", value_enum, default_value = "yaml")]
    pub output_format: OutputFormat,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output_path: Option<PathBuf>,

    /// Write conflicts and findings as a structured report to this file
    #[arg(long = "report", value_name = "FILE")]
    pub report_path: Option<PathBuf>,

    /// Skip conflict detection between the two metadata sources
    #[arg(long = "no-conflicts")]
    pub no_conflicts: bool,

    /// Exit with an error when any error-severity finding is reported
    #[arg(long = "fail-on-error")]
    pub fail_on_error: bool,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// YAML format
    Yaml,
    /// JSON format
    Json,
}

/// Layout of the INPUT file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OperationsFile {
    #[serde(default)]
    pub operations: Vec<crate::pipeline::OperationInput>,
}

/// Structured report written with `--report`
#[derive(Debug, Clone, Serialize)]
pub struct Report<'a> {
    pub operations: usize,
    pub failed: usize,
    pub errors: usize,
    pub warnings: usize,
    pub conflicts: Vec<&'a crate::model::ConflictWarning>,
    pub findings: Vec<&'a crate::model::ValidationFinding>,
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    if !args.input_path.is_file() {
        anyhow::bail!("Input file does not exist: {}", args.input_path.display());
    }

    if let Some(ref document) = args.document_path {
        if !document.is_file() {
            anyhow::bail!("Document file does not exist: {}", document.display());
        }
    }

    info!("Input: {}", args.input_path.display());
    info!("Output format: {:?}", args.output_format);
    if let Some(ref output) = args.output_path {
        info!("Output file: {}", output.display());
    } else {
        info!("Output: stdout");
    }
    if let Some(ref document) = args.document_path {
        info!("Target document: {}", document.display());
    } else {
        info!("Target document: new");
    }

    Ok(args)
}

/// Run the main workflow
pub fn run(args: CliArgs) -> Result<()> {
    use crate::document::DocumentBuilder;
    use crate::pipeline::reconcile_batch;
    use crate::serializer::{load_structured, serialize_json, serialize_yaml, write_to_file};

    info!("Starting reconciliation...");

    // Step 1: Load the target document, if any
    let builder = match &args.document_path {
        Some(path) => {
            info!("Loading target document...");
            DocumentBuilder::from_document(load_structured(path)?)
        }
        None => DocumentBuilder::new(),
    };
    let known = builder.known_names();
    info!(
        "Known components: {} schemas, {} security schemes",
        known.schemas.len(),
        known.security_schemes.len()
    );

    // Step 2: Load extracted operations
    let input: OperationsFile = load_structured(&args.input_path)?;
    info!("Loaded {} operations", input.operations.len());
    if input.operations.is_empty() {
        warn!("No operations found in the input file");
    }

    // Step 3: Merge and validate
    let report = reconcile_batch(&input.operations, &known, !args.no_conflicts);

    for conflict in report.conflicts() {
        warn!("{}", conflict);
    }
    for finding in report.findings() {
        match finding.severity {
            crate::model::Severity::Error => error!("{}", finding),
            crate::model::Severity::Warning => warn!("{}", finding),
            crate::model::Severity::Info => info!("{}", finding),
        }
    }

    // Step 4: Assemble the document
    let mut builder = builder;
    for reconciled in report.reconciled() {
        builder.add_operation(&reconciled.key, &reconciled.operation);
    }
    let document = builder.build();

    let content = match args.output_format {
        OutputFormat::Yaml => serialize_yaml(&document)?,
        OutputFormat::Json => serialize_json(&document)?,
    };

    if let Some(output_path) = &args.output_path {
        write_to_file(&content, output_path)?;
        info!("Successfully wrote OpenAPI document to {}", output_path.display());
    } else {
        println!("{}", content);
    }

    // Step 5: Structured report
    if let Some(report_path) = &args.report_path {
        let structured = Report {
            operations: report.outcomes.len(),
            failed: report.failed().count(),
            errors: report.error_count(),
            warnings: report.warning_count(),
            conflicts: report.conflicts().collect(),
            findings: report.findings().collect(),
        };
        let content = if crate::serializer::is_yaml_path(report_path) {
            serialize_yaml(&structured)?
        } else {
            serialize_json(&structured)?
        };
        write_to_file(&content, report_path)?;
        info!("Wrote report to {}", report_path.display());
    }

    info!("Summary:");
    info!("  - Operations: {}", report.outcomes.len());
    info!("  - Failed: {}", report.failed().count());
    info!("  - Conflicts: {}", report.conflicts().count());
    info!("  - Errors: {}", report.error_count());
    info!("  - Warnings: {}", report.warning_count());

    if args.fail_on_error && report.has_errors() {
        anyhow::bail!(
            "Reconciliation reported {} error(s)",
            report.error_count()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const OPERATIONS: &str = r#"
operations:
  - path: /users/:id
    method: get
    docstring: |
      Fetch a user.
      ---
      responses:
        404:
          description: Not found
    decorator:
      operationId: getUser
      parameters:
        - name: id
          in: path
          required: true
          schema:
            type: integer
      responses:
        200:
          description: OK
          content:
            application/json:
              schema:
                $ref: '#/components/schemas/User'
"#;

    fn args(dir: &TempDir, input: &str) -> CliArgs {
        let input_path = dir.path().join("operations.yaml");
        fs::write(&input_path, input).unwrap();
        CliArgs {
            input_path,
            document_path: None,
            output_format: OutputFormat::Json,
            output_path: Some(dir.path().join("out").join("openapi.json")),
            report_path: Some(dir.path().join("report.json")),
            no_conflicts: false,
            fail_on_error: false,
            verbose: false,
        }
    }

    #[test]
    fn test_parse_args_rejects_missing_input() {
        let dir = TempDir::new().unwrap();
        let mut cli_args = args(&dir, OPERATIONS);
        cli_args.input_path = dir.path().join("missing.yaml");

        assert!(parse_args_from_parsed(cli_args).is_err());
    }

    #[test]
    fn test_run_writes_document_and_report() {
        let dir = TempDir::new().unwrap();
        let cli_args = args(&dir, OPERATIONS);
        let output_path = cli_args.output_path.clone().unwrap();
        let report_path = cli_args.report_path.clone().unwrap();

        run(cli_args).unwrap();

        let document: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(output_path).unwrap()).unwrap();
        let operation = &document["paths"]["/users/{id}"]["get"];
        assert_eq!(operation["operationId"], "getUser");
        assert_eq!(operation["summary"], "Fetch a user.");
        assert!(operation["responses"]["404"].is_object());

        let report: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(report_path).unwrap()).unwrap();
        assert_eq!(report["operations"], 1);
        // No document was given, so `User` is unknown.
        assert_eq!(report["errors"], 1);
    }

    #[test]
    fn test_fail_on_error() {
        let dir = TempDir::new().unwrap();
        let mut cli_args = args(&dir, OPERATIONS);
        cli_args.fail_on_error = true;

        assert!(run(cli_args).is_err());
    }

    #[test]
    fn test_known_names_from_document() {
        let dir = TempDir::new().unwrap();
        let document_path = dir.path().join("openapi.yaml");
        fs::write(
            &document_path,
            "openapi: 3.0.3\ninfo:\n  title: Users\n  version: '1'\ncomponents:\n  schemas:\n    User:\n      type: object\n",
        )
        .unwrap();

        let mut cli_args = args(&dir, OPERATIONS);
        cli_args.document_path = Some(document_path);
        cli_args.fail_on_error = true;

        run(cli_args).unwrap();
    }
}

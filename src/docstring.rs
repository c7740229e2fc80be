//! Extraction of structured metadata from a handler's doc comment.
//!
//! A doc comment carries free prose optionally followed by a YAML block, separated by
//! a line holding only `---`:
//!
//! ```text
//! List all pets.
//!
//! Results are paginated.
//! ---
//! tags: [pets]
//! responses:
//!   200:
//!     description: A page of pets
//! ```
//!
//! The first prose line becomes `summary` and the remaining prose becomes
//! `description`, unless the YAML block sets those fields itself.

use crate::error::{Error, Result};
use crate::model::{value_kind, RawMetadata};
use crate::serializer::yaml_to_json;
use log::debug;
use serde_json::Value;

/// Line separating prose from the YAML block
pub const YAML_MARKER: &str = "---";

/// Parse a doc comment into docstring metadata.
///
/// # Errors
///
/// Returns [`Error::ParseError`] if the YAML block is not valid YAML or is not a mapping.
pub fn parse_docstring(text: &str) -> Result<RawMetadata> {
    let text = dedent(text);
    let (prose, yaml) = split_docstring(&text);

    let mut metadata = match yaml {
        Some(block) if !block.trim().is_empty() => parse_yaml_block(block)?,
        _ => RawMetadata::new(),
    };

    let (summary, description) = split_prose(prose);
    if let Some(summary) = summary {
        metadata
            .entry("summary")
            .or_insert_with(|| Value::String(summary));
    }
    if let Some(description) = description {
        metadata
            .entry("description")
            .or_insert_with(|| Value::String(description));
    }

    debug!("Parsed docstring into {} fields", metadata.len());
    Ok(metadata)
}

/// Split dedented text into the prose part and the YAML block, if any.
pub fn split_docstring(text: &str) -> (&str, Option<&str>) {
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        if line.trim() == YAML_MARKER {
            let prose = &text[..offset];
            let yaml = &text[offset + line.len()..];
            return (prose, Some(yaml));
        }
        offset += line.len();
    }
    (text, None)
}

fn parse_yaml_block(block: &str) -> Result<RawMetadata> {
    let yaml: serde_yaml::Value = serde_yaml::from_str(block).map_err(|e| Error::ParseError {
        origin: "docstring".to_string(),
        message: e.to_string(),
    })?;

    match yaml_to_json(yaml) {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(RawMetadata::new()),
        other => Err(Error::ParseError {
            origin: "docstring".to_string(),
            message: format!("YAML block must be a mapping, found {}", value_kind(&other)),
        }),
    }
}

/// First non-empty line as summary, the rest (trimmed) as description.
fn split_prose(prose: &str) -> (Option<String>, Option<String>) {
    let mut lines = prose.lines().skip_while(|l| l.trim().is_empty());

    let summary = lines
        .next()
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty());
    let rest: Vec<&str> = lines.collect();
    let description = rest.join("\n").trim().to_string();

    let description = if description.is_empty() {
        None
    } else {
        Some(description)
    };
    (summary, description)
}

/// Remove the indentation common to all non-blank lines.
///
/// The first line is ignored when computing the margin, since doc strings usually
/// start right after the opening delimiter.
pub fn dedent(text: &str) -> String {
    let margin = text
        .lines()
        .skip(1)
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start().len())
        .min()
        .unwrap_or(0);

    text.lines()
        .enumerate()
        .map(|(index, line)| {
            if index == 0 {
                line.trim_start()
            } else if line.len() >= margin && line.is_char_boundary(margin) {
                &line[margin..]
            } else {
                line.trim_start()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

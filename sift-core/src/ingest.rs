//! Line-delimited JSON review input.
//!
//! Each non-blank line is one JSON object holding a review id, a restaurant
//! id and the review text. Field names are configurable through
//! [`RecordFields`].

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::info;

use crate::Document;

/// Errors raised while reading review records.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// The input file could not be opened.
    #[error("failed to open {}: {source}", path.display())]
    Open {
        /// Input file.
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Reading a line failed.
    #[error("line {line}: read failed: {source}")]
    Read {
        /// 1-based line number.
        line: usize,
        #[source]
        source: io::Error,
    },

    /// A non-blank line is not a JSON object.
    #[error("line {line}: invalid JSON: {source}")]
    Json {
        /// 1-based line number.
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// The record lacks a configured field.
    #[error("line {line}: missing field `{field}`")]
    MissingField {
        /// 1-based line number.
        line: usize,
        /// Name of the missing field.
        field: String,
    },

    /// A field holds a value of the wrong shape.
    #[error("line {line}: field `{field}` {reason}")]
    InvalidField {
        /// 1-based line number.
        line: usize,
        /// Name of the offending field.
        field: String,
        /// What the value must look like.
        reason: &'static str,
    },
}

/// Names of the record fields holding the review id, restaurant id and text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFields {
    /// Review id field, `review_id` by default.
    pub id: String,
    /// Restaurant id field, `restaurant_id` by default.
    pub group: String,
    /// Review text field, `comment` by default.
    pub text: String,
}

impl Default for RecordFields {
    fn default() -> Self {
        Self {
            id: "review_id".to_owned(),
            group: "restaurant_id".to_owned(),
            text: "comment".to_owned(),
        }
    }
}

/// Reads every review of a JSONL file.
pub fn read_jsonl(
    path: impl AsRef<Path>,
    fields: &RecordFields,
) -> Result<Vec<Document>, IngestError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| IngestError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let docs = parse_jsonl(BufReader::new(file), fields)?;
    info!(path = %path.display(), documents = docs.len(), "read corpus");
    Ok(docs)
}

/// Parses JSONL records from any buffered reader.
pub fn parse_jsonl<R: BufRead>(
    reader: R,
    fields: &RecordFields,
) -> Result<Vec<Document>, IngestError> {
    let mut docs = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.map_err(|source| IngestError::Read {
            line: line_no,
            source,
        })?;
        if line.trim().is_empty() {
            continue;
        }

        let record: Map<String, Value> =
            serde_json::from_str(&line).map_err(|source| IngestError::Json {
                line: line_no,
                source,
            })?;

        docs.push(Document {
            id: id_field(&record, &fields.id, line_no)?,
            group_id: id_field(&record, &fields.group, line_no)?,
            text: text_field(&record, &fields.text, line_no)?,
        });
    }
    Ok(docs)
}

fn field<'r>(
    record: &'r Map<String, Value>,
    name: &str,
    line: usize,
) -> Result<&'r Value, IngestError> {
    record.get(name).ok_or_else(|| IngestError::MissingField {
        line,
        field: name.to_owned(),
    })
}

fn id_field(record: &Map<String, Value>, name: &str, line: usize) -> Result<u64, IngestError> {
    let invalid = || IngestError::InvalidField {
        line,
        field: name.to_owned(),
        reason: "must be a non-negative integer",
    };
    match field(record, name, line)? {
        Value::Number(n) => n.as_u64().ok_or_else(invalid),
        Value::String(s) => s.trim().parse().map_err(|_| invalid()),
        _ => Err(invalid()),
    }
}

fn text_field(record: &Map<String, Value>, name: &str, line: usize) -> Result<String, IngestError> {
    match field(record, name, line)? {
        Value::String(s) => Ok(s.clone()),
        Value::Null => Ok(String::new()),
        _ => Err(IngestError::InvalidField {
            line,
            field: name.to_owned(),
            reason: "must be a string",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn parse(input: &str) -> Result<Vec<Document>, IngestError> {
        parse_jsonl(Cursor::new(input), &RecordFields::default())
    }

    #[test]
    fn reads_records() {
        let docs = parse(
            r#"{"review_id": 1, "restaurant_id": 10, "comment": "Great food!"}

{"review_id": "2", "restaurant_id": 10, "comment": null, "stars": 4}
"#,
        )
        .unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0], Document::new(1, 10, "Great food!"));
        assert_eq!(docs[1], Document::new(2, 10, ""));
    }

    #[test]
    fn custom_field_names() {
        let fields = RecordFields {
            id: "id".into(),
            group: "business".into(),
            text: "body".into(),
        };
        let docs = parse_jsonl(
            Cursor::new(r#"{"id": 5, "business": 3, "body": "ok"}"#),
            &fields,
        )
        .unwrap();
        assert_eq!(docs[0], Document::new(5, 3, "ok"));
    }

    #[test]
    fn errors_carry_line_numbers() {
        let err = parse("{\"review_id\": 1, \"restaurant_id\": 1, \"comment\": \"a\"}\nnot json\n")
            .unwrap_err();
        assert!(matches!(err, IngestError::Json { line: 2, .. }));

        let err = parse(r#"{"review_id": 1, "comment": "a"}"#).unwrap_err();
        assert!(matches!(
            err,
            IngestError::MissingField { line: 1, ref field } if field == "restaurant_id"
        ));

        let err = parse(r#"{"review_id": -3, "restaurant_id": 1, "comment": "a"}"#).unwrap_err();
        assert!(matches!(err, IngestError::InvalidField { line: 1, .. }));

        let err = parse(r#"{"review_id": 1, "restaurant_id": 1, "comment": 7}"#).unwrap_err();
        assert!(err.to_string().contains("must be a string"));
    }

    #[test]
    fn missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_jsonl(dir.path().join("none.jsonl"), &RecordFields::default()).unwrap_err();
        assert!(matches!(err, IngestError::Open { .. }));
    }
}

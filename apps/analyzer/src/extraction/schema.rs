//! Structured Output Schema — the eight-field contract the LLM reply is coerced into.
//!
//! `FIELDS` drives both the format instructions embedded in the prompt and the
//! validator that turns the raw reply into a `ResumeRecord`.

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::llm_client::LlmError;
use crate::models::resume::ResumeRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    TextList,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub kind: FieldKind,
}

pub const FIELDS: [FieldSpec; 8] = [
    FieldSpec {
        name: "name",
        description: "Candidate full name",
        kind: FieldKind::Text,
    },
    FieldSpec {
        name: "email",
        description: "Email address",
        kind: FieldKind::Text,
    },
    FieldSpec {
        name: "phone",
        description: "Phone number",
        kind: FieldKind::Text,
    },
    FieldSpec {
        name: "skills",
        description: "List of skills",
        kind: FieldKind::TextList,
    },
    FieldSpec {
        name: "experience_summary",
        description: "Short experience summary",
        kind: FieldKind::Text,
    },
    FieldSpec {
        name: "education",
        description: "Education details",
        kind: FieldKind::Text,
    },
    FieldSpec {
        name: "linkedin",
        description: "LinkedIn profile URL",
        kind: FieldKind::Text,
    },
    FieldSpec {
        name: "github",
        description: "GitHub profile URL",
        kind: FieldKind::Text,
    },
];

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("LLM request failed: {0}")]
    Llm(#[from] LlmError),

    #[error("LLM reply was empty")]
    EmptyResponse,

    #[error("LLM reply is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("LLM reply is not a JSON object")]
    NotAnObject,

    #[error("LLM reply is missing field `{0}`")]
    MissingField(&'static str),

    #[error("field `{field}` has an invalid value: {reason}")]
    InvalidField { field: &'static str, reason: String },
}

/// Machine-readable format instructions embedded in the extraction prompt.
pub fn format_instructions() -> String {
    let mut out = String::from(
        "The output must be a JSON object with exactly the following keys, \
         wrapped in a ```json code block:\n\n```json\n{\n",
    );
    for (i, field) in FIELDS.iter().enumerate() {
        let ty = match field.kind {
            FieldKind::Text => "string or null",
            FieldKind::TextList => "array of strings or null",
        };
        let comma = if i + 1 < FIELDS.len() { "," } else { "" };
        out.push_str(&format!(
            "\t\"{}\": {ty}{comma}  // {}\n",
            field.name, field.description
        ));
    }
    out.push_str("}\n```");
    out
}

/// Validates a raw LLM reply against `FIELDS` and builds the record.
///
/// Every key must be present (null allowed). Extra keys are ignored.
pub fn parse_structured_output(raw: &str) -> Result<ResumeRecord, ExtractionError> {
    let text = strip_json_fences(raw);
    if text.is_empty() {
        return Err(ExtractionError::EmptyResponse);
    }

    let value: Value = match serde_json::from_str(text) {
        Ok(v) => v,
        Err(e) => match outermost_object(text) {
            Some(inner) => serde_json::from_str(inner)?,
            None => return Err(e.into()),
        },
    };
    let Value::Object(map) = value else {
        return Err(ExtractionError::NotAnObject);
    };

    for key in map.keys() {
        if !FIELDS.iter().any(|f| f.name == key.as_str()) {
            debug!("Ignoring unexpected field `{key}` in LLM reply");
        }
    }

    Ok(ResumeRecord {
        name: text_field(&map, "name")?,
        email: text_field(&map, "email")?,
        phone: text_field(&map, "phone")?,
        skills: list_field(&map, "skills")?,
        experience_summary: text_field(&map, "experience_summary")?,
        education: text_field(&map, "education")?,
        linkedin: text_field(&map, "linkedin")?,
        github: text_field(&map, "github")?,
    })
}

fn lookup<'a>(
    map: &'a Map<String, Value>,
    field: &'static str,
) -> Result<&'a Value, ExtractionError> {
    map.get(field).ok_or(ExtractionError::MissingField(field))
}

fn text_field(
    map: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<String>, ExtractionError> {
    let value = match lookup(map, field)? {
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(loose_text).collect();
            Some(parts.join("; "))
        }
        other => loose_text(other),
    };
    Ok(value.filter(|s| !s.trim().is_empty()))
}

fn list_field(
    map: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<Vec<String>>, ExtractionError> {
    match lookup(map, field)? {
        Value::Null => Ok(None),
        Value::Array(items) => {
            let parts = items
                .iter()
                .map(|item| scalar_text(item, field))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Some(parts.into_iter().flatten().collect()))
        }
        Value::String(s) => Ok(Some(
            s.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
        )),
        other => Err(ExtractionError::InvalidField {
            field,
            reason: format!("expected a list of strings, got {other}"),
        }),
    }
}

fn scalar_text(value: &Value, field: &'static str) -> Result<Option<String>, ExtractionError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.trim().to_string())),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        nested => Err(ExtractionError::InvalidField {
            field,
            reason: format!("nested value {nested} where text was expected"),
        }),
    }
}

/// Text form of any JSON value for a free-text column; nested values keep their JSON form.
fn loose_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.trim().to_string()),
        other => Some(other.to_string()),
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(stripped) = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
    else {
        return text;
    };
    let stripped = stripped.trim_start();
    stripped
        .strip_suffix("```")
        .map(str::trim)
        .unwrap_or(stripped)
}

/// The slice from the first `{` to the last `}`, for replies with prose around the JSON.
fn outermost_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

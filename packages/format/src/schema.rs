//! Wire records for schemas.
//!
//! A schema batch is a JSON array of records:
//!
//! ```json
//! [{ "id": "print", "category": 0,
//!    "lines": [[{"type": "text", "value": "print"}, {"type": "code", "value": "TEXT_IN"}]] }]
//! ```
//!
//! Unknown or non-string `takes`/`returns`/io-kind values degrade to `NONE`.
//! Unknown element types and missing required fields reject the whole batch.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;

use crate::error::{Result, SchemaError};
use crate::format::{BlockFormat, IoKind, Line, ParameterDoc, Slot, ValueType};

/// One element of a schema line.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ElementRecord {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub value: Option<String>,
}

/// One entry of `descParams`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParamDocRecord {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub desc: String,
}

/// A schema record as delivered by a remote device or stored on disk.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaRecord {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub is_deprecated: bool,
    pub category: usize,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub takes: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub returns: Option<String>,
    pub lines: Vec<Vec<ElementRecord>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc_return_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc_params: Option<Vec<ParamDocRecord>>,
}

/// Strings pass through, numbers and booleans become their text, anything
/// else is absent. Type names that come out of this unrecognised degrade to
/// `NONE` later.
fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match JsonValue::deserialize(deserializer)? {
        JsonValue::String(s) => Some(s),
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

const REQUIRED_FIELDS: [&str; 3] = ["id", "category", "lines"];

impl SchemaRecord {
    /// Parse the record at `index` of a batch.
    pub fn from_json(index: usize, json: JsonValue) -> Result<Self> {
        let object = json.as_object().ok_or_else(|| SchemaError::InvalidRecord {
            index,
            message: "record is not an object".to_string(),
        })?;

        for field in REQUIRED_FIELDS {
            if !object.contains_key(field) {
                return Err(SchemaError::MissingField { index, field });
            }
        }

        serde_json::from_value(json).map_err(|e| SchemaError::InvalidRecord {
            index,
            message: e.to_string(),
        })
    }

    /// Convert into a format, validating every line element.
    pub fn into_format(self) -> Result<BlockFormat> {
        let mut lines = Vec::with_capacity(self.lines.len());
        for (line_num, line) in self.lines.into_iter().enumerate() {
            let mut slots = Vec::with_capacity(line.len());
            for (column, element) in line.into_iter().enumerate() {
                let slot = if element.kind.eq_ignore_ascii_case("text") {
                    Slot::Text(element.value.unwrap_or_default())
                } else if element.kind.eq_ignore_ascii_case("code") {
                    Slot::Child(
                        element
                            .value
                            .as_deref()
                            .map_or(IoKind::None, IoKind::parse_lenient),
                    )
                } else {
                    return Err(SchemaError::UnknownElementType {
                        id: self.id,
                        line: line_num,
                        column,
                        kind: element.kind,
                    });
                };
                slots.push(slot);
            }
            lines.push(Line::from_slots(slots));
        }

        Ok(BlockFormat {
            name: self.name.unwrap_or_else(|| self.id.clone()),
            id: self.id,
            category: self.category,
            produces: self
                .returns
                .as_deref()
                .map_or(ValueType::None, ValueType::parse_lenient),
            accepts: self
                .takes
                .as_deref()
                .map_or(ValueType::None, ValueType::parse_lenient),
            lines,
            description: self.desc.unwrap_or_default(),
            return_description: self.desc_return_value.unwrap_or_default(),
            notes: self.desc_notes.unwrap_or_default(),
            parameter_docs: self.desc_params.map(|docs| {
                docs.into_iter()
                    .map(|d| ParameterDoc {
                        kind: d.kind,
                        description: d.desc,
                    })
                    .collect()
            }),
            deprecated: self.is_deprecated,
        })
    }
}

impl From<&BlockFormat> for SchemaRecord {
    fn from(format: &BlockFormat) -> Self {
        let non_empty = |s: &String| (!s.is_empty()).then(|| s.clone());

        SchemaRecord {
            id: format.id.clone(),
            name: Some(format.name.clone()),
            is_deprecated: format.deprecated,
            category: format.category,
            takes: format.accepts.wire_name().map(str::to_string),
            returns: format.produces.wire_name().map(str::to_string),
            lines: format
                .lines
                .iter()
                .map(|line| {
                    line.slots()
                        .iter()
                        .map(|slot| match slot {
                            Slot::Text(text) => ElementRecord {
                                kind: "text".to_string(),
                                value: Some(text.clone()),
                            },
                            Slot::Child(kind) => ElementRecord {
                                kind: "code".to_string(),
                                value: Some(kind.wire_name().to_string()),
                            },
                        })
                        .collect()
                })
                .collect(),
            desc: non_empty(&format.description),
            desc_return_value: non_empty(&format.return_description),
            desc_notes: non_empty(&format.notes),
            desc_params: format.parameter_docs.as_ref().map(|docs| {
                docs.iter()
                    .map(|d| ParamDocRecord {
                        kind: d.kind.clone(),
                        desc: d.description.clone(),
                    })
                    .collect()
            }),
        }
    }
}

/// Parse every record of a batch into formats.
///
/// Fails on the first invalid record; nothing is returned for a failing batch.
pub fn parse_batch(batch: JsonValue) -> Result<Vec<BlockFormat>> {
    let records = match batch {
        JsonValue::Array(records) => records,
        _ => {
            return Err(SchemaError::InvalidRecord {
                index: 0,
                message: "schema batch is not an array".to_string(),
            })
        }
    };

    records
        .into_iter()
        .enumerate()
        .map(|(index, json)| SchemaRecord::from_json(index, json)?.into_format())
        .collect()
}

//! Instance records: the persisted shape of a block.
//!
//! ```json
//! {"id": "repeat", "params": ["3"], "blocks": [[{"id": "print", "params": ["hi"]}]]}
//! ```
//!
//! `params` has one entry per child column, in line order: a nested record,
//! a literal string, or `""`. `blocks` has one array per stack line. Either
//! key is left out when the format has no such columns or lines.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use codeblocks_format::Slot;

use crate::block::{Block, Column, LineContent};
use crate::error::{Result, TreeError};
use crate::geometry::LayoutContext;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InstanceRecord {
    pub id: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<Param>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub blocks: Vec<Vec<InstanceRecord>>,
}

/// One entry of `params`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Param {
    Block(Box<InstanceRecord>),
    Literal(String),
    /// Anything else found on the wire. Numbers and booleans load as their
    /// text, `null` as an empty column.
    Other(JsonValue),
}

impl Param {
    pub fn empty() -> Self {
        Param::Literal(String::new())
    }
}

impl InstanceRecord {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            params: Vec::new(),
            blocks: Vec::new(),
        }
    }

    pub fn with_params(mut self, params: Vec<Param>) -> Self {
        self.params = params;
        self
    }

    pub fn with_blocks(mut self, blocks: Vec<Vec<InstanceRecord>>) -> Self {
        self.blocks = blocks;
        self
    }
}

impl Block {
    /// The record for this block and everything nested in it.
    pub fn to_record(&self) -> InstanceRecord {
        let mut record = InstanceRecord::new(self.id());

        for (line, content) in self.lines().iter().enumerate() {
            match content {
                LineContent::Columns(columns) => {
                    for (column, cell) in columns.iter().enumerate() {
                        let Some(Slot::Child(kind)) = self.format().slot(line, column) else {
                            continue;
                        };
                        let param = match cell {
                            Column::Child(child) => Param::Block(Box::new(child.to_record())),
                            Column::Literal(value) if kind.is_input() => {
                                Param::Literal(value.clone())
                            }
                            _ => Param::empty(),
                        };
                        record.params.push(param);
                    }
                }
                LineContent::Stack(children) => {
                    record
                        .blocks
                        .push(children.iter().map(Block::to_record).collect());
                }
            }
        }

        record
    }

    /// Rebuild a block from its record, resolving formats in the catalog.
    ///
    /// Fails on unknown ids and on records whose `params`/`blocks` counts
    /// do not match the format.
    pub fn from_record(record: &InstanceRecord, ctx: &LayoutContext) -> Result<Block> {
        let format = ctx
            .catalog
            .lookup(&record.id)
            .ok_or_else(|| TreeError::UnknownFormat {
                id: record.id.clone(),
            })?;

        let expected_params = format.param_count();
        if record.params.len() != expected_params {
            return Err(TreeError::malformed(
                &record.id,
                format!(
                    "expected {} params, found {}",
                    expected_params,
                    record.params.len()
                ),
            ));
        }
        let expected_blocks = format.stack_count();
        if record.blocks.len() != expected_blocks {
            return Err(TreeError::malformed(
                &record.id,
                format!(
                    "expected {} block lists, found {}",
                    expected_blocks,
                    record.blocks.len()
                ),
            ));
        }

        let mut block = Block::r#unsized(format.clone());
        let mut params = record.params.iter();
        let mut stacks = record.blocks.iter();

        for (line, content) in block.lines_mut().iter_mut().enumerate() {
            match content {
                LineContent::Columns(columns) => {
                    for (column, cell) in columns.iter_mut().enumerate() {
                        let Some(Slot::Child(kind)) = format.slot(line, column) else {
                            continue;
                        };
                        let param = params
                            .next()
                            .ok_or_else(|| TreeError::malformed(&record.id, "too few params"))?;
                        *cell = match param {
                            Param::Block(child) => {
                                Column::Child(Box::new(Block::from_record(child, ctx)?))
                            }
                            Param::Literal(value) if kind.is_input() => {
                                Column::from_literal(value.as_str())
                            }
                            Param::Literal(_) => Column::Empty,
                            Param::Other(value) => literal_from_json(&record.id, value)?,
                        };
                    }
                }
                LineContent::Stack(children) => {
                    let records = stacks
                        .next()
                        .ok_or_else(|| TreeError::malformed(&record.id, "too few block lists"))?;
                    *children = records
                        .iter()
                        .map(|child| Block::from_record(child, ctx))
                        .collect::<Result<Vec<_>>>()?;
                }
            }
        }

        block.recalculate_size(ctx);
        Ok(block)
    }
}

fn literal_from_json(id: &str, value: &JsonValue) -> Result<Column> {
    match value {
        JsonValue::Null => Ok(Column::Empty),
        JsonValue::Bool(b) => Ok(Column::from_literal(b.to_string())),
        JsonValue::Number(n) => Ok(Column::from_literal(n.to_string())),
        JsonValue::String(s) => Ok(Column::from_literal(s.as_str())),
        JsonValue::Array(_) | JsonValue::Object(_) => Err(TreeError::malformed(
            id,
            format!("param is neither a block nor a literal: {}", value),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use serde_json::json;

    fn record(value: JsonValue) -> InstanceRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn serializes_print_scenario() {
        let catalog = fixtures::catalog();
        let geometry = fixtures::geometry();
        let ctx = LayoutContext::new(&geometry, &catalog);

        let mut print = Block::from_catalog("print", &ctx).unwrap();
        print.set_literal(0, 1, "hello", &ctx);

        let json = serde_json::to_value(print.to_record()).unwrap();
        assert_eq!(json, json!({"id": "print", "params": ["hello"]}));
    }

    #[test]
    fn keys_only_when_format_has_them() {
        let catalog = fixtures::catalog();
        let geometry = fixtures::geometry();
        let ctx = LayoutContext::new(&geometry, &catalog);

        let pi = Block::from_catalog("pi", &ctx).unwrap();
        assert_eq!(serde_json::to_value(pi.to_record()).unwrap(), json!({"id": "pi"}));

        let repeat = Block::from_catalog("repeat", &ctx).unwrap();
        assert_eq!(
            serde_json::to_value(repeat.to_record()).unwrap(),
            json!({"id": "repeat", "params": [""], "blocks": [[]]})
        );
    }

    #[test]
    fn nested_records_round_trip() {
        let catalog = fixtures::catalog();
        let geometry = fixtures::geometry();
        let ctx = LayoutContext::new(&geometry, &catalog);

        let original = record(json!({
            "id": "if_else",
            "params": [{"id": "yes"}],
            "blocks": [
                [{"id": "print", "params": [{"id": "add", "params": ["1", {"id": "pi"}]}]}],
                [{"id": "repeat", "params": ["2"], "blocks": [[{"id": "print", "params": [""]}]]}]
            ]
        }));

        let block = Block::from_record(&original, &ctx).unwrap();
        assert_eq!(block.block_count(), 7);
        assert_eq!(block.to_record(), original);

        let mut fresh = Block::from_record(&block.to_record(), &ctx).unwrap();
        assert!(!fresh.recalculate_size(&ctx));
        assert_eq!(fresh.size(), block.size());
    }

    #[test]
    fn non_string_literals_load_as_text() {
        let catalog = fixtures::catalog();
        let geometry = fixtures::geometry();
        let ctx = LayoutContext::new(&geometry, &catalog);

        let add = Block::from_record(&record(json!({"id": "add", "params": [3, null]})), &ctx)
            .unwrap();
        assert_eq!(add.column(0, 0).and_then(Column::literal), Some("3"));
        assert_eq!(add.column(0, 2), Some(&Column::Empty));

        let print =
            Block::from_record(&record(json!({"id": "print", "params": [true]})), &ctx).unwrap();
        assert_eq!(print.column(0, 1).and_then(Column::literal), Some("true"));
    }

    #[test]
    fn output_slots_drop_literals() {
        let catalog = fixtures::catalog();
        let geometry = fixtures::geometry();
        let ctx = LayoutContext::new(&geometry, &catalog);

        let set = Block::from_record(
            &record(json!({"id": "set", "params": ["stray", "4"]})),
            &ctx,
        )
        .unwrap();
        assert_eq!(set.column(0, 1), Some(&Column::Empty));
        assert_eq!(
            serde_json::to_value(set.to_record()).unwrap(),
            json!({"id": "set", "params": ["", "4"]})
        );
    }

    #[test]
    fn mismatched_records_are_rejected() {
        let catalog = fixtures::catalog();
        let geometry = fixtures::geometry();
        let ctx = LayoutContext::new(&geometry, &catalog);

        let cases = [
            json!({"id": "print"}),
            json!({"id": "print", "params": ["a", "b"]}),
            json!({"id": "repeat", "params": [""]}),
            json!({"id": "print", "params": [["nested", "array"]]}),
        ];
        for case in cases {
            let result = Block::from_record(&record(case.clone()), &ctx);
            assert!(
                matches!(result, Err(TreeError::MalformedInstance { .. })),
                "{} should be malformed",
                case
            );
        }

        let unknown = Block::from_record(&record(json!({"id": "teleport"})), &ctx);
        assert!(matches!(unknown, Err(TreeError::UnknownFormat { id }) if id == "teleport"));

        let nested_unknown = Block::from_record(
            &record(json!({"id": "print", "params": [{"id": "teleport"}]})),
            &ctx,
        );
        assert!(matches!(nested_unknown, Err(TreeError::UnknownFormat { .. })));
    }
}

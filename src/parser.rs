use anyhow::{Context, Result};
use serde_json::Value;

use crate::ir::{NodeRecord, TreeNode};

/// Accepted input shapes:
///
/// * a nested object `{ "id": .., "fields": {..}, "children": [..] }`
/// * a flat array of records `[{ "id": .., "parentId": .., "fields": {..} }, ..]`
/// * `null` or blank input, meaning "no hierarchy yet"
///
/// Strict JSON is tried first; JSON5 (comments, trailing commas) is the
/// fallback for hand-written files. Record lists deeper than `max_depth` are
/// rejected while the tree is assembled.
pub fn parse_tree(input: &str, max_depth: usize) -> Result<Option<TreeNode>> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    let value = match serde_json::from_str::<Value>(input) {
        Ok(value) => value,
        Err(json_err) => json5::from_str::<Value>(input)
            .with_context(|| format!("input is neither JSON ({json_err}) nor JSON5"))?,
    };
    tree_from_value(value, max_depth)
}

pub fn tree_from_value(value: Value, max_depth: usize) -> Result<Option<TreeNode>> {
    match value {
        Value::Null => Ok(None),
        Value::Array(_) => {
            let records: Vec<NodeRecord> =
                serde_json::from_value(value).context("invalid hierarchy record list")?;
            Ok(TreeNode::from_records(&records, max_depth)?)
        }
        Value::Object(_) => {
            let tree: TreeNode = serde_json::from_value(value).context("invalid hierarchy tree")?;
            Ok(Some(tree))
        }
        other => Err(anyhow::anyhow!(
            "expected a tree object or record array, found {}",
            json_kind(&other)
        )),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

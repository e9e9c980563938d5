//! Diagnostic snapshots of the evaluation stack and of tables.

use super::value::ScriptValue;
use serde::{Deserialize, Serialize};

/// One slot of the evaluation stack. `index` is 1-based from the bottom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackSlot {
    pub index: usize,
    pub value: ScriptValue,
}

/// A key/value pair captured from a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableEntry {
    pub key: String,
    pub value: TableNode,
}

/// Value side of a [`TableEntry`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableNode {
    Value(ScriptValue),
    Table(Vec<TableEntry>),
    /// A table that is already being captured further up the chain.
    Cycle,
    /// A table nested deeper than the snapshot depth limit.
    Truncated,
}

impl TableEntry {
    pub fn value(key: impl Into<String>, value: ScriptValue) -> Self {
        Self {
            key: key.into(),
            value: TableNode::Value(value),
        }
    }

    pub fn table(key: impl Into<String>, entries: Vec<TableEntry>) -> Self {
        Self {
            key: key.into(),
            value: TableNode::Table(entries),
        }
    }
}

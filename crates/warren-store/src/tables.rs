use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use warren_core::{Record, StoreError, Table};

/// The complete persisted state: both tables, keyed by string.
///
/// Serializes to the on-disk layout
/// `{ "completed": { code: Record }, "pending": { url: Record } }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Tables {
    pub completed: BTreeMap<String, Record>,
    pub pending: BTreeMap<String, Record>,
}

/// Result of reading a snapshot that was usable as-is or after healing.
#[derive(Debug, Clone, PartialEq)]
pub struct Loaded {
    pub tables: Tables,
    /// `true` when missing structure was replaced with empty tables.
    pub healed: bool,
}

/// Snapshot layout with every table optional, so missing tables can be healed.
#[derive(Deserialize)]
struct RawTables {
    #[serde(default)]
    completed: Option<BTreeMap<String, Record>>,
    #[serde(default)]
    pending: Option<BTreeMap<String, Record>>,
}

impl Tables {
    pub fn get(&self, table: Table) -> &BTreeMap<String, Record> {
        match table {
            Table::Completed => &self.completed,
            Table::Pending => &self.pending,
        }
    }

    pub fn get_mut(&mut self, table: Table) -> &mut BTreeMap<String, Record> {
        match table {
            Table::Completed => &mut self.completed,
            Table::Pending => &mut self.pending,
        }
    }

    /// Pretty-printed JSON snapshot of both tables.
    pub fn to_snapshot(&self) -> warren_core::error::Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// Parses a snapshot, healing absent structure.
    ///
    /// `None`, blank text and JSON `null` heal to empty tables, as does a
    /// missing or `null` table inside an object. Anything else that does not
    /// match the layout is corrupt and reported as `Err(reason)`.
    pub fn from_snapshot(raw: Option<&str>) -> Result<Loaded, String> {
        let Some(raw) = raw.filter(|raw| !raw.trim().is_empty()) else {
            return Ok(Loaded {
                tables: Tables::default(),
                healed: true,
            });
        };

        let value: Value = serde_json::from_str(raw).map_err(|e| e.to_string())?;

        match value {
            Value::Null => Ok(Loaded {
                tables: Tables::default(),
                healed: true,
            }),
            Value::Object(_) => {
                let parsed: RawTables =
                    serde_json::from_value(value).map_err(|e| e.to_string())?;
                let healed = parsed.completed.is_none() || parsed.pending.is_none();
                Ok(Loaded {
                    tables: Tables {
                        completed: parsed.completed.unwrap_or_default(),
                        pending: parsed.pending.unwrap_or_default(),
                    },
                    healed,
                })
            }
            other => Err(format!(
                "expected a JSON object at the top level, found {}",
                json_kind(&other)
            )),
        }
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

use crate::record::{Record, Table};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// The kind of mutation a [`StoreEvent`] reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Insert,
    Update,
    Remove,
}

impl Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            EventType::Insert => "insert",
            EventType::Update => "update",
            EventType::Remove => "remove",
        })
    }
}

/// A change emitted after a successful store mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreEvent {
    pub table: Table,
    pub event_type: EventType,
    /// The record after the mutation, or the removed record for `remove`.
    pub data: Record,
}

impl StoreEvent {
    pub fn new(table: Table, event_type: EventType, data: Record) -> Self {
        Self {
            table,
            event_type,
            data,
        }
    }

    /// The push-channel event name, e.g. `pending:update`.
    pub fn name(&self) -> String {
        format!("{}:{}", self.table, self.event_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_name_joins_table_and_type() {
        let event = StoreEvent::new(
            Table::Completed,
            EventType::Insert,
            Record::pending("http://a"),
        );
        assert_eq!(event.name(), "completed:insert");
    }

    #[test]
    fn serializes_event_type_in_camel_case() {
        let event = StoreEvent::new(Table::Pending, EventType::Update, Record::pending("http://a"));
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["table"], "pending");
        assert_eq!(json["eventType"], "update");
        assert_eq!(json["data"]["original"], "http://a");
    }
}

use serde_json::Value;

use crate::domain::MonthYear;

use super::EntryKey;

/// A single edit a host applies to a [`FormSession`](super::FormSession).
#[derive(Debug, Clone, PartialEq)]
pub enum FormCommand {
    UpdateField { name: String, value: Value },
    SetStart(MonthYear),
    SetEnd(MonthYear),
    ClearEnd,
    SetOngoing(bool),
    AppendEntry { field: String },
    RemoveEntry { field: String, key: EntryKey },
    UpdateEntry {
        field: String,
        key: EntryKey,
        value: Value,
    },
    MoveEntry {
        field: String,
        key: EntryKey,
        delta: i32,
    },
    AttachLink(String),
}

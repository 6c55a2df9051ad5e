use std::collections::BTreeMap;

use serde::Serialize;

use crate::value::Value;

/// One parsed log line: typed field values plus the original (trimmed) text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    fields: BTreeMap<String, Value>,

    /// Kept for export only; never compared or grouped on
    #[serde(skip)]
    raw: String,
}

impl Record {
    pub fn new(fields: BTreeMap<String, Value>, raw: impl Into<String>) -> Self {
        Self {
            fields,
            raw: raw.into(),
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn fields(&self) -> &BTreeMap<String, Value> {
        &self.fields
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }
}

impl std::ops::Index<&str> for Record {
    type Output = Value;

    /// Panics if `field` is not part of the record.
    fn index(&self, field: &str) -> &Value {
        &self.fields[field]
    }
}

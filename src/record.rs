//! Opaque backend records.
//!
//! Entities are defined and validated by the backend. The console only
//! needs to find a row's id and render a cell, so a record is kept as the
//! raw JSON object it arrived as.

use crate::constants::MISSING_FIELD_PLACEHOLDER;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Wrap a list item. Anything other than a JSON object is rejected.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self(fields)),
            _ => None,
        }
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Look up a field; dotted names walk into nested objects (`role.name`).
    pub fn get(&self, field: &str) -> Option<&Value> {
        let mut parts = field.split('.');
        let first = parts.next()?;
        parts.try_fold(self.0.get(first)?, |value, part| value.get(part))
    }

    /// Row id as text, accepting string or numeric ids.
    pub fn id(&self, id_field: &str) -> Option<String> {
        match self.get(id_field)? {
            Value::String(id) if !id.is_empty() => Some(id.clone()),
            Value::Number(id) => Some(id.to_string()),
            _ => None,
        }
    }

    /// Cell text with `N/A` for missing or null fields.
    pub fn display(&self, field: &str) -> String {
        match self.get(field) {
            None | Some(Value::Null) => MISSING_FIELD_PLACEHOLDER.to_string(),
            Some(Value::String(s)) if s.is_empty() => MISSING_FIELD_PLACEHOLDER.to_string(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }

    pub fn str_field(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(Value::as_str)
    }

    /// Field value as editable text; empty when missing or null.
    pub fn input_value(&self, field: &str) -> String {
        match self.get(field) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }
}

/// Convert a list payload into records, dropping non-object items.
pub fn records_from_values(values: Vec<Value>) -> Vec<Record> {
    let total = values.len();
    let records: Vec<Record> = values.into_iter().filter_map(Record::from_value).collect();
    if records.len() != total {
        log::warn!("Skipped {} list items that were not JSON objects", total - records.len());
    }
    records
}

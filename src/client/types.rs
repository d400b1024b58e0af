//! Type definitions for the Airtable REST API.
//!
//! Airtable records are schemaless from the API's point of view: every row is an
//! id plus a map of column name (or field id) to JSON value. The types here keep
//! that shape and add the few structured values this service writes.
//!
//! ## Key Types
//!
//! - [`Record`] - A single row as returned by Airtable
//! - [`RecordList`] - Response wrapper for list calls
//! - [`Fields`] - Outbound column map that skips empty values
//! - [`Attachment`] / [`RecordLink`] - Structured cell values for photos and linked records

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single Airtable record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    /// Opaque record identifier (`rec…`)
    pub id: String,
    /// When Airtable created the row
    #[serde(rename = "createdTime", default, skip_serializing_if = "Option::is_none")]
    pub created_time: Option<String>,
    /// Cell values keyed by column name, or by field id when requested
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl Record {
    /// String value of a column, if present and a string.
    pub fn text(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(Value::as_str)
    }

    /// Whether a linked-record column holds at least one link.
    pub fn has_links(&self, field: &str) -> bool {
        matches!(self.fields.get(field), Some(Value::Array(links)) if !links.is_empty())
    }
}

/// Response body of a list call.
///
/// `offset` is present when more pages exist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordList {
    pub records: Vec<Record>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<String>,
}

/// Attachment cell value. Airtable downloads the file from `url` itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub url: String,
}

/// Reference to a record in another table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordLink {
    pub id: String,
}

/// Outbound column map.
///
/// Airtable treats "column present but empty" differently from "column omitted"
/// (an empty value clears the cell and overrides defaults), so [`Fields::set`]
/// drops null, empty strings and empty arrays.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fields(Map<String, Value>);

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column unless the value is empty.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> &mut Self {
        let value = value.into();
        if !is_empty_value(&value) {
            self.0.insert(name.to_string(), value);
        }
        self
    }

    /// Set a column from any serializable value, skipping empty results.
    pub fn set_serialized<T: Serialize>(&mut self, name: &str, value: &T) -> &mut Self {
        match serde_json::to_value(value) {
            Ok(value) => self.set(name, value),
            Err(e) => {
                tracing::warn!("Skipping field {} that failed to serialize: {}", name, e);
                self
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Body for creating a single record.
#[derive(Debug, Serialize)]
pub struct CreateRecordRequest {
    pub fields: Fields,
    pub typecast: bool,
}

/// Body for the batch create form, which answers with a `records` array.
#[derive(Debug, Serialize)]
pub struct CreateRecordsRequest {
    pub records: Vec<NewRecord>,
    pub typecast: bool,
}

#[derive(Debug, Serialize)]
pub struct NewRecord {
    pub fields: Fields,
}

/// Response of the batch create form.
#[derive(Debug, Deserialize)]
pub struct CreatedRecords {
    #[serde(default)]
    pub records: Vec<Record>,
}

/// Query options for list calls.
#[derive(Debug, Clone, Default)]
pub struct ListParams {
    pub max_records: Option<u32>,
    /// Restrict the returned columns
    pub fields: Vec<String>,
    /// Key `fields` by field id instead of column name
    pub return_fields_by_field_id: bool,
}

impl ListParams {
    pub fn max_records(limit: u32) -> Self {
        Self {
            max_records: Some(limit),
            ..Self::default()
        }
    }

    pub fn with_field(mut self, field: &str) -> Self {
        self.fields.push(field.to_string());
        self
    }

    /// Render as a query string without the leading `?`.
    pub fn to_query(&self) -> String {
        let mut params = vec![];
        if let Some(limit) = self.max_records {
            params.push(format!("maxRecords={}", limit));
        }
        for field in &self.fields {
            params.push(format!("{}={}", urlencoding::encode("fields[]"), urlencoding::encode(field)));
        }
        if self.return_fields_by_field_id {
            params.push("returnFieldsByFieldId=true".to_string());
        }
        params.join("&")
    }
}

/// Extract a human-readable message from an Airtable error body.
///
/// Airtable uses both `{"error": {"type": .., "message": ..}}` and
/// `{"error": "NOT_FOUND"}` depending on the failure.
pub fn error_message(body: &Value) -> Option<String> {
    match body.get("error") {
        Some(Value::String(code)) => Some(code.clone()),
        Some(Value::Object(error)) => error
            .get("message")
            .and_then(Value::as_str)
            .or_else(|| error.get("type").and_then(Value::as_str))
            .map(str::to_string),
        _ => None,
    }
}

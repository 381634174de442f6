//! Firestore REST typed-value codec.
//!
//! Firestore wraps every value in a single-key object naming its type,
//! e.g. `{"stringValue": "Ana"}` or `{"integerValue": "42"}`.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::document::{Document, DocumentId, FieldValue, Fields};

/// A document as returned by the REST API.
#[derive(Debug, Deserialize)]
pub struct RestDocument {
    /// Full resource name; the last segment is the document id
    pub name: String,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl RestDocument {
    pub fn into_document(self) -> Document {
        let id = self.name.rsplit('/').next().unwrap_or_default().to_string();
        Document::new(DocumentId::new(id), decode_fields(&self.fields))
    }
}

pub fn decode_fields(fields: &Map<String, Value>) -> Fields {
    fields
        .iter()
        .map(|(name, value)| (name.clone(), decode_value(value)))
        .collect()
}

/// Decode one typed value; unsupported types decode as `Null`.
pub fn decode_value(value: &Value) -> FieldValue {
    let Some(typed) = value.as_object() else {
        return FieldValue::Null;
    };

    if let Some(s) = typed.get("stringValue").and_then(Value::as_str) {
        return FieldValue::String(s.to_string());
    }
    if let Some(raw) = typed.get("integerValue") {
        let parsed = raw
            .as_str()
            .and_then(|s| s.parse::<i64>().ok())
            .or_else(|| raw.as_i64());
        if let Some(n) = parsed {
            return FieldValue::Integer(n);
        }
    }
    if let Some(raw) = typed.get("timestampValue").and_then(Value::as_str) {
        if let Some(secs) = parse_timestamp(raw) {
            return FieldValue::Timestamp(secs);
        }
    }
    if !typed.contains_key("nullValue") {
        debug!("Unsupported Firestore value: {value}");
    }
    FieldValue::Null
}

/// Encode a field map. Server timestamps cannot be sent as values; their
/// field names are returned separately so the caller can request a
/// server-side transform.
pub fn encode_fields(fields: &Fields) -> (Map<String, Value>, Vec<String>) {
    let mut encoded = Map::new();
    let mut server_timestamps = Vec::new();
    for (name, value) in fields {
        match encode_value(value) {
            Some(v) => {
                encoded.insert(name.clone(), v);
            }
            None => server_timestamps.push(name.clone()),
        }
    }
    (encoded, server_timestamps)
}

/// Encode one value; `None` for [`FieldValue::ServerTimestamp`].
pub fn encode_value(value: &FieldValue) -> Option<Value> {
    match value {
        FieldValue::Null => Some(json!({ "nullValue": null })),
        FieldValue::String(s) => Some(json!({ "stringValue": s })),
        FieldValue::Integer(n) => Some(json!({ "integerValue": n.to_string() })),
        FieldValue::Timestamp(secs) => Some(
            format_timestamp(*secs)
                .map_or_else(|| json!({ "nullValue": null }), |ts| json!({ "timestampValue": ts })),
        ),
        FieldValue::ServerTimestamp => None,
    }
}

fn parse_timestamp(raw: &str) -> Option<u64> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .and_then(|dt| u64::try_from(dt.timestamp()).ok())
}

fn format_timestamp(secs: u64) -> Option<String> {
    let secs = i64::try_from(secs).ok()?;
    DateTime::<Utc>::from_timestamp(secs, 0).map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true))
}

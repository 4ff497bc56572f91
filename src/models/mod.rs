//! Domain models and the document mapping layer.
//!
//! Each record type owns an explicit `to_document` / `from_document`
//! pair instead of deriving straight through the driver. That keeps the
//! store boundary observable: `_id` stringification, enum↔string
//! conversion, stripping of internal-only fields, and defaulted decoding
//! of documents written under an older shape all happen here and only
//! here.

pub mod appointment;
pub mod doctor;
pub mod enums;
pub mod prescription;
pub mod scan;
pub mod user;

pub use enums::{AppointmentStatus, AppointmentType, Role};

use bson::{Bson, Document};
use chrono::{DateTime, Utc};

#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("Invalid enum value for {field}: {value}")]
    InvalidEnum { field: String, value: String },

    #[error("Document has no usable _id")]
    MissingId,

    #[error("Unstorable payload value: {0}")]
    Payload(#[from] bson::ser::Error),
}

// ═══════════════════════════════════════════════════════════
// Defaulted field access — schema evolution tolerance
// ═══════════════════════════════════════════════════════════
//
// Documents created under an older shape must still decode, so every
// optional read falls back to the field's type default rather than
// failing. Only `_id` and enum values are allowed to error.

/// Stringify the store-assigned `_id`. Accepts a plain string id too
/// (documents imported from fixtures).
pub fn id_string(doc: &Document) -> Result<String, MapError> {
    match doc.get("_id") {
        Some(Bson::ObjectId(oid)) => Ok(oid.to_hex()),
        Some(Bson::String(s)) => Ok(s.clone()),
        _ => Err(MapError::MissingId),
    }
}

pub fn str_or_default(doc: &Document, key: &str) -> String {
    doc.get_str(key).unwrap_or_default().to_string()
}

pub fn f64_or_default(doc: &Document, key: &str) -> f64 {
    match doc.get(key) {
        Some(Bson::Double(v)) => *v,
        Some(Bson::Int32(v)) => f64::from(*v),
        Some(Bson::Int64(v)) => *v as f64,
        _ => 0.0,
    }
}

pub fn i64_or_default(doc: &Document, key: &str) -> i64 {
    match doc.get(key) {
        Some(Bson::Int32(v)) => i64::from(*v),
        Some(Bson::Int64(v)) => *v,
        Some(Bson::Double(v)) => *v as i64,
        _ => 0,
    }
}

pub fn bool_or_default(doc: &Document, key: &str) -> bool {
    doc.get_bool(key).unwrap_or(false)
}

/// String array; non-string elements are dropped.
pub fn str_array_or_default(doc: &Document, key: &str) -> Vec<String> {
    match doc.get_array(key) {
        Ok(items) => items
            .iter()
            .filter_map(|b| b.as_str().map(str::to_string))
            .collect(),
        Err(_) => Vec::new(),
    }
}

/// Creation timestamp; absent fields default to now, matching how the
/// store's write path initializes them.
pub fn datetime_or_now(doc: &Document, key: &str) -> DateTime<Utc> {
    match doc.get_datetime(key) {
        Ok(dt) => dt.to_chrono(),
        Err(_) => Utc::now(),
    }
}

/// Free-form subdocument as a JSON object map.
pub fn json_map_or_default(doc: &Document, key: &str) -> serde_json::Map<String, serde_json::Value> {
    match doc.get_document(key) {
        Ok(sub) => sub
            .iter()
            .map(|(k, v)| (k.clone(), serde_json::Value::from(v.clone())))
            .collect(),
        Err(_) => serde_json::Map::new(),
    }
}

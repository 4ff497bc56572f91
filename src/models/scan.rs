//! Anemia scan results: a typed envelope over a loosely-shaped payload.
//!
//! The known analysis fields are typed; anything the client attaches
//! under `patient_details` rides along as an explicitly-typed open map
//! rather than untyped passthrough.

use bson::{doc, Document};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{
    datetime_or_now, f64_or_default, id_string, json_map_or_default, str_array_or_default,
    str_or_default, MapError,
};

pub type DetailsMap = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScanResultIn {
    #[serde(default)]
    pub risk_level: String,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub hemoglobin_estimate: String,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub image_urls: Vec<String>,
    #[serde(default)]
    pub patient_details: DetailsMap,
    #[serde(default)]
    pub raw_analysis: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScanResultOut {
    pub id: String,
    pub user_id: String,
    pub risk_level: String,
    pub confidence: f64,
    pub hemoglobin_estimate: String,
    pub details: String,
    pub recommendations: Vec<String>,
    pub image_urls: Vec<String>,
    pub patient_details: DetailsMap,
    pub raw_analysis: String,
    pub created_at: DateTime<Utc>,
}

impl ScanResultOut {
    pub fn from_document(doc: &Document) -> Result<Self, MapError> {
        Ok(Self {
            id: id_string(doc)?,
            user_id: str_or_default(doc, "user_id"),
            risk_level: str_or_default(doc, "risk_level"),
            confidence: f64_or_default(doc, "confidence"),
            hemoglobin_estimate: str_or_default(doc, "hemoglobin_estimate"),
            details: str_or_default(doc, "details"),
            recommendations: str_array_or_default(doc, "recommendations"),
            image_urls: str_array_or_default(doc, "image_urls"),
            patient_details: json_map_or_default(doc, "patient_details"),
            raw_analysis: str_or_default(doc, "raw_analysis"),
            created_at: datetime_or_now(doc, "created_at"),
        })
    }
}

/// Build the stored scan, stamped with the authenticated owner. The
/// open map is converted value-by-value into a subdocument.
pub fn new_scan_document(
    req: &ScanResultIn,
    user_id: &str,
    now: bson::DateTime,
) -> Result<Document, MapError> {
    let mut patient_details = Document::new();
    for (key, value) in &req.patient_details {
        patient_details.insert(key.clone(), bson::to_bson(value)?);
    }

    Ok(doc! {
        "user_id": user_id,
        "risk_level": req.risk_level.as_str(),
        "confidence": req.confidence,
        "hemoglobin_estimate": req.hemoglobin_estimate.as_str(),
        "details": req.details.as_str(),
        "recommendations": req.recommendations.clone(),
        "image_urls": req.image_urls.clone(),
        "patient_details": patient_details,
        "raw_analysis": req.raw_analysis.as_str(),
        "created_at": now,
    })
}

/// Scans are strictly owner-scoped; there is no cross-user read.
pub fn owner_filter(user_id: &str) -> Document {
    doc! { "user_id": user_id }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::oid::ObjectId;
    use serde_json::json;

    fn scan_request() -> ScanResultIn {
        let mut patient_details = DetailsMap::new();
        patient_details.insert("age".into(), json!(34));
        patient_details.insert("symptoms".into(), json!(["fatigue", "pallor"]));

        ScanResultIn {
            risk_level: "MODERATE".into(),
            confidence: 0.82,
            hemoglobin_estimate: "9.5 g/dL".into(),
            details: "conjunctival pallor detected".into(),
            recommendations: vec!["iron-rich diet".into()],
            image_urls: vec!["https://cdn.example/scan1.jpg".into()],
            patient_details,
            raw_analysis: "{\"model\":\"v2\"}".into(),
        }
    }

    #[test]
    fn scan_round_trips_including_open_map() {
        let now = bson::DateTime::now();
        let mut document = new_scan_document(&scan_request(), "user-1", now).unwrap();
        document.insert("_id", ObjectId::new());

        let out = ScanResultOut::from_document(&document).unwrap();
        assert_eq!(out.user_id, "user-1");
        assert_eq!(out.risk_level, "MODERATE");
        assert_eq!(out.confidence, 0.82);
        assert_eq!(out.patient_details["age"], json!(34));
        assert_eq!(out.patient_details["symptoms"], json!(["fatigue", "pallor"]));
        assert_eq!(out.raw_analysis, "{\"model\":\"v2\"}");
        assert_eq!(out.created_at, now.to_chrono());
    }

    #[test]
    fn empty_body_is_accepted() {
        let req: ScanResultIn = serde_json::from_str("{}").unwrap();
        let document = new_scan_document(&req, "user-1", bson::DateTime::now()).unwrap();
        assert_eq!(document.get_str("risk_level").unwrap(), "");
        assert_eq!(document.get_f64("confidence").unwrap(), 0.0);
    }

    #[test]
    fn legacy_document_decodes_with_defaults() {
        let document = doc! { "_id": ObjectId::new(), "user_id": "user-1" };
        let out = ScanResultOut::from_document(&document).unwrap();
        assert!(out.patient_details.is_empty());
        assert!(out.recommendations.is_empty());
        assert_eq!(out.confidence, 0.0);
    }

    #[test]
    fn owner_filter_scopes_by_user() {
        assert_eq!(owner_filter("u1"), doc! { "user_id": "u1" });
    }
}

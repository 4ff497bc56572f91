//! Appointment records and their owner-scoped query filters.
//!
//! Patient and doctor names are snapshotted into the document at
//! creation and deliberately never re-synced with later identity edits;
//! listings show the names as they were when the booking was made.

use bson::oid::ObjectId;
use bson::{doc, Document};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::{AppointmentStatus, AppointmentType, Role};
use super::{datetime_or_now, id_string, str_or_default, MapError};

fn default_type() -> AppointmentType {
    AppointmentType::Video
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppointmentCreate {
    pub doctor_id: String,
    pub date: String,
    pub time: String,
    #[serde(rename = "type", default = "default_type")]
    pub appointment_type: AppointmentType,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub patient_age: String,
    #[serde(default)]
    pub patient_gender: String,
    #[serde(default)]
    pub patient_blood_group: String,
    #[serde(default)]
    pub patient_weight: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AppointmentOut {
    pub id: String,
    pub patient_id: String,
    pub doctor_id: String,
    pub patient_name: String,
    pub doctor_name: String,
    pub date: String,
    pub time: String,
    #[serde(rename = "type")]
    pub appointment_type: AppointmentType,
    pub status: AppointmentStatus,
    pub notes: String,
    pub patient_age: String,
    pub patient_gender: String,
    pub patient_blood_group: String,
    pub patient_weight: String,
    pub created_at: DateTime<Utc>,
}

impl AppointmentOut {
    pub fn from_document(doc: &Document) -> Result<Self, MapError> {
        let appointment_type = match doc.get_str("type") {
            Ok(s) => s.parse()?,
            Err(_) => AppointmentType::Video,
        };
        let status = match doc.get_str("status") {
            Ok(s) => s.parse()?,
            Err(_) => AppointmentStatus::Pending,
        };

        Ok(Self {
            id: id_string(doc)?,
            patient_id: str_or_default(doc, "patient_id"),
            doctor_id: str_or_default(doc, "doctor_id"),
            patient_name: str_or_default(doc, "patient_name"),
            doctor_name: str_or_default(doc, "doctor_name"),
            date: str_or_default(doc, "date"),
            time: str_or_default(doc, "time"),
            appointment_type,
            status,
            notes: str_or_default(doc, "notes"),
            patient_age: str_or_default(doc, "patient_age"),
            patient_gender: str_or_default(doc, "patient_gender"),
            patient_blood_group: str_or_default(doc, "patient_blood_group"),
            patient_weight: str_or_default(doc, "patient_weight"),
            created_at: datetime_or_now(doc, "created_at"),
        })
    }
}

/// Build the stored appointment. Names are snapshotted here from the
/// already-validated patient and doctor records; status starts PENDING.
pub fn new_appointment_document(
    req: &AppointmentCreate,
    patient_id: &str,
    patient_name: &str,
    doctor_name: &str,
    now: bson::DateTime,
) -> Document {
    doc! {
        "patient_id": patient_id,
        "doctor_id": req.doctor_id.as_str(),
        "patient_name": patient_name,
        "doctor_name": doctor_name,
        "date": req.date.as_str(),
        "time": req.time.as_str(),
        "type": req.appointment_type.as_str(),
        "status": AppointmentStatus::Pending.as_str(),
        "notes": req.notes.as_str(),
        "patient_age": req.patient_age.as_str(),
        "patient_gender": req.patient_gender.as_str(),
        "patient_blood_group": req.patient_blood_group.as_str(),
        "patient_weight": req.patient_weight.as_str(),
        "created_at": now,
    }
}

/// Listing scope: patients see their own bookings, doctors their own
/// schedule.
pub fn scope_filter(role: &Role, user_id: &str) -> Document {
    match role {
        Role::Patient => doc! { "patient_id": user_id },
        Role::Doctor => doc! { "doctor_id": user_id },
    }
}

/// Status updates are participant-scoped: a caller who is neither the
/// patient nor the doctor matches nothing and gets the same NotFound as
/// a missing id.
pub fn status_update_filter(appointment_id: ObjectId, user_id: &str) -> Document {
    doc! {
        "_id": appointment_id,
        "$or": [
            { "patient_id": user_id },
            { "doctor_id": user_id },
        ],
    }
}

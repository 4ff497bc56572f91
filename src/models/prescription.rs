//! Prescription records. Only a DOCTOR identity may write these; the
//! doctor's name is snapshotted at creation like appointment names.

use bson::{doc, Bson, Document};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::Role;
use super::{datetime_or_now, id_string, str_or_default, MapError};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MedicineItem {
    pub name: String,
    #[serde(default)]
    pub dosage: String,
    #[serde(default)]
    pub frequency: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub instructions: String,
}

impl MedicineItem {
    fn to_document(&self) -> Document {
        doc! {
            "name": self.name.as_str(),
            "dosage": self.dosage.as_str(),
            "frequency": self.frequency.as_str(),
            "duration": self.duration.as_str(),
            "instructions": self.instructions.as_str(),
        }
    }

    fn from_document(doc: &Document) -> Self {
        Self {
            name: str_or_default(doc, "name"),
            dosage: str_or_default(doc, "dosage"),
            frequency: str_or_default(doc, "frequency"),
            duration: str_or_default(doc, "duration"),
            instructions: str_or_default(doc, "instructions"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PrescriptionCreate {
    pub patient_id: String,
    #[serde(default)]
    pub appointment_id: String,
    #[serde(default)]
    pub medicines: Vec<MedicineItem>,
    #[serde(default)]
    pub diagnosis: String,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PrescriptionOut {
    pub id: String,
    pub patient_id: String,
    pub doctor_id: String,
    pub doctor_name: String,
    pub appointment_id: String,
    pub medicines: Vec<MedicineItem>,
    pub diagnosis: String,
    pub notes: String,
    pub pdf_url: String,
    pub created_at: DateTime<Utc>,
}

impl PrescriptionOut {
    pub fn from_document(doc: &Document) -> Result<Self, MapError> {
        let medicines = match doc.get_array("medicines") {
            Ok(items) => items
                .iter()
                .filter_map(|b| b.as_document().map(MedicineItem::from_document))
                .collect(),
            Err(_) => Vec::new(),
        };

        Ok(Self {
            id: id_string(doc)?,
            patient_id: str_or_default(doc, "patient_id"),
            doctor_id: str_or_default(doc, "doctor_id"),
            doctor_name: str_or_default(doc, "doctor_name"),
            appointment_id: str_or_default(doc, "appointment_id"),
            medicines,
            diagnosis: str_or_default(doc, "diagnosis"),
            notes: str_or_default(doc, "notes"),
            pdf_url: str_or_default(doc, "pdf_url"),
            created_at: datetime_or_now(doc, "created_at"),
        })
    }
}

/// Build the stored prescription. `doctor_name` is snapshotted from the
/// calling doctor's identity at creation time.
pub fn new_prescription_document(
    req: &PrescriptionCreate,
    doctor_id: &str,
    doctor_name: &str,
    now: bson::DateTime,
) -> Document {
    let medicines: Vec<Bson> = req
        .medicines
        .iter()
        .map(|m| Bson::Document(m.to_document()))
        .collect();

    doc! {
        "patient_id": req.patient_id.as_str(),
        "doctor_id": doctor_id,
        "doctor_name": doctor_name,
        "appointment_id": req.appointment_id.as_str(),
        "medicines": medicines,
        "diagnosis": req.diagnosis.as_str(),
        "notes": req.notes.as_str(),
        "pdf_url": "",
        "created_at": now,
    }
}

/// Listing scope: patients see prescriptions written for them, doctors
/// the ones they wrote.
pub fn scope_filter(role: &Role, user_id: &str) -> Document {
    match role {
        Role::Patient => doc! { "patient_id": user_id },
        Role::Doctor => doc! { "doctor_id": user_id },
    }
}

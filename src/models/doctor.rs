//! Doctor directory profiles, keyed by the owning identity id (`uid`).
//!
//! A skeleton profile is provisioned at registration; the owner fills it
//! in via upsert. The directory listing is the one public query in the
//! system.

use bson::{doc, Document};
use serde::{Deserialize, Serialize};

use super::{
    bool_or_default, f64_or_default, i64_or_default, str_array_or_default, str_or_default,
    MapError,
};

/// Owner-editable profile fields (the upsert payload).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DoctorProfileUpdate {
    #[serde(default)]
    pub license_number: String,
    #[serde(default)]
    pub specialties: Vec<String>,
    #[serde(default)]
    pub qualifications: String,
    #[serde(default)]
    pub degree: String,
    #[serde(default)]
    pub experience: i64,
    #[serde(default)]
    pub about: String,
    #[serde(default)]
    pub clinic_address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub consultation_fee: f64,
    #[serde(default)]
    pub available_slots: Vec<String>,
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
}

impl DoctorProfileUpdate {
    /// `$set` document for the upsert. Rating, verification flag and the
    /// `uid` key are not owner-editable and never appear here.
    pub fn to_document(&self) -> Document {
        doc! {
            "license_number": self.license_number.as_str(),
            "specialties": self.specialties.clone(),
            "qualifications": self.qualifications.as_str(),
            "degree": self.degree.as_str(),
            "experience": self.experience,
            "about": self.about.as_str(),
            "clinic_address": self.clinic_address.as_str(),
            "city": self.city.as_str(),
            "consultation_fee": self.consultation_fee,
            "available_slots": self.available_slots.clone(),
            "latitude": self.latitude,
            "longitude": self.longitude,
        }
    }
}

/// Directory-facing profile shape.
#[derive(Debug, Clone, Serialize)]
pub struct DoctorProfileOut {
    pub uid: String,
    pub name: String,
    pub license_number: String,
    pub specialties: Vec<String>,
    pub qualifications: String,
    pub degree: String,
    pub experience: i64,
    pub about: String,
    pub clinic_address: String,
    pub city: String,
    pub consultation_fee: f64,
    pub available_slots: Vec<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub rating: f64,
    pub total_ratings: i64,
    pub is_verified: bool,
    pub profile_pic_url: String,
}

impl DoctorProfileOut {
    pub fn from_document(doc: &Document) -> Result<Self, MapError> {
        Ok(Self {
            uid: str_or_default(doc, "uid"),
            name: str_or_default(doc, "name"),
            license_number: str_or_default(doc, "license_number"),
            specialties: str_array_or_default(doc, "specialties"),
            qualifications: str_or_default(doc, "qualifications"),
            degree: str_or_default(doc, "degree"),
            experience: i64_or_default(doc, "experience"),
            about: str_or_default(doc, "about"),
            clinic_address: str_or_default(doc, "clinic_address"),
            city: str_or_default(doc, "city"),
            consultation_fee: f64_or_default(doc, "consultation_fee"),
            available_slots: str_array_or_default(doc, "available_slots"),
            latitude: f64_or_default(doc, "latitude"),
            longitude: f64_or_default(doc, "longitude"),
            rating: f64_or_default(doc, "rating"),
            total_ratings: i64_or_default(doc, "total_ratings"),
            is_verified: bool_or_default(doc, "is_verified"),
            profile_pic_url: str_or_default(doc, "profile_pic_url"),
        })
    }
}

/// Skeleton profile written at DOCTOR registration, before the owner
/// has filled anything in.
pub fn empty_profile_document(uid: &str, name: &str, now: bson::DateTime) -> Document {
    doc! {
        "uid": uid,
        "name": name,
        "specialties": Vec::<String>::new(),
        "qualifications": "",
        "experience": 0_i64,
        "consultation_fee": 0.0,
        "rating": 0.0,
        "total_ratings": 0_i64,
        "is_verified": false,
        "created_at": now,
    }
}

/// Directory search filter: case-insensitive substring on city, exact
/// set membership on specialty. Empty parameters impose no constraint.
pub fn directory_filter(city: &str, specialty: &str) -> Document {
    let mut filter = Document::new();
    if !city.is_empty() {
        filter.insert("city", doc! { "$regex": city, "$options": "i" });
    }
    if !specialty.is_empty() {
        filter.insert("specialties", doc! { "$in": [specialty] });
    }
    filter
}

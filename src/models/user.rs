//! Identity records: registration/login payloads, the outward identity
//! shape, and the users-collection mapper.

use bson::{doc, Document};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::Role;
use super::{
    datetime_or_now, id_string, str_array_or_default, str_or_default, MapError,
};

fn default_role() -> Role {
    Role::Patient
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub password: String,
    #[serde(default = "default_role")]
    pub role: Role,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

fn bearer() -> String {
    "bearer".to_string()
}

/// Issued on successful registration or login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "bearer")]
    pub token_type: String,
    pub user_id: String,
    pub role: Role,
    pub name: String,
}

impl TokenResponse {
    pub fn new(access_token: String, user_id: String, role: Role, name: String) -> Self {
        Self {
            access_token,
            token_type: bearer(),
            user_id,
            role,
            name,
        }
    }
}

/// Merge-update payload for patient fields on the identity record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatientProfileUpdate {
    #[serde(default)]
    pub date_of_birth: String,
    #[serde(default)]
    pub blood_group: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub medical_history: Vec<String>,
    #[serde(default)]
    pub allergies: Vec<String>,
}

impl PatientProfileUpdate {
    /// `$set` document for the merge update.
    pub fn to_document(&self) -> Document {
        doc! {
            "date_of_birth": self.date_of_birth.as_str(),
            "blood_group": self.blood_group.as_str(),
            "gender": self.gender.as_str(),
            "address": self.address.as_str(),
            "medical_history": self.medical_history.clone(),
            "allergies": self.allergies.clone(),
        }
    }
}

/// Identity as it leaves the store boundary. `password_hash` has no
/// field here, so it cannot leak by construction.
#[derive(Debug, Clone, Serialize)]
pub struct UserOut {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: Role,
    pub profile_pic_url: String,
    pub date_of_birth: String,
    pub blood_group: String,
    pub gender: String,
    pub address: String,
    pub medical_history: Vec<String>,
    pub allergies: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl UserOut {
    pub fn from_document(doc: &Document) -> Result<Self, MapError> {
        let role = match doc.get_str("role") {
            Ok(s) => s.parse()?,
            Err(_) => Role::Patient,
        };

        Ok(Self {
            id: id_string(doc)?,
            name: str_or_default(doc, "name"),
            email: str_or_default(doc, "email"),
            phone: str_or_default(doc, "phone"),
            role,
            profile_pic_url: str_or_default(doc, "profile_pic_url"),
            date_of_birth: str_or_default(doc, "date_of_birth"),
            blood_group: str_or_default(doc, "blood_group"),
            gender: str_or_default(doc, "gender"),
            address: str_or_default(doc, "address"),
            medical_history: str_array_or_default(doc, "medical_history"),
            allergies: str_array_or_default(doc, "allergies"),
            created_at: datetime_or_now(doc, "created_at"),
        })
    }
}

/// Build the stored identity for a fresh registration. The only place
/// `password_hash` is ever written.
pub fn new_user_document(
    req: &RegisterRequest,
    password_hash: &str,
    now: bson::DateTime,
) -> Document {
    doc! {
        "name": req.name.as_str(),
        "email": req.email.as_str(),
        "phone": req.phone.as_str(),
        "role": req.role.as_str(),
        "password_hash": password_hash,
        "profile_pic_url": "",
        "created_at": now,
    }
}

//! Prescription endpoints.
//!
//! `POST /prescriptions` — DOCTOR only
//! `GET /prescriptions` — role-scoped listing, newest first

use axum::extract::State;
use axum::{Extension, Json};
use bson::doc;
use serde::Serialize;

use crate::api::endpoints::{find_recent, subject_object_id};
use crate::api::error::ApiError;
use crate::api::middleware::auth::require_role;
use crate::api::types::ApiContext;
use crate::auth::AuthClaims;
use crate::models::prescription::{
    new_prescription_document, scope_filter, PrescriptionCreate, PrescriptionOut,
};
use crate::models::{id_string, Role};

#[derive(Serialize)]
pub struct CreatedResponse {
    pub id: String,
    pub status: &'static str,
}

/// `POST /prescriptions` — write a prescription. The calling doctor's
/// name is snapshotted at creation time.
pub async fn create(
    State(ctx): State<ApiContext>,
    Extension(claims): Extension<AuthClaims>,
    Json(req): Json<PrescriptionCreate>,
) -> Result<Json<CreatedResponse>, ApiError> {
    require_role(&claims, Role::Doctor, "create prescriptions")?;

    let doctor_oid = subject_object_id(&claims.subject_id)?;
    let doctor = ctx
        .collections
        .users()
        .find_one(doc! { "_id": doctor_oid })
        .await?;
    let doctor_name = doctor
        .as_ref()
        .and_then(|d| d.get_str("name").ok())
        .unwrap_or_default();

    let document = new_prescription_document(
        &req,
        &claims.subject_id,
        doctor_name,
        bson::DateTime::now(),
    );
    let result = ctx.collections.prescriptions().insert_one(document).await?;

    let id = id_string(&doc! { "_id": result.inserted_id })?;
    Ok(Json(CreatedResponse {
        id,
        status: "created",
    }))
}

/// `GET /prescriptions` — a bare JSON array: a patient sees
/// prescriptions written for them, a doctor the ones they wrote.
pub async fn list(
    State(ctx): State<ApiContext>,
    Extension(claims): Extension<AuthClaims>,
) -> Result<Json<Vec<PrescriptionOut>>, ApiError> {
    let filter = scope_filter(&claims.role, &claims.subject_id);
    let documents = find_recent(&ctx.collections.prescriptions(), filter).await?;

    let prescriptions = documents
        .iter()
        .map(PrescriptionOut::from_document)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(prescriptions))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::oid::ObjectId;

    #[test]
    fn list_body_is_a_bare_array() {
        let req = PrescriptionCreate {
            patient_id: "pat-1".into(),
            appointment_id: String::new(),
            medicines: Vec::new(),
            diagnosis: "anemia".into(),
            notes: String::new(),
        };
        let mut document =
            new_prescription_document(&req, "doc-1", "Dr. Rao", bson::DateTime::now());
        document.insert("_id", ObjectId::new());

        let out = vec![PrescriptionOut::from_document(&document).unwrap()];
        let json = serde_json::to_value(&out).unwrap();

        assert!(json.is_array());
        assert_eq!(json[0]["diagnosis"], "anemia");
    }
}

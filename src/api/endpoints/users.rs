//! User and profile endpoints.
//!
//! `GET /users/me` — caller's identity, hash stripped
//! `PUT /users/me/patient-profile` — merge patient fields
//! `PUT /users/me/doctor-profile` — owner upsert of the directory profile
//! `GET /users/doctors` — public directory search
//! `GET /users/doctors/:id` — public profile lookup

use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use bson::doc;
use serde::Deserialize;

use crate::api::endpoints::{find_recent, subject_object_id, StatusResponse};
use crate::api::error::ApiError;
use crate::api::middleware::auth::require_role;
use crate::api::types::ApiContext;
use crate::auth::AuthClaims;
use crate::models::doctor::{directory_filter, DoctorProfileOut, DoctorProfileUpdate};
use crate::models::user::{PatientProfileUpdate, UserOut};
use crate::models::Role;

/// `GET /users/me` — the caller's identity.
pub async fn me(
    State(ctx): State<ApiContext>,
    Extension(claims): Extension<AuthClaims>,
) -> Result<Json<UserOut>, ApiError> {
    let oid = subject_object_id(&claims.subject_id)?;
    let user = ctx
        .collections
        .users()
        .find_one(doc! { "_id": oid })
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    Ok(Json(UserOut::from_document(&user)?))
}

/// `PUT /users/me/patient-profile` — merge patient fields onto the
/// caller's identity record.
pub async fn update_patient_profile(
    State(ctx): State<ApiContext>,
    Extension(claims): Extension<AuthClaims>,
    Json(update): Json<PatientProfileUpdate>,
) -> Result<Json<StatusResponse>, ApiError> {
    let oid = subject_object_id(&claims.subject_id)?;
    let result = ctx
        .collections
        .users()
        .update_one(doc! { "_id": oid }, doc! { "$set": update.to_document() })
        .await?;

    if result.matched_count == 0 {
        return Err(ApiError::NotFound("User not found".into()));
    }
    Ok(Json(StatusResponse { status: "updated" }))
}

/// `PUT /users/me/doctor-profile` — upsert the caller's directory
/// profile. DOCTOR role required; the directory is public and a patient
/// must not be able to plant an entry in it.
pub async fn update_doctor_profile(
    State(ctx): State<ApiContext>,
    Extension(claims): Extension<AuthClaims>,
    Json(update): Json<DoctorProfileUpdate>,
) -> Result<Json<StatusResponse>, ApiError> {
    require_role(&claims, Role::Doctor, "edit a doctor profile")?;

    ctx.collections
        .doctors()
        .update_one(
            doc! { "uid": claims.subject_id.as_str() },
            doc! { "$set": update.to_document() },
        )
        .upsert(true)
        .await?;

    Ok(Json(StatusResponse { status: "updated" }))
}

#[derive(Debug, Default, Deserialize)]
pub struct DirectoryQuery {
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub specialty: String,
}

/// `GET /users/doctors?city=&specialty=` — public directory search,
/// returned as a bare JSON array.
pub async fn list_doctors(
    State(ctx): State<ApiContext>,
    Query(query): Query<DirectoryQuery>,
) -> Result<Json<Vec<DoctorProfileOut>>, ApiError> {
    let filter = directory_filter(&query.city, &query.specialty);
    let documents = find_recent(&ctx.collections.doctors(), filter).await?;

    let doctors = documents
        .iter()
        .map(DoctorProfileOut::from_document)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(doctors))
}

/// `GET /users/doctors/:id` — public profile lookup by owner id.
pub async fn get_doctor(
    State(ctx): State<ApiContext>,
    Path(doctor_id): Path<String>,
) -> Result<Json<DoctorProfileOut>, ApiError> {
    let profile = ctx
        .collections
        .doctors()
        .find_one(doc! { "uid": doctor_id })
        .await?
        .ok_or_else(|| ApiError::NotFound("Doctor not found".into()))?;

    Ok(Json(DoctorProfileOut::from_document(&profile)?))
}

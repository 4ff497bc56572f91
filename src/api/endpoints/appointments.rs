//! Appointment endpoints.
//!
//! `POST /appointments` — book an appointment with a doctor
//! `GET /appointments` — role-scoped listing, newest first
//! `PUT /appointments/:id/status` — participant-scoped status change

use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use bson::doc;
use serde::Deserialize;

use crate::api::endpoints::{find_recent, parse_object_id, subject_object_id, StatusResponse};
use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::auth::AuthClaims;
use crate::models::appointment::{
    new_appointment_document, scope_filter, status_update_filter, AppointmentCreate,
    AppointmentOut,
};
use crate::models::AppointmentStatus;

/// `POST /appointments` — book an appointment. The caller is the
/// patient; both parties must exist. Names are snapshotted into the
/// document at creation.
pub async fn create(
    State(ctx): State<ApiContext>,
    Extension(claims): Extension<AuthClaims>,
    Json(req): Json<AppointmentCreate>,
) -> Result<Json<AppointmentOut>, ApiError> {
    let patient_oid = subject_object_id(&claims.subject_id)?;
    let patient = ctx
        .collections
        .users()
        .find_one(doc! { "_id": patient_oid })
        .await?;
    let doctor = ctx
        .collections
        .doctors()
        .find_one(doc! { "uid": req.doctor_id.as_str() })
        .await?;

    let (Some(patient), Some(doctor)) = (patient, doctor) else {
        return Err(ApiError::NotFound("Patient or doctor not found".into()));
    };

    let mut document = new_appointment_document(
        &req,
        &claims.subject_id,
        patient.get_str("name").unwrap_or_default(),
        doctor.get_str("name").unwrap_or_default(),
        bson::DateTime::now(),
    );

    let result = ctx.collections.appointments().insert_one(&document).await?;
    document.insert("_id", result.inserted_id);

    Ok(Json(AppointmentOut::from_document(&document)?))
}

/// `GET /appointments` — list the caller's appointments as a bare JSON
/// array: a patient sees their bookings, a doctor their schedule.
pub async fn list(
    State(ctx): State<ApiContext>,
    Extension(claims): Extension<AuthClaims>,
) -> Result<Json<Vec<AppointmentOut>>, ApiError> {
    let filter = scope_filter(&claims.role, &claims.subject_id);
    let documents = find_recent(&ctx.collections.appointments(), filter).await?;

    let appointments = documents
        .iter()
        .map(AppointmentOut::from_document)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(appointments))
}

#[derive(Deserialize)]
pub struct StatusQuery {
    pub status: String,
}

fn parse_status(raw: &str) -> Result<AppointmentStatus, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::BadRequest(format!("Invalid appointment status: {raw}")))
}

/// `PUT /appointments/:id/status?status=...` — set the status, passed
/// as a query parameter. Scoped to the appointment's participants; no
/// match (missing id or foreign appointment) is a 404 either way.
pub async fn update_status(
    State(ctx): State<ApiContext>,
    Extension(claims): Extension<AuthClaims>,
    Path(appointment_id): Path<String>,
    Query(query): Query<StatusQuery>,
) -> Result<Json<StatusResponse>, ApiError> {
    let oid = parse_object_id(&appointment_id)?;
    let status = parse_status(&query.status)?;

    let result = ctx
        .collections
        .appointments()
        .update_one(
            status_update_filter(oid, &claims.subject_id),
            doc! { "$set": { "status": status.as_str() } },
        )
        .await?;

    if result.matched_count == 0 {
        return Err(ApiError::NotFound("Appointment not found".into()));
    }
    Ok(Json(StatusResponse { status: "updated" }))
}

//! Anemia scan endpoints.
//!
//! `POST /scans` — store a scan result for the caller
//! `GET /scans` — owner-scoped listing, newest first
//! `GET /scans/:id` — owner-scoped fetch

use axum::extract::{Path, State};
use axum::{Extension, Json};
use bson::doc;
use serde::Serialize;

use crate::api::endpoints::{find_recent, parse_object_id};
use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::auth::AuthClaims;
use crate::models::id_string;
use crate::models::scan::{new_scan_document, owner_filter, ScanResultIn, ScanResultOut};

#[derive(Serialize)]
pub struct SavedResponse {
    pub id: String,
    pub status: &'static str,
}

/// `POST /scans` — persist a scan result, stamped with the caller as
/// owner. The envelope is typed; unknown patient details ride along in
/// the open map.
pub async fn save(
    State(ctx): State<ApiContext>,
    Extension(claims): Extension<AuthClaims>,
    Json(req): Json<ScanResultIn>,
) -> Result<Json<SavedResponse>, ApiError> {
    let document = new_scan_document(&req, &claims.subject_id, bson::DateTime::now())?;
    let result = ctx.collections.scans().insert_one(document).await?;

    let id = id_string(&doc! { "_id": result.inserted_id })?;
    Ok(Json(SavedResponse { id, status: "saved" }))
}

/// `GET /scans` — the caller's scans as a bare JSON array, newest
/// first.
pub async fn list(
    State(ctx): State<ApiContext>,
    Extension(claims): Extension<AuthClaims>,
) -> Result<Json<Vec<ScanResultOut>>, ApiError> {
    let documents =
        find_recent(&ctx.collections.scans(), owner_filter(&claims.subject_id)).await?;

    let scans = documents
        .iter()
        .map(ScanResultOut::from_document)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(scans))
}

/// `GET /scans/:id` — single scan, owner-scoped. A foreign scan id
/// yields the same 404 as a missing one.
pub async fn get(
    State(ctx): State<ApiContext>,
    Extension(claims): Extension<AuthClaims>,
    Path(scan_id): Path<String>,
) -> Result<Json<ScanResultOut>, ApiError> {
    let oid = parse_object_id(&scan_id)?;

    let mut filter = owner_filter(&claims.subject_id);
    filter.insert("_id", oid);

    let document = ctx
        .collections
        .scans()
        .find_one(filter)
        .await?
        .ok_or_else(|| ApiError::NotFound("Scan not found".into()))?;

    Ok(Json(ScanResultOut::from_document(&document)?))
}

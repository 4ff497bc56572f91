//! Resource endpoint handlers.
//!
//! Every protected handler follows one template: claims from the auth
//! middleware → operation-specific role check → referenced-entity
//! existence checks → mapper in → store call → mapper out.

pub mod appointments;
pub mod auth;
pub mod health;
pub mod prescriptions;
pub mod scans;
pub mod users;

use bson::oid::ObjectId;
use bson::{doc, Document};
use futures_util::TryStreamExt;
use mongodb::Collection;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::db::LIST_LIMIT;

/// Acknowledgement body for plain mutations.
#[derive(Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

/// Parse a client-supplied id path/body parameter.
fn parse_object_id(id: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(id).map_err(|_| ApiError::BadRequest("Invalid ID format".into()))
}

/// ObjectId from the verified token subject. Subjects are minted from
/// store ids at issue time, so failure here means a token forged around
/// the signature check somehow — treat as unauthenticated.
fn subject_object_id(subject_id: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(subject_id).map_err(|_| ApiError::Unauthorized)
}

/// Shared list query: newest first, capped at the fixed limit.
async fn find_recent(
    coll: &Collection<Document>,
    filter: Document,
) -> Result<Vec<Document>, ApiError> {
    let cursor = coll
        .find(filter)
        .sort(doc! { "created_at": -1 })
        .limit(LIST_LIMIT)
        .await?;
    Ok(cursor.try_collect().await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_object_id_accepts_hex() {
        let oid = ObjectId::new();
        assert_eq!(parse_object_id(&oid.to_hex()).unwrap(), oid);
    }

    #[test]
    fn parse_object_id_rejects_garbage() {
        assert!(matches!(
            parse_object_id("not-an-id"),
            Err(ApiError::BadRequest(_))
        ));
    }

    #[test]
    fn bad_subject_is_unauthorized() {
        assert!(matches!(
            subject_object_id("forged"),
            Err(ApiError::Unauthorized)
        ));
    }
}

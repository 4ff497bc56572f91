//! Authentication endpoints.
//!
//! `POST /auth/register` — public: create identity, return token
//! `POST /auth/login` — public: verify credentials, return token

use axum::extract::State;
use axum::Json;
use bson::{doc, Document};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::auth;
use crate::models::user::{new_user_document, LoginRequest, RegisterRequest, TokenResponse};
use crate::models::{doctor, id_string, Role};

/// Registration gate: any existing identity under the same email is a
/// conflict, whatever else the record holds.
fn check_email_available(existing: Option<&Document>) -> Result<(), ApiError> {
    match existing {
        Some(_) => Err(ApiError::Conflict("Email already registered".into())),
        None => Ok(()),
    }
}

/// Login decision over the looked-up identity. Unknown email and wrong
/// password collapse into the same 401 so the response does not reveal
/// which check failed.
fn check_credentials(user: Option<Document>, password: &str) -> Result<Document, ApiError> {
    let user = user.ok_or(ApiError::Unauthorized)?;
    let stored_hash = user.get_str("password_hash").unwrap_or_default();
    if !auth::verify_password(password, stored_hash) {
        return Err(ApiError::Unauthorized);
    }
    Ok(user)
}

/// `POST /auth/register` — create an identity and issue a token.
///
/// Email uniqueness is enforced here (409 on duplicates). A DOCTOR
/// registration also provisions an empty directory profile keyed by the
/// new identity id.
pub async fn register(
    State(ctx): State<ApiContext>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let users = ctx.collections.users();

    let existing = users.find_one(doc! { "email": req.email.as_str() }).await?;
    check_email_available(existing.as_ref())?;

    let password_hash = auth::hash_password(&req.password)?;
    let now = bson::DateTime::now();

    let result = users
        .insert_one(new_user_document(&req, &password_hash, now))
        .await?;
    let user_id = result
        .inserted_id
        .as_object_id()
        .map(|oid| oid.to_hex())
        .ok_or_else(|| ApiError::Internal("store returned a non-ObjectId id".into()))?;

    if req.role == Role::Doctor {
        ctx.collections
            .doctors()
            .insert_one(doctor::empty_profile_document(&user_id, &req.name, now))
            .await?;
    }

    tracing::info!(user_id, role = req.role.as_str(), "identity registered");

    let token = ctx.tokens.issue(&user_id, req.role.clone())?;
    Ok(Json(TokenResponse::new(
        token,
        user_id,
        req.role.clone(),
        req.name.clone(),
    )))
}

/// `POST /auth/login` — verify credentials and issue a fresh token.
///
/// Unknown email and wrong password produce the same 401; the response
/// does not reveal which check failed.
pub async fn login(
    State(ctx): State<ApiContext>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let found = ctx
        .collections
        .users()
        .find_one(doc! { "email": req.email.as_str() })
        .await?;
    let user = check_credentials(found, &req.password)?;

    let user_id = id_string(&user)?;
    let role: Role = user.get_str("role").unwrap_or("PATIENT").parse()?;
    let name = user.get_str("name").unwrap_or_default().to_string();

    let token = ctx.tokens.issue(&user_id, role.clone())?;
    Ok(Json(TokenResponse::new(token, user_id, role, name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_email_is_a_conflict() {
        let existing = doc! { "email": "asha@example.com", "name": "Asha" };
        let err = check_email_available(Some(&existing)).unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
    }

    #[test]
    fn fresh_email_passes_the_gate() {
        assert!(check_email_available(None).is_ok());
    }

    #[test]
    fn unknown_email_and_wrong_password_yield_the_same_error() {
        let hash = auth::hash_password("correct horse").unwrap();
        let user = doc! { "email": "asha@example.com", "password_hash": hash.as_str() };

        let unknown_email = check_credentials(None, "correct horse").unwrap_err();
        let wrong_password = check_credentials(Some(user.clone()), "battery staple").unwrap_err();

        assert!(matches!(unknown_email, ApiError::Unauthorized));
        assert!(matches!(wrong_password, ApiError::Unauthorized));

        let accepted = check_credentials(Some(user), "correct horse").unwrap();
        assert_eq!(accepted.get_str("email").unwrap(), "asha@example.com");
    }
}

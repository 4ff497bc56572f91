//! Bearer token authentication middleware.
//!
//! Extracts `Authorization: Bearer <token>`, verifies it through the
//! `TokenService`, and injects `AuthClaims` into request extensions for
//! downstream handlers. This is the single choke point: no protected
//! handler runs without claims having been established here first.

use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::auth::AuthClaims;
use crate::models::Role;

/// Require a valid bearer token on the request.
///
/// Accesses `ApiContext` from request extensions (injected by an
/// Extension layer). On success the verified `AuthClaims` are injected
/// for handlers; any failure rejects with 401 before resource logic.
pub async fn require_auth(req: Request<axum::body::Body>, next: Next) -> Response {
    match require_auth_inner(req, next).await {
        Ok(resp) => resp,
        Err(err) => err.into_response(),
    }
}

async fn require_auth_inner(
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let ctx: ApiContext = req
        .extensions()
        .get::<ApiContext>()
        .cloned()
        .ok_or(ApiError::Internal("missing API context".into()))?;

    let token = req
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(ApiError::Unauthorized)?;

    let claims = ctx.tokens.verify(token)?;

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

/// Role gate for operations restricted to one role.
pub fn require_role(claims: &AuthClaims, expected: Role, action: &str) -> Result<(), ApiError> {
    if claims.role == expected {
        Ok(())
    } else {
        Err(ApiError::Forbidden(format!(
            "Only {} accounts can {action}",
            expected.as_str()
        )))
    }
}

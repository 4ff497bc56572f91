//! API router.
//!
//! Two route groups: protected routes behind the bearer-auth middleware,
//! and public routes (registration, login, doctor directory, health).
//! CORS applies to everything, configured from `Settings`.

use axum::http::HeaderValue;
use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;

/// Build the full application router.
///
/// Middleware uses `Extension<ApiContext>` (injected as the outermost
/// layer of the protected group); handlers use `State<ApiContext>`.
pub fn api_router(ctx: ApiContext) -> Router {
    let cors = cors_layer(&ctx.settings.cors_origins);

    Router::new()
        .merge(protected_routes(ctx.clone()))
        .merge(public_routes(ctx))
        .layer(cors)
}

fn protected_routes(ctx: ApiContext) -> Router {
    Router::new()
        .route("/users/me", get(endpoints::users::me))
        .route(
            "/users/me/patient-profile",
            put(endpoints::users::update_patient_profile),
        )
        .route(
            "/users/me/doctor-profile",
            put(endpoints::users::update_doctor_profile),
        )
        .route(
            "/appointments",
            post(endpoints::appointments::create).get(endpoints::appointments::list),
        )
        .route(
            "/appointments/:id/status",
            put(endpoints::appointments::update_status),
        )
        .route(
            "/prescriptions",
            post(endpoints::prescriptions::create).get(endpoints::prescriptions::list),
        )
        .route(
            "/scans",
            post(endpoints::scans::save).get(endpoints::scans::list),
        )
        .route("/scans/:id", get(endpoints::scans::get))
        .with_state(ctx.clone())
        .layer(axum::middleware::from_fn(middleware::auth::require_auth))
        // Extension must be outermost so the middleware can extract ApiContext.
        .layer(axum::Extension(ctx))
}

fn public_routes(ctx: ApiContext) -> Router {
    Router::new()
        .route("/", get(endpoints::health::root))
        .route("/health", get(endpoints::health::check))
        .route("/auth/register", post(endpoints::auth::register))
        .route("/auth/login", post(endpoints::auth::login))
        .route("/users/doctors", get(endpoints::users::list_doctors))
        .route("/users/doctors/:id", get(endpoints::users::get_doctor))
        .with_state(ctx)
}

/// CORS from the configured origin list; `*` means any origin.
fn cors_layer(origins: &str) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origins.trim() == "*" {
        layer.allow_origin(Any)
    } else {
        let allowed: Vec<HeaderValue> = origins
            .split(',')
            .filter_map(|origin| origin.trim().parse().ok())
            .collect();
        layer.allow_origin(AllowOrigin::list(allowed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::Extension;
    use tower::ServiceExt;

    use crate::auth::{AuthClaims, TokenService};
    use crate::config::Settings;
    use crate::db::{self, Collections};
    use crate::models::Role;

    fn test_settings() -> Settings {
        Settings::from_lookup(|key| match key {
            "JWT_SECRET" => Some("router-test-secret".into()),
            _ => None,
        })
    }

    /// Context over a lazily-connecting client; no MongoDB is reachable
    /// and none of these tests touch a handler that queries it.
    async fn test_ctx() -> ApiContext {
        let settings = test_settings();
        let database = db::connect(&settings).await.unwrap();
        let tokens = TokenService::from_settings(&settings).unwrap();
        ApiContext::new(Collections::new(database), tokens, settings)
    }

    async fn whoami(Extension(claims): Extension<AuthClaims>) -> String {
        format!("{}:{}", claims.subject_id, claims.role.as_str())
    }

    /// Stub route behind the real middleware stack, so auth behavior is
    /// testable without a reachable store.
    fn guarded_stub(ctx: ApiContext) -> Router {
        Router::new()
            .route("/whoami", get(whoami))
            .layer(axum::middleware::from_fn(
                middleware::auth::require_auth,
            ))
            .layer(axum::Extension(ctx))
    }

    fn make_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(t) = token {
            builder = builder.header("Authorization", format!("Bearer {t}"));
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn protected_route_requires_token() {
        let app = api_router(test_ctx().await);
        let response = app
            .oneshot(make_request("GET", "/users/me", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn garbage_token_rejected() {
        let app = api_router(test_ctx().await);
        let response = app
            .oneshot(make_request("GET", "/appointments", Some("garbage")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn non_bearer_scheme_rejected() {
        let app = api_router(test_ctx().await);
        let request = Request::builder()
            .method("GET")
            .uri("/scans")
            .header("Authorization", "Basic dXNlcjpwdw==")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn valid_token_passes_claims_through() {
        let ctx = test_ctx().await;
        let token = ctx.tokens.issue("u-42", Role::Doctor).unwrap();
        let app = guarded_stub(ctx);

        let response = app
            .oneshot(make_request("GET", "/whoami", Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(&body[..], b"u-42:DOCTOR");
    }

    #[tokio::test]
    async fn root_is_public() {
        let app = api_router(test_ctx().await);
        let response = app.oneshot(make_request("GET", "/", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "running");
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let app = api_router(test_ctx().await);
        let response = app
            .oneshot(make_request("GET", "/forum", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

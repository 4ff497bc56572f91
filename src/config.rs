//! Environment-sourced runtime configuration.
//!
//! Only the keys listed here are recognized; everything else in the
//! environment is ignored. Defaults mirror a local development setup.

/// Application-level constants
pub const APP_NAME: &str = "HemaV API";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Runtime settings, resolved once at startup and injected everywhere
/// a handle is needed (no module-level globals).
#[derive(Debug, Clone)]
pub struct Settings {
    /// MongoDB connection string.
    pub mongodb_uri: String,
    /// Database name within the MongoDB deployment.
    pub db_name: String,
    /// HMAC secret for signing tokens.
    pub jwt_secret: String,
    /// Signing algorithm name, e.g. "HS256".
    pub jwt_algorithm: String,
    /// Token lifetime in hours.
    pub jwt_expiry_hours: i64,
    /// Comma-separated list of allowed CORS origins, or "*".
    pub cors_origins: String,
    /// Listen address for the HTTP server.
    pub bind_addr: String,
}

impl Settings {
    /// Resolve settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve settings from an arbitrary key lookup.
    ///
    /// Factored out from `from_env` so tests can supply values without
    /// mutating the process environment (env vars are process-global and
    /// tests run in parallel).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Self {
            mongodb_uri: get("MONGODB_URI", "mongodb://localhost:27017"),
            db_name: get("DB_NAME", "hemav"),
            jwt_secret: get("JWT_SECRET", "change-me-in-production"),
            jwt_algorithm: get("JWT_ALGORITHM", "HS256"),
            jwt_expiry_hours: lookup("JWT_EXPIRY_HOURS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(72),
            cors_origins: get("CORS_ORIGINS", "*"),
            bind_addr: get("BIND_ADDR", "0.0.0.0:8000"),
        }
    }
}

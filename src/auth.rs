//! Authentication core: password digests and signed identity tokens.
//!
//! Two pieces, both stateless:
//! - bcrypt credential hashing (`hash_password` / `verify_password`)
//! - `TokenService`, issuing and verifying self-contained JWTs carrying
//!   the subject id and role. Built once at startup from `Settings` and
//!   shared immutably across requests.

use std::str::FromStr;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::Settings;
use crate::models::Role;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Token missing, malformed, tampered, expired, or signed with the
    /// wrong algorithm. Deliberately one variant: callers surface all of
    /// these identically (401) without leaking which check failed.
    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Unsupported signing algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("Password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("Token encoding failed: {0}")]
    Encode(#[source] jsonwebtoken::errors::Error),
}

// ═══════════════════════════════════════════════════════════
// Credential store
// ═══════════════════════════════════════════════════════════

/// Hash a password with bcrypt at the default work factor.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    Ok(bcrypt::hash(password, bcrypt::DEFAULT_COST)?)
}

/// Verify a password against a stored bcrypt digest.
///
/// Total over user input: a mismatch and a malformed stored hash both
/// come back as `false`, never as an error.
pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}

// ═══════════════════════════════════════════════════════════
// Token service
// ═══════════════════════════════════════════════════════════

/// Verified identity claims extracted from a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthClaims {
    pub subject_id: String,
    pub role: Role,
}

/// Wire shape of the token payload.
#[derive(Debug, Serialize, Deserialize)]
struct TokenClaims {
    sub: String,
    role: Role,
    exp: i64,
}

/// Issues and verifies signed identity tokens.
///
/// Tokens are self-contained: validity is purely a function of signature
/// and expiry, no per-token state is held anywhere.
pub struct TokenService {
    header: Header,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: chrono::Duration,
}

impl TokenService {
    pub fn from_settings(settings: &Settings) -> Result<Self, AuthError> {
        let algorithm = Algorithm::from_str(&settings.jwt_algorithm)
            .map_err(|_| AuthError::UnsupportedAlgorithm(settings.jwt_algorithm.clone()))?;

        // Pin the algorithm and check `exp` strictly; the crate default
        // allows 60s of clock-skew leeway.
        let mut validation = Validation::new(algorithm);
        validation.leeway = 0;

        Ok(Self {
            header: Header::new(algorithm),
            encoding_key: EncodingKey::from_secret(settings.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(settings.jwt_secret.as_bytes()),
            validation,
            ttl: chrono::Duration::hours(settings.jwt_expiry_hours),
        })
    }

    /// Issue a token for the given subject, expiring `ttl` from now.
    pub fn issue(&self, subject_id: &str, role: Role) -> Result<String, AuthError> {
        let claims = TokenClaims {
            sub: subject_id.to_string(),
            role,
            exp: (chrono::Utc::now() + self.ttl).timestamp(),
        };
        jsonwebtoken::encode(&self.header, &claims, &self.encoding_key)
            .map_err(AuthError::Encode)
    }

    /// Verify signature and expiry, returning the embedded claims.
    pub fn verify(&self, token: &str) -> Result<AuthClaims, AuthError> {
        let data = jsonwebtoken::decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|_| AuthError::InvalidToken)?;
        Ok(AuthClaims {
            subject_id: data.claims.sub,
            role: data.claims.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_settings() -> Settings {
        Settings::from_lookup(|key| match key {
            "JWT_SECRET" => Some("unit-test-secret".into()),
            _ => None,
        })
    }

    fn service() -> TokenService {
        TokenService::from_settings(&test_settings()).unwrap()
    }

    #[test]
    fn password_round_trip() {
        let hash = hash_password("pw123456").unwrap();
        assert!(verify_password("pw123456", &hash));
    }

    #[test]
    fn wrong_password_rejected() {
        let hash = hash_password("pw123456").unwrap();
        assert!(!verify_password("pw1234567", &hash));
    }

    #[test]
    fn hash_is_salted() {
        let a = hash_password("pw123456").unwrap();
        let b = hash_password("pw123456").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn malformed_hash_is_a_mismatch_not_an_error() {
        assert!(!verify_password("pw123456", "not-a-bcrypt-hash"));
        assert!(!verify_password("pw123456", ""));
    }

    #[test]
    fn token_round_trip() {
        let svc = service();
        let token = svc.issue("user-1", Role::Doctor).unwrap();
        let claims = svc.verify(&token).unwrap();
        assert_eq!(claims.subject_id, "user-1");
        assert_eq!(claims.role, Role::Doctor);
    }

    #[test]
    fn garbage_token_rejected() {
        let svc = service();
        assert!(matches!(
            svc.verify("not.a.token"),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn tampered_token_rejected() {
        let svc = service();
        let mut token = svc.issue("user-1", Role::Patient).unwrap();
        // Flip a character in the signature segment.
        let flipped = if token.ends_with('A') { 'B' } else { 'A' };
        token.pop();
        token.push(flipped);
        assert!(svc.verify(&token).is_err());
    }

    #[test]
    fn wrong_secret_rejected() {
        let token = service().issue("user-1", Role::Patient).unwrap();

        let other = TokenService::from_settings(&Settings::from_lookup(|key| match key {
            "JWT_SECRET" => Some("a-different-secret".into()),
            _ => None,
        }))
        .unwrap();
        assert!(other.verify(&token).is_err());
    }

    #[test]
    fn expired_token_rejected() {
        let svc = service();
        let claims = TokenClaims {
            sub: "user-1".into(),
            role: Role::Patient,
            exp: (chrono::Utc::now() - chrono::Duration::hours(1)).timestamp(),
        };
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret("unit-test-secret".as_bytes()),
        )
        .unwrap();
        assert!(matches!(svc.verify(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn algorithm_mismatch_rejected() {
        let svc = service();
        let claims = TokenClaims {
            sub: "user-1".into(),
            role: Role::Patient,
            exp: (chrono::Utc::now() + chrono::Duration::hours(1)).timestamp(),
        };
        // Same secret, different algorithm: verification pins HS256.
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret("unit-test-secret".as_bytes()),
        )
        .unwrap();
        assert!(matches!(svc.verify(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn unknown_algorithm_name_rejected_at_construction() {
        let settings = Settings::from_lookup(|key| match key {
            "JWT_ALGORITHM" => Some("ROT13".into()),
            _ => None,
        });
        assert!(matches!(
            TokenService::from_settings(&settings),
            Err(AuthError::UnsupportedAlgorithm(_))
        ));
    }
}

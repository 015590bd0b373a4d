//! Password hashing, JWT issuance, and the bearer-token extractor.

use std::sync::OnceLock;

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::RngCore;
use regex::Regex;

use kedai_core::{
    defaults, reject_nul, CreateUserRequest, Error, Result, TokenPayload, UserPublic,
    UserRepository,
};

use crate::{ApiError, AppState};

const CREDENTIALS_ERROR: &str = "Could not validate credentials";

// =============================================================================
// PASSWORDS
// =============================================================================

/// Hash a password into an Argon2id PHC string.
pub fn hash_password(password: &str) -> Result<String> {
    let mut salt_bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut salt_bytes);
    let salt = SaltString::encode_b64(&salt_bytes)
        .map_err(|e| Error::Internal(format!("salt encoding failed: {}", e)))?;
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| Error::Internal(format!("password hashing failed: {}", e)))
}

/// Check a password against a stored PHC string. Malformed hashes never verify.
pub fn verify_password(password: &str, hashed: &str) -> bool {
    match PasswordHash::new(hashed) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

// =============================================================================
// TOKENS
// =============================================================================

/// HS256 signing keys and token lifetime.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    expires_minutes: i64,
}

impl std::fmt::Debug for JwtKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtKeys")
            .field("expires_minutes", &self.expires_minutes)
            .finish_non_exhaustive()
    }
}

impl JwtKeys {
    pub fn new(secret: &str, expires_minutes: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            expires_minutes,
        }
    }

    /// Issue a token whose subject is the user's email.
    pub fn issue(&self, email: &str) -> Result<String> {
        let exp = chrono::Utc::now() + chrono::Duration::minutes(self.expires_minutes);
        let claims = TokenPayload {
            sub: email.to_string(),
            exp: exp.timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| Error::Internal(format!("token signing failed: {}", e)))
    }

    /// Verify signature and expiry, returning the claims.
    pub fn verify(&self, token: &str) -> Result<TokenPayload> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<TokenPayload>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|_| Error::Unauthorized(CREDENTIALS_ERROR.to_string()))
    }
}

// =============================================================================
// REGISTRATION VALIDATION
// =============================================================================

fn email_regex() -> Option<&'static Regex> {
    static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL
        .get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").ok())
        .as_ref()
}

pub fn is_valid_email(email: &str) -> bool {
    email.chars().count() <= defaults::USER_FIELD_MAX
        && !email.contains('\0')
        && email_regex().is_some_and(|re| re.is_match(email))
}

/// Check name, email format and password length.
pub fn validate_registration(req: &CreateUserRequest) -> Result<()> {
    reject_nul("name", &req.name)?;
    reject_nul("email", &req.email)?;
    reject_nul("password", &req.password)?;
    let name_len = req.name.trim().chars().count();
    if name_len == 0 || name_len > defaults::USER_FIELD_MAX {
        return Err(Error::InvalidInput(format!(
            "name must be between 1 and {} characters",
            defaults::USER_FIELD_MAX
        )));
    }
    if !is_valid_email(req.email.trim()) {
        return Err(Error::InvalidInput(
            "value is not a valid email address".to_string(),
        ));
    }
    if req.password.chars().count() < defaults::PASSWORD_MIN_LENGTH {
        return Err(Error::InvalidInput(format!(
            "password must be at least {} characters",
            defaults::PASSWORD_MIN_LENGTH
        )));
    }
    Ok(())
}

// =============================================================================
// EXTRACTOR
// =============================================================================

/// The authenticated user behind a `Authorization: Bearer <jwt>` header.
///
/// Rejects with 401 when the header is missing, the token is invalid or
/// expired, or its subject no longer exists.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserPublic);

#[axum::async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> std::result::Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ApiError::Unauthorized("Not authenticated".to_string()))?;

        let claims = state.jwt.verify(token)?;

        let user = state
            .db
            .users
            .get_by_email(&claims.sub)
            .await?
            .ok_or_else(|| ApiError::Unauthorized(CREDENTIALS_ERROR.to_string()))?;

        Ok(CurrentUser(user.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_roundtrip() {
        let hash = hash_password("correct horse").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("correct horse", &hash));
        assert!(!verify_password("wrong horse", &hash));
    }

    #[test]
    fn test_password_hashes_are_salted() {
        assert_ne!(hash_password("same").unwrap(), hash_password("same").unwrap());
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }

    #[test]
    fn test_jwt_issue_and_verify() {
        let keys = JwtKeys::new("test-secret", 60);
        let token = keys.issue("ayu@example.com").unwrap();
        let claims = keys.verify(&token).unwrap();
        assert_eq!(claims.sub, "ayu@example.com");
        assert!(claims.exp > chrono::Utc::now().timestamp());
    }

    #[test]
    fn test_jwt_wrong_secret_rejected() {
        let token = JwtKeys::new("one", 60).issue("a@b.co").unwrap();
        let err = JwtKeys::new("two", 60).verify(&token).unwrap_err();
        assert!(matches!(err, Error::Unauthorized(_)));
    }

    #[test]
    fn test_jwt_expired_rejected() {
        let keys = JwtKeys::new("secret", -10);
        let token = keys.issue("a@b.co").unwrap();
        assert!(keys.verify(&token).is_err());
    }

    #[test]
    fn test_email_format() {
        assert!(is_valid_email("rina@example.com"));
        assert!(!is_valid_email("rina@localhost"));
        assert!(!is_valid_email("two@@example.com"));
        assert!(!is_valid_email("spaced name@example.com"));
        assert!(!is_valid_email("rina\0@example.com"));
    }

    #[test]
    fn test_validate_registration() {
        let ok = CreateUserRequest {
            name: "Rina".into(),
            email: "rina@example.com".into(),
            password: "longenough".into(),
        };
        assert!(validate_registration(&ok).is_ok());

        let mut bad = ok.clone();
        bad.email = "not-an-email".into();
        assert!(validate_registration(&bad).is_err());

        let mut bad = ok.clone();
        bad.password = "short".into();
        assert!(validate_registration(&bad).is_err());

        let mut bad = ok;
        bad.name = "  ".into();
        assert!(validate_registration(&bad).is_err());
    }

    #[test]
    fn test_validate_registration_rejects_nul() {
        let ok = CreateUserRequest {
            name: "Rina".into(),
            email: "rina@example.com".into(),
            password: "longenough".into(),
        };

        let mut bad = ok.clone();
        bad.name = "Ri\0na".into();
        assert!(matches!(validate_registration(&bad), Err(Error::InvalidInput(_))));

        let mut bad = ok.clone();
        bad.email = "rina\0@example.com".into();
        assert!(matches!(validate_registration(&bad), Err(Error::InvalidInput(_))));

        let mut bad = ok;
        bad.password = "longenough\0".into();
        assert!(matches!(validate_registration(&bad), Err(Error::InvalidInput(_))));
    }
}

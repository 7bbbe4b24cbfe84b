//! # JWT Token Management
//!
//! HS256 access tokens for API authentication. The secret is configured
//! base64-encoded; issuer, audience and expiry are always validated.

use std::{
    collections::HashSet,
    time::{Duration, SystemTime},
};

use base64::Engine;
use cuid2::CuidConstructor;
use error::AppError;
use jsonwebtoken::{errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::{Result, Role};

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Base64-encoded HMAC secret
    pub secret:             String,
    /// Lifetime of issued tokens
    pub expiration_seconds: u64,
    /// Expected `iss` claim
    pub issuer:             String,
    /// Expected `aud` claim
    pub audience:           String,
}

impl JwtConfig {
    /// Default token lifetime: one hour.
    pub const DEFAULT_EXPIRATION_SECONDS: u64 = 3600;

    /// Check that the secret decodes and is long enough for HS256.
    pub fn validate(&self) -> Result<()> {
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(&self.secret)
            .map_err(|e| AppError::config(format!("JWT secret is not valid base64: {}", e)))?;
        if bytes.len() < 32 {
            return Err(AppError::config("JWT secret must decode to at least 32 bytes"));
        }
        if self.issuer.is_empty() || self.audience.is_empty() {
            return Err(AppError::config("JWT issuer and audience must be set"));
        }
        Ok(())
    }
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,

    /// User email
    pub email: String,

    /// User roles
    pub roles: Vec<String>,

    /// Token issuer
    pub iss: String,

    /// Token audience
    pub aud: String,

    /// Expiration time (Unix timestamp)
    pub exp: u64,

    /// Issued at (Unix timestamp)
    pub iat: u64,

    /// Unique token ID
    pub jti: String,
}

impl Claims {
    /// The subject as a user id.
    pub fn user_id(&self) -> Result<uuid::Uuid> {
        uuid::Uuid::parse_str(&self.sub).map_err(|_| AppError::JwtInvalidToken)
    }

    /// Known roles carried by the token.
    pub fn roles(&self) -> Vec<Role> { Role::parse_all(&self.roles) }
}

/// Creates a new JWT access token
///
/// # Errors
///
/// Returns an error if the secret is not valid base64 or encoding fails.
pub fn create_access_token(config: &JwtConfig, user_id: uuid::Uuid, email: &str, roles: &[Role]) -> Result<String> {
    let now = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map_err(|e| AppError::internal(format!("Failed to get current time: {}", e)))?;

    let expiration = now + Duration::from_secs(config.expiration_seconds);

    let claims = Claims {
        sub:   user_id.to_string(),
        email: email.to_string(),
        roles: roles.iter().map(|r| r.as_str().to_string()).collect(),
        iss:   config.issuer.clone(),
        aud:   config.audience.clone(),
        exp:   expiration.as_secs(),
        iat:   now.as_secs(),
        jti:   CuidConstructor::new().with_length(32).create_id(),
    };

    let key = EncodingKey::from_base64_secret(&config.secret)
        .map_err(|e| AppError::config(format!("Invalid JWT secret: {}", e)))?;

    jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &key)
        .map_err(|e| AppError::internal(format!("Failed to encode token: {}", e)))
}

/// Validates a JWT token and returns the claims
///
/// # Errors
///
/// Returns [`AppError::JwtExpired`] for an expired token and
/// [`AppError::JwtInvalidToken`] for any other validation failure.
pub fn validate_token(config: &JwtConfig, token: &str) -> Result<Claims> {
    let decoding_key = DecodingKey::from_base64_secret(&config.secret)
        .map_err(|e| AppError::config(format!("Invalid JWT secret: {}", e)))?;

    let mut validation = Validation::new(Algorithm::HS256);
    validation.iss = Some(HashSet::from([config.issuer.clone()]));
    validation.aud = Some(HashSet::from([config.audience.clone()]));
    validation.validate_exp = true;

    match jsonwebtoken::decode::<Claims>(token, &decoding_key, &validation) {
        Ok(data) => Ok(data.claims),
        Err(e) if matches!(e.kind(), ErrorKind::ExpiredSignature) => Err(AppError::JwtExpired),
        Err(e) => {
            tracing::debug!(error = %e, "Token validation failed");
            Err(AppError::JwtInvalidToken)
        },
    }
}

/// Extracts the Bearer token from the Authorization header
///
/// Returns `None` when the scheme is not `Bearer` or the token is empty.
pub fn extract_bearer_token(auth_header: &str) -> Option<String> {
    let token = auth_header.strip_prefix("Bearer ")?.trim();

    if token.is_empty() {
        return None;
    }

    Some(token.to_string())
}

/// A fresh random secret in the configured base64 form.
pub fn generate_secret() -> String {
    let seed = format!(
        "{}{}",
        CuidConstructor::new().with_length(32).create_id(),
        CuidConstructor::new().with_length(32).create_id()
    );
    base64::engine::general_purpose::STANDARD.encode(seed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> JwtConfig {
        JwtConfig {
            secret:             base64::engine::general_purpose::STANDARD
                .encode("test-secret-key-that-is-at-least-32-bytes-long"),
            expiration_seconds: 3600,
            issuer:             "test-issuer".to_string(),
            audience:           "test-audience".to_string(),
        }
    }

    #[test]
    fn test_create_and_validate_token() {
        let config = config();
        let user_id = uuid::Uuid::new_v4();

        let token = create_access_token(&config, user_id, "test@example.com", &[Role::Admin])
            .expect("Failed to create token");

        let claims = validate_token(&config, &token).expect("Failed to validate token");

        assert_eq!(claims.user_id().unwrap(), user_id);
        assert_eq!(claims.email, "test@example.com");
        assert_eq!(claims.roles(), vec![Role::Admin]);
        assert_eq!(claims.iss, "test-issuer");
        assert_eq!(claims.aud, "test-audience");
        assert_eq!(claims.jti.len(), 32);
    }

    #[test]
    fn test_wrong_audience_is_rejected() {
        let config = config();
        let token = create_access_token(&config, uuid::Uuid::new_v4(), "a@b.c", &[]).unwrap();

        let other = JwtConfig {
            audience: "someone-else".to_string(),
            ..config
        };
        assert!(matches!(validate_token(&other, &token), Err(AppError::JwtInvalidToken)));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let config = config();
        let now = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap()
            .as_secs();
        let claims = Claims {
            sub:   uuid::Uuid::new_v4().to_string(),
            email: "late@example.com".to_string(),
            roles: vec![],
            iss:   config.issuer.clone(),
            aud:   config.audience.clone(),
            exp:   now - 3600,
            iat:   now - 7200,
            jti:   "expired".to_string(),
        };
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_base64_secret(&config.secret).unwrap(),
        )
        .unwrap();

        assert!(matches!(validate_token(&config, &token), Err(AppError::JwtExpired)));
    }

    #[test]
    fn test_non_uuid_subject() {
        let claims = Claims {
            sub:   "user-123".to_string(),
            email: String::new(),
            roles: vec![],
            iss:   String::new(),
            aud:   String::new(),
            exp:   0,
            iat:   0,
            jti:   String::new(),
        };
        assert!(claims.user_id().is_err());
    }

    #[test]
    fn test_extract_bearer_token() {
        let token = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.test-token";
        let auth_header = format!("Bearer {}", token);

        let extracted = extract_bearer_token(&auth_header).expect("Failed to extract token");

        assert_eq!(extracted, token);
    }

    #[test]
    fn test_extract_bearer_token_invalid_format() {
        assert!(extract_bearer_token("Basic abc123").is_none());
        assert!(extract_bearer_token("Bearer").is_none());
        assert!(extract_bearer_token("Bearer   ").is_none());
        assert!(extract_bearer_token("").is_none());
    }

    #[test]
    fn test_config_validation() {
        assert!(config().validate().is_ok());
        let short = JwtConfig {
            secret: base64::engine::general_purpose::STANDARD.encode("short"),
            ..config()
        };
        assert!(short.validate().is_err());
        let generated = JwtConfig {
            secret: generate_secret(),
            ..config()
        };
        assert!(generated.validate().is_ok());
    }
}

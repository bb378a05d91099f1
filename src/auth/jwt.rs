//! JWT token service
//!
//! Generation, validation and parsing of access tokens.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// JWT configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Signing secret (at least 32 bytes)
    pub secret: String,
    /// Token lifetime in minutes
    pub expiration_minutes: i64,
    /// Token issuer
    pub issuer: String,
    /// Token audience
    pub audience: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: load_jwt_secret(),
            expiration_minutes: std::env::var("JWT_EXPIRATION_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1440), // 24h
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "storefront".to_string()),
            audience: std::env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| "storefront-clients".to_string()),
        }
    }
}

/// Load the JWT secret from the environment.
///
/// In development a random secret is generated when `JWT_SECRET` is unset;
/// in release builds a missing or short secret is fatal.
fn load_jwt_secret() -> String {
    match std::env::var("JWT_SECRET") {
        Ok(secret) if secret.len() >= 32 => secret,
        Ok(_) => panic!("JWT_SECRET must be at least 32 characters long"),
        Err(_) => {
            #[cfg(debug_assertions)]
            {
                tracing::warn!("JWT_SECRET not set, generating temporary key for development");
                generate_dev_secret()
            }
            #[cfg(not(debug_assertions))]
            {
                panic!("JWT_SECRET environment variable must be set in production")
            }
        }
    }
}

/// Generate a random printable secret for development use.
#[cfg(debug_assertions)]
fn generate_dev_secret() -> String {
    use rand::Rng;
    const CHARSET: &[u8] =
        b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*-_=+";
    let mut rng = rand::thread_rng();
    (0..64)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect()
}

/// Claims stored in the token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID (subject)
    pub sub: String,
    /// Username
    pub username: String,
    /// Display name snapshot
    pub first_name: String,
    /// Staff (administrative) flag
    pub is_staff: bool,
    /// Expiry timestamp
    pub exp: i64,
    /// Issued-at timestamp
    pub iat: i64,
    /// Issuer
    pub iss: String,
    /// Audience
    pub aud: String,
}

/// JWT errors
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token expired")]
    ExpiredToken,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Token generation failed: {0}")]
    GenerationFailed(String),
}

/// JWT token service
#[derive(Debug, Clone)]
pub struct JwtService {
    pub config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    pub fn new() -> Self {
        Self::with_config(JwtConfig::default())
    }

    pub fn with_config(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Generate a new access token for a user
    pub fn generate_token(
        &self,
        user_id: i64,
        username: &str,
        first_name: &str,
        is_staff: bool,
    ) -> Result<String, JwtError> {
        let now = Utc::now();
        let expiration = now + Duration::minutes(self.config.expiration_minutes);

        let claims = Claims {
            sub: user_id.to_string(),
            username: username.to_string(),
            first_name: first_name.to_string(),
            is_staff,
            exp: expiration.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    /// Validate and decode a token
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.config.audience]);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_required_spec_claims(&["sub", "exp", "iat", "iss", "aud"]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                ErrorKind::InvalidToken => JwtError::InvalidToken(e.to_string()),
                _ => JwtError::InvalidToken(format!("Token validation failed: {e}")),
            }
        })?;

        Ok(token_data.claims)
    }

    /// Extract the token from an Authorization header
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ")
    }
}

impl Default for JwtService {
    fn default() -> Self {
        Self::new()
    }
}

/// Current user context, parsed from validated JWT claims.
///
/// Created by the [`CurrentUser`] extractor and available to any protected
/// handler as a function argument.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub is_staff: bool,
}

impl TryFrom<Claims> for CurrentUser {
    type Error = std::num::ParseIntError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        Ok(Self {
            id: claims.sub.parse()?,
            username: claims.username,
            first_name: claims.first_name,
            is_staff: claims.is_staff,
        })
    }
}

impl CurrentUser {
    /// Reject non-staff callers.
    pub fn require_staff(&self) -> Result<(), crate::utils::AppError> {
        if self.is_staff {
            Ok(())
        } else {
            Err(crate::utils::AppError::forbidden("Staff access required"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_service() -> JwtService {
        JwtService::with_config(JwtConfig {
            secret: "test-secret-test-secret-test-secret-test".to_string(),
            expiration_minutes: 60,
            issuer: "storefront".to_string(),
            audience: "storefront-clients".to_string(),
        })
    }

    #[test]
    fn test_jwt_generation_and_validation() {
        let service = test_service();

        let token = service
            .generate_token(42, "john_doe", "John", false)
            .expect("Failed to generate test token");

        let claims = service
            .validate_token(&token)
            .expect("Failed to validate test token");

        assert_eq!(claims.sub, "42");
        assert_eq!(claims.username, "john_doe");
        assert_eq!(claims.first_name, "John");
        assert!(!claims.is_staff);
    }

    #[test]
    fn test_current_user_from_claims() {
        let service = test_service();
        let token = service
            .generate_token(7, "admin", "Ada", true)
            .expect("Failed to generate test token");
        let claims = service
            .validate_token(&token)
            .expect("Failed to validate test token");

        let user = CurrentUser::try_from(claims).expect("Claims should carry numeric sub");
        assert_eq!(user.id, 7);
        assert!(user.is_staff);
        assert!(user.require_staff().is_ok());
    }

    #[test]
    fn test_non_staff_rejected() {
        let user = CurrentUser {
            id: 1,
            username: "jane".to_string(),
            first_name: "Jane".to_string(),
            is_staff: false,
        };
        assert!(user.require_staff().is_err());
    }

    #[test]
    fn test_tampered_token_rejected() {
        let service = test_service();
        let token = service
            .generate_token(1, "john", "John", false)
            .expect("Failed to generate test token");

        let mut tampered = token.clone();
        tampered.push('x');
        assert!(service.validate_token(&tampered).is_err());
    }
}

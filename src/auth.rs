// ABOUTME: JWT session tokens for the Spotter REST API
// ABOUTME: Issues HS256 tokens at login and validates them with detailed failure reasons
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::service_names::JWT_AUDIENCE;
use crate::errors::{AppError, AppResult};
use crate::models::UserProfile;

/// Why a token was rejected
#[derive(Debug, Clone, thiserror::Error)]
pub enum JwtValidationError {
    /// Token has expired
    #[error("JWT token expired at {}", expired_at.format("%Y-%m-%d %H:%M:%S UTC"))]
    TokenExpired {
        /// When the token expired
        expired_at: DateTime<Utc>,
    },
    /// Signature or claims rejected
    #[error("JWT token is invalid: {reason}")]
    TokenInvalid {
        /// Reason for invalidity
        reason: String,
    },
    /// Not a JWT at all
    #[error("JWT token is malformed: {details}")]
    TokenMalformed {
        /// Details about malformation
        details: String,
    },
}

impl From<JwtValidationError> for AppError {
    fn from(error: JwtValidationError) -> Self {
        match error {
            JwtValidationError::TokenExpired { .. } => Self::auth_expired(),
            other => Self::auth_invalid(other.to_string()),
        }
    }
}

/// JWT claims for user sessions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    /// Username
    pub username: String,
    /// Issued at
    pub iat: i64,
    /// Expiration
    pub exp: i64,
    /// Audience
    pub aud: String,
}

impl Claims {
    /// Subject as a user id
    ///
    /// # Errors
    ///
    /// Returns `AUTH_INVALID` if the subject is not a UUID
    pub fn user_id(&self) -> AppResult<Uuid> {
        Uuid::parse_str(&self.sub)
            .map_err(|_| AppError::auth_invalid("Token subject is not a valid user id"))
    }
}

/// Issues and validates session tokens
#[derive(Clone)]
pub struct AuthManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry_hours: i64,
}

impl std::fmt::Debug for AuthManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthManager")
            .field("expiry_hours", &self.expiry_hours)
            .finish_non_exhaustive()
    }
}

impl AuthManager {
    /// Create a manager from a shared secret
    #[must_use]
    pub fn new(secret: &[u8], expiry_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            expiry_hours,
        }
    }

    /// Token lifetime in hours
    #[must_use]
    pub const fn expiry_hours(&self) -> i64 {
        self.expiry_hours
    }

    /// Issue a session token for a user
    ///
    /// # Errors
    ///
    /// Returns an error if signing fails
    pub fn generate_token(&self, user: &UserProfile) -> AppResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(self.expiry_hours)).timestamp(),
            aud: JWT_AUDIENCE.to_owned(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to sign token: {e}")))
    }

    /// Validate a token and return its claims
    ///
    /// # Errors
    ///
    /// Returns a [`JwtValidationError`] describing why the token was rejected
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtValidationError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[JWT_AUDIENCE]);
        validation.leeway = 0;

        match decode::<Claims>(token, &self.decoding_key, &validation) {
            Ok(data) => Ok(data.claims),
            Err(e) => Err(self.convert_jwt_error(token, &e)),
        }
    }

    fn convert_jwt_error(&self, token: &str, e: &jsonwebtoken::errors::Error) -> JwtValidationError {
        tracing::debug!(error = ?e, "JWT validation failed");
        match e.kind() {
            ErrorKind::ExpiredSignature => JwtValidationError::TokenExpired {
                expired_at: self.expired_at(token).unwrap_or_else(Utc::now),
            },
            ErrorKind::InvalidSignature => JwtValidationError::TokenInvalid {
                reason: "Token signature verification failed".into(),
            },
            ErrorKind::InvalidAudience => JwtValidationError::TokenInvalid {
                reason: "Token audience mismatch".into(),
            },
            ErrorKind::InvalidToken => JwtValidationError::TokenMalformed {
                details: "Token format is invalid".into(),
            },
            ErrorKind::Base64(err) => JwtValidationError::TokenMalformed {
                details: format!("Token contains invalid base64: {err}"),
            },
            ErrorKind::Json(err) => JwtValidationError::TokenMalformed {
                details: format!("Token contains invalid JSON: {err}"),
            },
            ErrorKind::Utf8(err) => JwtValidationError::TokenMalformed {
                details: format!("Token contains invalid UTF-8: {err}"),
            },
            _ => JwtValidationError::TokenInvalid {
                reason: format!("Token validation failed: {e}"),
            },
        }
    }

    /// Read `exp` from a token whose only fault is being expired
    fn expired_at(&self, token: &str) -> Option<DateTime<Utc>> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[JWT_AUDIENCE]);
        validation.validate_exp = false;
        decode::<Claims>(token, &self.decoding_key, &validation)
            .ok()
            .and_then(|data| DateTime::from_timestamp(data.claims.exp, 0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager(hours: i64) -> AuthManager {
        AuthManager::new(b"test-secret-with-enough-entropy", hours)
    }

    #[test]
    fn test_token_round_trip() {
        let user = UserProfile::new("lifter", "lifter@example.com");
        let auth = manager(24);

        let token = auth.generate_token(&user).unwrap();
        let claims = auth.validate_token(&token).unwrap();

        assert_eq!(claims.user_id().unwrap(), user.id);
        assert_eq!(claims.username, "lifter");
        assert_eq!(claims.aud, "spotter");
    }

    #[test]
    fn test_expired_token() {
        let user = UserProfile::new("lifter", "lifter@example.com");
        let auth = manager(-1);

        let token = auth.generate_token(&user).unwrap();
        let err = auth.validate_token(&token).unwrap_err();
        assert!(matches!(err, JwtValidationError::TokenExpired { .. }));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let user = UserProfile::new("lifter", "lifter@example.com");
        let token = manager(1).generate_token(&user).unwrap();

        let other = AuthManager::new(b"a-completely-different-secret", 1);
        let err = other.validate_token(&token).unwrap_err();
        assert!(matches!(err, JwtValidationError::TokenInvalid { .. }));
    }

    #[test]
    fn test_garbage_token_is_malformed() {
        let err = manager(1).validate_token("not-a-jwt").unwrap_err();
        assert!(matches!(err, JwtValidationError::TokenMalformed { .. }));
    }
}

//! Token issuance and verification.
//!
//! Tokens are HS256 JWTs. Access tokens are signed with
//! [`JwtConfig::access_secret`], refresh tokens with
//! [`JwtConfig::refresh_secret`]. Expiry is checked without leeway.

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use shelfwise_config::JwtConfig;

use crate::claims::{Claims, RefreshTokenClaims};
use crate::role::Role;

/// Why a token could not be issued or accepted.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("token signature is invalid")]
    InvalidSignature,
    #[error("token has expired")]
    Expired,
    #[error("token is malformed")]
    Malformed,
    #[error("failed to encode token: {0}")]
    Encoding(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            _ => TokenError::Malformed,
        }
    }
}

fn now_timestamp() -> usize {
    Utc::now().timestamp() as usize
}

fn sign<T: Serialize>(claims: &T, secret: &str) -> Result<String, TokenError> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| TokenError::Encoding(e.to_string()))
}

fn verify<T: DeserializeOwned>(token: &str, secret: &str) -> Result<T, TokenError> {
    let mut validation = Validation::default();
    validation.leeway = 0;

    decode::<T>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(TokenError::from)
}

/// Creates a short-lived access token for a signed-in user.
///
/// The role is embedded so that route gating needs no database lookup.
///
/// # Arguments
///
/// * `user_id` - The user's UUID, stored as the `sub` claim
/// * `email` - The user's email address
/// * `role` - The user's role at sign-in time
/// * `jwt_config` - Supplies `access_secret` and `access_token_expiry`
///
/// # Errors
///
/// Returns [`TokenError::Encoding`] if the token cannot be signed.
pub fn create_access_token(
    user_id: Uuid,
    email: &str,
    role: Role,
    jwt_config: &JwtConfig,
) -> Result<String, TokenError> {
    let now = now_timestamp();

    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        role,
        exp: now + jwt_config.access_token_expiry as usize,
        iat: now,
    };

    sign(&claims, &jwt_config.access_secret)
}

/// Verifies an access token and returns its claims.
///
/// # Errors
///
/// * [`TokenError::Expired`] - `exp` is in the past (no leeway)
/// * [`TokenError::InvalidSignature`] - signed with a different secret
/// * [`TokenError::Malformed`] - anything else `jsonwebtoken` rejects
pub fn verify_access_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, TokenError> {
    verify(token, &jwt_config.access_secret)
}

/// Creates a long-lived refresh token.
///
/// Each token carries a fresh `jti`, so two tokens issued in the same second
/// still differ.
///
/// # Arguments
///
/// * `user_id` - The user's UUID, stored as the `sub` claim
/// * `email` - The user's email address
/// * `role` - Carried so a refresh-only session can still be authorized
/// * `jwt_config` - Supplies `refresh_secret` and `refresh_token_expiry`
///
/// # Errors
///
/// Returns [`TokenError::Encoding`] if the token cannot be signed.
pub fn create_refresh_token(
    user_id: Uuid,
    email: &str,
    role: Role,
    jwt_config: &JwtConfig,
) -> Result<String, TokenError> {
    let now = now_timestamp();

    let claims = RefreshTokenClaims {
        sub: user_id.to_string(),
        email: email.to_string(),
        role,
        exp: now + jwt_config.refresh_token_expiry as usize,
        iat: now,
        jti: Uuid::new_v4().to_string(),
    };

    sign(&claims, &jwt_config.refresh_secret)
}

/// Verifies a refresh token against `refresh_secret`.
///
/// # Errors
///
/// Same as [`verify_access_token`]. An access token presented here fails with
/// [`TokenError::InvalidSignature`].
pub fn verify_refresh_token(
    token: &str,
    jwt_config: &JwtConfig,
) -> Result<RefreshTokenClaims, TokenError> {
    verify(token, &jwt_config.refresh_secret)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_test_jwt_config() -> JwtConfig {
        JwtConfig {
            access_secret: "test-access-secret-at-least-32-characters".to_string(),
            refresh_secret: "test-refresh-secret-at-least-32-characters".to_string(),
            access_token_expiry: 900,
            refresh_token_expiry: 604800,
        }
    }

    #[test]
    fn test_access_token_roundtrip() {
        let config = get_test_jwt_config();
        let user_id = Uuid::new_v4();

        let token = create_access_token(user_id, "test@example.com", Role::Student, &config)
            .unwrap();
        let claims = verify_access_token(&token, &config).unwrap();

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.email, "test@example.com");
        assert_eq!(claims.role, Role::Student);
        assert_eq!(claims.exp - claims.iat, 900);
    }

    #[test]
    fn test_refresh_token_roundtrip() {
        let config = get_test_jwt_config();
        let user_id = Uuid::new_v4();

        let token =
            create_refresh_token(user_id, "test@example.com", Role::Librarian, &config).unwrap();
        let claims = verify_refresh_token(&token, &config).unwrap();

        assert_eq!(claims.user_id(), Some(user_id));
        assert_eq!(claims.role, Role::Librarian);
        assert_eq!(claims.exp - claims.iat, 604800);
        assert!(!claims.jti.is_empty());
    }

    #[test]
    fn test_refresh_tokens_are_unique() {
        let config = get_test_jwt_config();
        let user_id = Uuid::new_v4();

        let first = create_refresh_token(user_id, "a@test.com", Role::Student, &config).unwrap();
        let second = create_refresh_token(user_id, "a@test.com", Role::Student, &config).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_refresh_token_is_not_an_access_token() {
        let config = get_test_jwt_config();
        let token =
            create_refresh_token(Uuid::new_v4(), "a@test.com", Role::Student, &config).unwrap();

        let result = verify_access_token(&token, &config);
        assert!(matches!(result, Err(TokenError::InvalidSignature)));
    }

    #[test]
    fn test_access_token_is_not_a_refresh_token() {
        let config = get_test_jwt_config();
        let token =
            create_access_token(Uuid::new_v4(), "a@test.com", Role::Student, &config).unwrap();

        let result = verify_refresh_token(&token, &config);
        assert!(matches!(result, Err(TokenError::InvalidSignature)));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let config = get_test_jwt_config();
        let now = now_timestamp();
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            email: "late@test.com".to_string(),
            role: Role::Student,
            exp: now - 10,
            iat: now - 910,
        };
        let token = sign(&claims, &config.access_secret).unwrap();

        let result = verify_access_token(&token, &config);
        assert!(matches!(result, Err(TokenError::Expired)));
    }

    #[test]
    fn test_garbage_token_is_malformed() {
        let config = get_test_jwt_config();
        let result = verify_access_token("invalid-token", &config);
        assert!(matches!(result, Err(TokenError::Malformed)));
    }

    #[test]
    fn test_wrong_secret_is_invalid_signature() {
        let config = get_test_jwt_config();
        let token =
            create_access_token(Uuid::new_v4(), "a@test.com", Role::Student, &config).unwrap();

        let wrong_config = JwtConfig {
            access_secret: "different-secret-key-at-least-32-characters".to_string(),
            ..config
        };

        let result = verify_access_token(&token, &wrong_config);
        assert!(matches!(result, Err(TokenError::InvalidSignature)));
    }
}

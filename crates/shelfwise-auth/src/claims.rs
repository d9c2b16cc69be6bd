//! JWT claim structures.
//!
//! - [`Claims`]: access token claims
//! - [`RefreshTokenClaims`]: refresh token claims, used to mint new access tokens

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::role::Role;

/// Claims carried by a short-lived access token.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    /// User ID (subject claim)
    pub sub: String,
    pub email: String,
    pub role: Role,
    /// Expiration (Unix timestamp)
    pub exp: usize,
    /// Issued-at (Unix timestamp)
    pub iat: usize,
}

/// Claims carried by a long-lived refresh token.
///
/// The role travels with the token so a session resolved from the refresh
/// token alone can still be authorized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshTokenClaims {
    pub sub: String,
    pub email: String,
    pub role: Role,
    pub exp: usize,
    pub iat: usize,
    /// Unique token identifier (JWT ID)
    pub jti: String,
}

impl Claims {
    pub fn user_id(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.sub).ok()
    }
}

impl RefreshTokenClaims {
    pub fn user_id(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.sub).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_serialize() {
        let claims = Claims {
            sub: "user-id-123".to_string(),
            email: "test@example.com".to_string(),
            role: Role::Librarian,
            exp: 1234567890,
            iat: 1234567800,
        };
        let serialized = serde_json::to_string(&claims).unwrap();
        assert!(serialized.contains(r#""sub":"user-id-123""#));
        assert!(serialized.contains(r#""role":"LIBRARIAN""#));
    }

    #[test]
    fn test_claims_deserialize() {
        let json = r#"{"sub":"user-id-456","email":"user@test.com","role":"STUDENT","exp":9999999999,"iat":9999999900}"#;
        let claims: Claims = serde_json::from_str(json).unwrap();
        assert_eq!(claims.sub, "user-id-456");
        assert_eq!(claims.role, Role::Student);
        assert_eq!(claims.exp, 9999999999);
    }

    #[test]
    fn test_user_id_parses_subject() {
        let id = Uuid::new_v4();
        let claims = RefreshTokenClaims {
            sub: id.to_string(),
            email: "refresh@test.com".to_string(),
            role: Role::Student,
            exp: 1234567890,
            iat: 1234567800,
            jti: "test-jti".to_string(),
        };
        assert_eq!(claims.user_id(), Some(id));

        let bad = Claims {
            sub: "not-a-uuid".to_string(),
            email: "x@test.com".to_string(),
            role: Role::Student,
            exp: 0,
            iat: 0,
        };
        assert_eq!(bad.user_id(), None);
    }
}

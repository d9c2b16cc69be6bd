//! # Shelfwise Auth
//!
//! Roles, token claims and JWT utilities.
//!
//! - [`role`]: the closed set of user roles
//! - [`claims`]: access and refresh token claims
//! - [`jwt`]: token issuance and verification
//!
//! Access and refresh tokens are signed with separate secrets, so a refresh
//! token never verifies as an access token and vice versa.
//!
//! # Example
//!
//! ```ignore
//! use shelfwise_auth::{Role, create_access_token, verify_access_token};
//! use shelfwise_config::JwtConfig;
//!
//! let config = JwtConfig::from_env();
//! let token = create_access_token(user_id, "reader@example.com", Role::Student, &config)?;
//! let claims = verify_access_token(&token, &config)?;
//! ```

pub mod claims;
pub mod jwt;
pub mod role;

pub use claims::{Claims, RefreshTokenClaims};
pub use jwt::{
    TokenError, create_access_token, create_refresh_token, verify_access_token,
    verify_refresh_token,
};
pub use role::{InvalidRole, Role};

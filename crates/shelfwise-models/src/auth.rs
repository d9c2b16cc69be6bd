//! Registration and login DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::users::User;

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 255, message = "Username is required"))]
    #[schema(example = "ada")]
    pub username: String,
    #[validate(email(message = "Invalid email address"))]
    #[schema(example = "ada@library.test")]
    pub email: String,
    #[validate(length(min = 6, max = 12, message = "Password must be between 6 and 12 characters"))]
    #[schema(example = "secret1")]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    #[schema(example = "secret1")]
    pub password: String,
}

/// Body of a successful register or login; the tokens travel as cookies.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthResponse {
    pub message: String,
    pub user: User,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

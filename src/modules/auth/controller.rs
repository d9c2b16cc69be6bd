use axum::{
    Json,
    extract::{FromRequestParts, Path, State},
    http::{StatusCode, request::Parts},
};
use serde::Serialize;
use tracing::instrument;
use utoipa::ToSchema;

use shelfwise_auth::Role;
use shelfwise_core::{AppError, ErrorResponse};
use shelfwise_models::{AuthResponse, LoginRequest, MessageResponse, RegisterRequest};

use super::service::AuthService;
use crate::middleware::auth::AuthUser;
use crate::middleware::cookies::SessionCookies;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// `{role}` path segment of the register route, parsed case-insensitively.
#[derive(Debug, Clone, Copy)]
pub struct RegistrationRole(pub Role);

impl<S> FromRequestParts<S> for RegistrationRole
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::bad_request(anyhow::anyhow!("Invalid role")))?;

        raw.parse::<Role>()
            .map(RegistrationRole)
            .map_err(AppError::bad_request)
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MeResponse {
    pub user: AuthUser,
}

/// Register a new account with the given role
#[utoipa::path(
    post,
    path = "/api/v1/auth/register/{role}",
    params(
        ("role" = Role, Path, description = "LIBRARIAN or STUDENT (case-insensitive)")
    ),
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered; access and refresh cookies set", body = AuthResponse),
        (status = 400, description = "Invalid role or email already exists", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn register_user(
    State(state): State<AppState>,
    RegistrationRole(role): RegistrationRole,
    ValidatedJson(dto): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, SessionCookies, Json<AuthResponse>), AppError> {
    let user = AuthService::register_user(&state.db, role, dto).await?;
    let cookies = SessionCookies::issue(&state, user.id.into_inner(), &user.email, user.role)?;

    Ok((
        StatusCode::CREATED,
        cookies,
        Json(AuthResponse {
            message: "User registered successfully".to_string(),
            user,
        }),
    ))
}

/// Log in with email and password
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful; access and refresh cookies set", body = AuthResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn login_user(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<(SessionCookies, Json<AuthResponse>), AppError> {
    let user = AuthService::login_user(&state.db, dto).await?;
    let cookies = SessionCookies::issue(&state, user.id.into_inner(), &user.email, user.role)?;

    Ok((
        cookies,
        Json(AuthResponse {
            message: "Login successful".to_string(),
            user,
        }),
    ))
}

/// Clear the session cookies
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    responses(
        (status = 200, description = "Session cookies cleared", body = MessageResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state))]
pub async fn logout_user(State(state): State<AppState>) -> (SessionCookies, Json<MessageResponse>) {
    (
        SessionCookies::cleared(&state),
        Json(MessageResponse {
            message: "Logged out successfully".to_string(),
        }),
    )
}

/// The identity behind the current session
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    responses(
        (status = 200, description = "Current user", body = MeResponse),
        (status = 401, description = "No valid session", body = ErrorResponse)
    ),
    tag = "Authentication",
    security(("cookie_auth" = []))
)]
#[instrument]
pub async fn get_me(user: AuthUser) -> Json<MeResponse> {
    Json(MeResponse { user })
}

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::SignedCookieJar;
use serde::Serialize;
use utoipa::ToSchema;

use shelfwise_auth::{Role, TokenError, create_access_token, verify_access_token, verify_refresh_token};
use shelfwise_core::AppError;
use shelfwise_models::{User, UserId};

use crate::middleware::cookies::{ACCESS_COOKIE, REFRESH_COOKIE, access_cookie};
use crate::modules::auth::service::AuthService;
use crate::state::AppState;

/// The caller resolved by [`require_session`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct AuthUser {
    pub id: UserId,
    pub email: String,
    pub role: Role,
}

impl From<User> for AuthUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            role: user.role,
        }
    }
}

/// Outcome of resolving the session cookies.
#[derive(Debug)]
pub enum Session {
    /// Valid access token for a user that still exists.
    Verified(AuthUser),
    /// Access token missing or rejected; a new one was minted from the refresh token.
    Refreshed {
        user: AuthUser,
        access_token: String,
    },
}

fn invalid_token(err: TokenError) -> AppError {
    tracing::debug!(error = %err, "Session token rejected");
    AppError::unauthorized("Unauthorized: invalid token".to_string())
}

/// Resolves the caller from the raw (already signature-checked) cookie values.
pub async fn resolve_session(
    state: &AppState,
    access: Option<&str>,
    refresh: Option<&str>,
) -> Result<Session, AppError> {
    if access.is_none() && refresh.is_none() {
        return Err(AppError::unauthorized(
            "Unauthorized: no token provided".to_string(),
        ));
    }

    if let Some(token) = access {
        match verify_access_token(token, &state.jwt_config) {
            Ok(claims) => {
                let user_id = claims
                    .user_id()
                    .ok_or_else(|| invalid_token(TokenError::Malformed))?;

                let user = AuthService::find_user_by_id(&state.db, UserId::from(user_id))
                    .await?
                    .ok_or_else(|| {
                        AppError::unauthorized("Unauthorized: user not found".to_string())
                    })?;

                return Ok(Session::Verified(user.into()));
            }
            Err(err) if refresh.is_none() => return Err(invalid_token(err)),
            Err(err) => {
                tracing::debug!(error = %err, "Access token rejected, trying refresh token");
            }
        }
    }

    let Some(token) = refresh else {
        return Err(AppError::unauthorized(
            "Unauthorized: no token provided".to_string(),
        ));
    };

    let claims = verify_refresh_token(token, &state.jwt_config).map_err(invalid_token)?;
    let user_id = claims
        .user_id()
        .ok_or_else(|| invalid_token(TokenError::Malformed))?;

    let access_token = create_access_token(user_id, &claims.email, claims.role, &state.jwt_config)?;

    Ok(Session::Refreshed {
        user: AuthUser {
            id: UserId::from(user_id),
            email: claims.email,
            role: claims.role,
        },
        access_token,
    })
}

/// Session middleware: attaches [`AuthUser`] to the request or rejects with 401.
///
/// When the caller is resolved from the refresh token, the response carries a
/// freshly signed `access` cookie.
pub async fn require_session(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let access_jar = SignedCookieJar::from_headers(req.headers(), state.cookie_keys.access.clone());
    let refresh_jar =
        SignedCookieJar::from_headers(req.headers(), state.cookie_keys.refresh.clone());

    let access = access_jar.get(ACCESS_COOKIE).map(|c| c.value().to_owned());
    let refresh = refresh_jar.get(REFRESH_COOKIE).map(|c| c.value().to_owned());

    match resolve_session(&state, access.as_deref(), refresh.as_deref()).await? {
        Session::Verified(user) => {
            req.extensions_mut().insert(user);
            Ok(next.run(req).await)
        }
        Session::Refreshed { user, access_token } => {
            tracing::debug!(user_id = %user.id, "Access cookie refreshed");
            req.extensions_mut().insert(user);
            let response = next.run(req).await;
            Ok((access_cookie(&state, access_token), response).into_response())
        }
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(|| AppError::unauthorized("Unauthorized".to_string()))
    }
}

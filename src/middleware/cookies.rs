use std::convert::Infallible;

use axum::response::{IntoResponseParts, ResponseParts};
use axum_extra::extract::cookie::{Cookie, Key, SameSite, SignedCookieJar};
use cookie::time::Duration;
use sha2::{Digest, Sha512};

use shelfwise_auth::{Role, create_access_token, create_refresh_token};
use shelfwise_config::JwtConfig;
use shelfwise_core::AppError;
use uuid::Uuid;

use crate::state::AppState;

pub const ACCESS_COOKIE: &str = "access";
pub const REFRESH_COOKIE: &str = "refresh";

/// Cookie signing keys, one per token kind.
#[derive(Clone)]
pub struct CookieKeys {
    pub access: Key,
    pub refresh: Key,
}

impl CookieKeys {
    pub fn from_config(config: &JwtConfig) -> Self {
        Self {
            access: derive_key(&config.access_secret),
            refresh: derive_key(&config.refresh_secret),
        }
    }
}

/// SHA-512 of the secret gives the 64 bytes `Key` needs.
fn derive_key(secret: &str) -> Key {
    Key::from(Sha512::digest(secret.as_bytes()).as_slice())
}

fn session_cookie(name: &'static str, value: String, max_age: i64, secure: bool) -> Cookie<'static> {
    Cookie::build((name, value))
        .http_only(true)
        .same_site(SameSite::Strict)
        .path("/")
        .secure(secure)
        .max_age(Duration::seconds(max_age))
        .build()
}

pub fn access_cookie(state: &AppState, token: String) -> SignedCookieJar {
    SignedCookieJar::new(state.cookie_keys.access.clone()).add(session_cookie(
        ACCESS_COOKIE,
        token,
        state.jwt_config.access_token_expiry,
        state.server_config.production,
    ))
}

pub fn refresh_cookie(state: &AppState, token: String) -> SignedCookieJar {
    SignedCookieJar::new(state.cookie_keys.refresh.clone()).add(session_cookie(
        REFRESH_COOKIE,
        token,
        state.jwt_config.refresh_token_expiry,
        state.server_config.production,
    ))
}

/// Both session cookies, ready to be returned as response parts.
pub struct SessionCookies {
    access: SignedCookieJar,
    refresh: SignedCookieJar,
}

impl SessionCookies {
    pub fn issue(
        state: &AppState,
        user_id: Uuid,
        email: &str,
        role: Role,
    ) -> Result<Self, AppError> {
        let access_token = create_access_token(user_id, email, role, &state.jwt_config)?;
        let refresh_token = create_refresh_token(user_id, email, role, &state.jwt_config)?;

        Ok(Self {
            access: access_cookie(state, access_token),
            refresh: refresh_cookie(state, refresh_token),
        })
    }

    /// Expired, empty cookies under both names.
    pub fn cleared(state: &AppState) -> Self {
        let removal = |name: &'static str| {
            let mut cookie = Cookie::build((name, ""))
                .http_only(true)
                .same_site(SameSite::Strict)
                .path("/")
                .build();
            cookie.make_removal();
            cookie
        };

        Self {
            access: SignedCookieJar::new(state.cookie_keys.access.clone())
                .add(removal(ACCESS_COOKIE)),
            refresh: SignedCookieJar::new(state.cookie_keys.refresh.clone())
                .add(removal(REFRESH_COOKIE)),
        }
    }
}

impl IntoResponseParts for SessionCookies {
    type Error = Infallible;

    fn into_response_parts(self, res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        let res = self.access.into_response_parts(res)?;
        self.refresh.into_response_parts(res)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_differ_per_secret() {
        let config = JwtConfig {
            access_secret: "access-secret".to_string(),
            refresh_secret: "refresh-secret".to_string(),
            access_token_expiry: 900,
            refresh_token_expiry: 604800,
        };
        let keys = CookieKeys::from_config(&config);
        assert_ne!(keys.access.signing(), keys.refresh.signing());
        assert_eq!(
            derive_key("access-secret").signing(),
            keys.access.signing()
        );
    }

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie(ACCESS_COOKIE, "token".to_string(), 900, true);
        assert_eq!(cookie.name(), "access");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(Duration::seconds(900)));
    }
}

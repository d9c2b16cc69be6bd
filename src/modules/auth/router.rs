use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::middleware::auth::require_session;
use crate::state::AppState;

use super::controller::{get_me, login_user, logout_user, register_user};

pub fn init_auth_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/register/{role}", post(register_user))
        .route("/login", post(login_user))
        .route("/logout", post(logout_user))
        .merge(
            Router::new()
                .route("/me", get(get_me))
                .route_layer(middleware::from_fn_with_state(state, require_session)),
        )
}

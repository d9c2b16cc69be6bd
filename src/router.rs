use axum::http::{HeaderValue, Method, header};
use axum::response::Redirect;
use axum::routing::get;
use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::metrics::metrics_middleware;
use crate::middleware::auth::require_session;
use crate::middleware::role::require_librarian;
use crate::modules::auth::init_auth_router;
use crate::modules::books::init_books_router;
use crate::modules::borrow::init_borrow_router;
use crate::state::AppState;

fn cors_layer(state: &AppState) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = state
        .cors_config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::COOKIE])
        .allow_credentials(true)
}

/// Route layers run bottom-up: the session is resolved before the role gate
/// looks at it.
pub fn init_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { Redirect::temporary("/swagger-ui") }))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .nest(
            "/api/v1",
            Router::new()
                .nest("/auth", init_auth_router(state.clone()))
                .nest(
                    "/books",
                    init_books_router()
                        .route_layer(middleware::from_fn(require_librarian))
                        .route_layer(middleware::from_fn_with_state(
                            state.clone(),
                            require_session,
                        )),
                )
                .nest(
                    "/borrow",
                    init_borrow_router()
                        .route_layer(middleware::from_fn(require_librarian))
                        .route_layer(middleware::from_fn_with_state(
                            state.clone(),
                            require_session,
                        )),
                ),
        )
        .with_state(state.clone())
        .layer(cors_layer(&state))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
}

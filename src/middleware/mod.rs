//! Request middleware and extractors.
//!
//! - [`cookies`]: signed `access`/`refresh` session cookies
//! - [`auth`]: session resolution (`require_session`) and the [`auth::AuthUser`] extractor
//! - [`role`]: the role gate (`require_librarian`)
//!
//! # Session flow
//!
//! 1. `require_session` reads the signed cookies and resolves the caller,
//!    minting a fresh access cookie from the refresh token when needed
//! 2. `require_librarian` checks the caller's role against the request method
//! 3. Handlers read the caller with the `AuthUser` extractor
//!
//! Routers apply the role gate first and the session layer second, so the
//! session layer runs outermost.
//!
//! ```ignore
//! Router::new()
//!     .route("/list", get(list_books))
//!     .route_layer(middleware::from_fn(require_librarian))
//!     .route_layer(middleware::from_fn_with_state(state.clone(), require_session));
//! ```

pub mod auth;
pub mod cookies;
pub mod role;

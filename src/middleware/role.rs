//! Role gate.
//!
//! Access is decided from three inputs: the role a route group requires, the
//! caller's role, and whether the request only reads. Librarians pass every
//! librarian route; students pass librarian routes only for reads.

use axum::{
    extract::Request,
    http::Method,
    middleware::Next,
    response::{IntoResponse, Response},
};

use shelfwise_auth::Role;
use shelfwise_core::AppError;

use crate::middleware::auth::AuthUser;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Read,
    Write,
}

impl RequestKind {
    pub fn of(method: &Method) -> Self {
        if method == Method::GET || method == Method::HEAD {
            RequestKind::Read
        } else {
            RequestKind::Write
        }
    }
}

pub fn is_allowed(required: Role, actual: Role, kind: RequestKind) -> bool {
    match (actual, kind) {
        _ if actual == required => true,
        (Role::Student, RequestKind::Read) => true,
        (Role::Student, RequestKind::Write) | (Role::Librarian, _) => false,
    }
}

/// Checks the session's [`AuthUser`] against `required`.
///
/// Must run inside `require_session`; a request without a resolved user is
/// rejected with 401.
pub async fn require_role(req: Request, next: Next, required: Role) -> Result<Response, AppError> {
    let user = req
        .extensions()
        .get::<AuthUser>()
        .ok_or_else(|| AppError::unauthorized("Unauthorized".to_string()))?;

    let kind = RequestKind::of(req.method());
    if !is_allowed(required, user.role, kind) {
        tracing::debug!(
            user_id = %user.id,
            role = %user.role,
            required = %required,
            method = %req.method(),
            "Role gate denied request"
        );
        return Err(AppError::forbidden(
            "Forbidden: insufficient permissions".to_string(),
        ));
    }

    Ok(next.run(req).await)
}

pub async fn require_librarian(req: Request, next: Next) -> Response {
    match require_role(req, next, Role::Librarian).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_kind_of_method() {
        assert_eq!(RequestKind::of(&Method::GET), RequestKind::Read);
        assert_eq!(RequestKind::of(&Method::HEAD), RequestKind::Read);
        assert_eq!(RequestKind::of(&Method::POST), RequestKind::Write);
        assert_eq!(RequestKind::of(&Method::PUT), RequestKind::Write);
        assert_eq!(RequestKind::of(&Method::DELETE), RequestKind::Write);
    }

    #[test]
    fn test_librarian_passes_librarian_routes() {
        assert!(is_allowed(Role::Librarian, Role::Librarian, RequestKind::Read));
        assert!(is_allowed(Role::Librarian, Role::Librarian, RequestKind::Write));
    }

    #[test]
    fn test_student_reads_only() {
        assert!(is_allowed(Role::Librarian, Role::Student, RequestKind::Read));
        assert!(!is_allowed(Role::Librarian, Role::Student, RequestKind::Write));
    }

    #[test]
    fn test_student_routes() {
        assert!(is_allowed(Role::Student, Role::Student, RequestKind::Write));
        assert!(!is_allowed(Role::Student, Role::Librarian, RequestKind::Write));
        assert!(!is_allowed(Role::Student, Role::Librarian, RequestKind::Read));
    }
}

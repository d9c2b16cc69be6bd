use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use shelfwise_core::{ErrorResponse, FieldIssue};
use shelfwise_models::{
    AuthResponse, Book, BookEnvelope, BookListResponse, BookResponse, BorrowRequest,
    CreateBookRequest, ExtendLoanRequest, Loan, LoanResponse, LoginRequest, MessageResponse,
    RegisterRequest, ReturnLoanRequest, Role, UpdateBookRequest, User,
};

use crate::middleware::auth::AuthUser;
use crate::middleware::cookies::ACCESS_COOKIE;
use crate::modules::auth::controller::MeResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::register_user,
        crate::modules::auth::controller::login_user,
        crate::modules::auth::controller::logout_user,
        crate::modules::auth::controller::get_me,
        crate::modules::books::controller::create_book,
        crate::modules::books::controller::update_book,
        crate::modules::books::controller::delete_book,
        crate::modules::books::controller::get_book,
        crate::modules::books::controller::list_books,
        crate::modules::borrow::controller::borrow_book,
        crate::modules::borrow::controller::extend_loan,
        crate::modules::borrow::controller::return_book,
    ),
    components(
        schemas(
            User,
            Role,
            AuthUser,
            RegisterRequest,
            LoginRequest,
            AuthResponse,
            MessageResponse,
            MeResponse,
            Book,
            CreateBookRequest,
            UpdateBookRequest,
            BookResponse,
            BookEnvelope,
            BookListResponse,
            Loan,
            BorrowRequest,
            ExtendLoanRequest,
            ReturnLoanRequest,
            LoanResponse,
            ErrorResponse,
            FieldIssue,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, login and session cookies"),
        (name = "Books", description = "Catalog management"),
        (name = "Borrowing", description = "Loans: borrow, extend and return")
    ),
    info(
        title = "Shelfwise API",
        version = "0.1.0",
        description = "Library management REST API built with Rust, Axum, and PostgreSQL. Sessions are carried in signed, httpOnly cookies.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "cookie_auth",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(ACCESS_COOKIE))),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        for expected in [
            "/api/v1/auth/register/{role}",
            "/api/v1/auth/login",
            "/api/v1/books/create",
            "/api/v1/books/list",
            "/api/v1/borrow",
            "/api/v1/borrow/extend",
            "/api/v1/borrow/return",
        ] {
            assert!(
                paths.iter().any(|p| p.as_str() == expected),
                "missing {expected}"
            );
        }
    }

    #[test]
    fn test_cookie_security_scheme_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("cookie_auth"));
    }
}

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, header};
use chrono::{DateTime, Duration, Utc};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use shelfwise::router::init_router;
use shelfwise::shelfwise_config::{CorsConfig, EmailConfig, JwtConfig, ServerConfig};
use shelfwise::shelfwise_core::hash_password;
use shelfwise::shelfwise_models::{BookId, LoanId, Role, UserId};
use shelfwise::state::AppState;
use shelfwise::utils::email::RecordingMailer;

pub const TEST_PASSWORD: &str = "secret123";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub mailer: Arc<RecordingMailer>,
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }
}

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        access_secret: "test-access-secret-at-least-32-characters".to_string(),
        refresh_secret: "test-refresh-secret-at-least-32-characters".to_string(),
        access_token_expiry: 900,
        refresh_token_expiry: 604800,
    }
}

pub fn test_state(pool: PgPool, mailer: Arc<RecordingMailer>) -> AppState {
    AppState::new(
        pool,
        test_jwt_config(),
        EmailConfig {
            enabled: false,
            smtp_host: "localhost".to_string(),
            smtp_port: 1025,
            smtp_username: String::new(),
            smtp_password: String::new(),
            from_email: "noreply@library.test".to_string(),
            from_name: "Test Library".to_string(),
        },
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
            production: false,
            metrics_enabled: false,
            metrics_port: 9090,
        },
        CorsConfig {
            allowed_origins: vec!["http://localhost:5173".to_string()],
        },
        mailer,
    )
}

pub fn setup_test_app(pool: PgPool) -> TestApp {
    let mailer = Arc::new(RecordingMailer::new());
    let state = test_state(pool, mailer.clone());

    TestApp {
        router: init_router(state.clone()),
        state,
        mailer,
    }
}

pub struct TestUser {
    pub id: UserId,
    pub email: String,
    pub password: String,
    pub role: Role,
}

pub struct TestBook {
    pub id: BookId,
    pub title: String,
    pub isbn: String,
}

pub fn generate_unique_email() -> String {
    format!("test-{}@test.com", Uuid::new_v4())
}

/// A 13-character numeric ISBN that will not collide across tests.
pub fn generate_unique_isbn() -> String {
    format!("{:013}", Uuid::new_v4().as_u128() % 10_u128.pow(13))
}

pub async fn create_test_user(pool: &PgPool, role: Role) -> TestUser {
    let email = generate_unique_email();
    let hashed = hash_password(TEST_PASSWORD).unwrap();

    let id = sqlx::query_scalar::<_, UserId>(
        "INSERT INTO users (username, email, password, role) VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind("test-user")
    .bind(&email)
    .bind(hashed)
    .bind(role)
    .fetch_one(pool)
    .await
    .unwrap();

    TestUser {
        id,
        email,
        password: TEST_PASSWORD.to_string(),
        role,
    }
}

pub async fn create_test_book(pool: &PgPool, title: &str) -> TestBook {
    let isbn = generate_unique_isbn();

    let id = sqlx::query_scalar::<_, BookId>(
        "INSERT INTO books (title, author, year, isbn) VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(title)
    .bind("Test Author")
    .bind(1965)
    .bind(&isbn)
    .fetch_one(pool)
    .await
    .unwrap();

    TestBook {
        id,
        title: title.to_string(),
        isbn,
    }
}

/// Inserts an active loan directly and marks the book unavailable.
pub async fn create_test_loan(
    pool: &PgPool,
    user_id: UserId,
    book_id: BookId,
    due_date: DateTime<Utc>,
) -> LoanId {
    sqlx::query("UPDATE books SET available = FALSE WHERE id = $1")
        .bind(book_id)
        .execute(pool)
        .await
        .unwrap();

    sqlx::query_scalar::<_, LoanId>(
        "INSERT INTO borrowed_books (user_id, book_id, due_date) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(user_id)
    .bind(book_id)
    .bind(due_date)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn is_book_available(pool: &PgPool, book_id: BookId) -> bool {
    sqlx::query_scalar::<_, bool>("SELECT available FROM books WHERE id = $1")
        .bind(book_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn count_active_loans(pool: &PgPool, user_id: UserId) -> i64 {
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM borrowed_books WHERE user_id = $1 AND returned = FALSE",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub fn future_date(days: i64) -> String {
    (Utc::now() + Duration::days(days)).format("%Y-%m-%d").to_string()
}

/// `name=value` pairs of every `Set-Cookie` header, in order.
pub fn set_cookies(response: &Response<Body>) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| value.split(';').next())
        .map(|pair| pair.trim().to_string())
        .collect()
}

pub fn set_cookie_named(response: &Response<Body>, name: &str) -> Option<String> {
    let prefix = format!("{}=", name);
    set_cookies(response)
        .into_iter()
        .find(|pair| pair.starts_with(&prefix))
}

/// Joins `Set-Cookie` pairs into a `Cookie` request header.
pub fn cookie_header(response: &Response<Body>) -> String {
    set_cookies(response).join("; ")
}

pub async fn body_json(response: Response<Body>) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

pub fn json_request(method: &str, uri: &str, cookie: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

pub fn get_request(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn delete_request(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("DELETE").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

/// Logs in through the API and returns the session `Cookie` header.
pub async fn login(app: &TestApp, user: &TestUser) -> String {
    let response = app
        .send(json_request(
            "POST",
            "/api/v1/auth/login",
            None,
            json!({ "email": user.email, "password": user.password }),
        ))
        .await;
    assert_eq!(response.status(), axum::http::StatusCode::OK);
    cookie_header(&response)
}

pub async fn login_as(app: &TestApp, pool: &PgPool, role: Role) -> (TestUser, String) {
    let user = create_test_user(pool, role).await;
    let cookie = login(app, &user).await;
    (user, cookie)
}

//! Application error type with HTTP response conversion.
//!
//! Every handler returns `Result<_, AppError>`. The error carries the HTTP
//! status to answer with, the underlying cause (as an [`anyhow::Error`]) and an
//! optional list of per-field issues for validation failures.
//!
//! Server errors (5xx) never leak their cause to the caller: the cause is
//! logged and the body carries a fixed `"Internal Server Error"` message.

use anyhow::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use utoipa::ToSchema;
use validator::{ValidationErrors, ValidationErrorsKind};

/// A single problem with one input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldIssue {
    pub field: String,
    pub message: String,
}

impl FieldIssue {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// JSON body of every error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldIssue>>,
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub error: Error,
    pub details: Vec<FieldIssue>,
}

impl AppError {
    pub fn new<E>(status: StatusCode, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status,
            error: err.into(),
            details: Vec::new(),
        }
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    pub fn internal_error(message: String) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, anyhow::anyhow!(message))
    }

    pub fn database<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    pub fn not_found<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::NOT_FOUND, err)
    }

    pub fn bad_request<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::BAD_REQUEST, err)
    }

    pub fn unprocessable<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, err)
    }

    pub fn conflict(message: String) -> Self {
        Self::new(StatusCode::CONFLICT, anyhow::anyhow!(message))
    }

    pub fn unauthorized(message: String) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, anyhow::anyhow!(message))
    }

    pub fn forbidden(message: String) -> Self {
        Self::new(StatusCode::FORBIDDEN, anyhow::anyhow!(message))
    }

    /// 422 with one entry per failing field.
    pub fn validation(details: Vec<FieldIssue>) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            error: anyhow::anyhow!("Validation failed"),
            details,
        }
    }

    pub fn from_validation_errors(errors: &ValidationErrors) -> Self {
        Self::validation(field_issues(errors))
    }

    /// The message shown to the caller.
    pub fn public_message(&self) -> String {
        if self.status.is_server_error() {
            "Internal Server Error".to_string()
        } else {
            self.error.to_string()
        }
    }
}

/// Flattens `validator` errors into `field -> message` pairs, nested structs
/// reported as `parent.child`.
pub fn field_issues(errors: &ValidationErrors) -> Vec<FieldIssue> {
    let mut issues = Vec::new();
    collect_issues(errors, None, &mut issues);
    issues.sort_by(|a, b| a.field.cmp(&b.field));
    issues
}

fn collect_issues(errors: &ValidationErrors, prefix: Option<&str>, out: &mut Vec<FieldIssue>) {
    for (field, kind) in errors.errors() {
        let path = match prefix {
            Some(p) => format!("{}.{}", p, field),
            None => field.to_string(),
        };

        match kind {
            ValidationErrorsKind::Field(errs) => {
                for err in errs {
                    let message = err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{} is invalid", path));
                    out.push(FieldIssue::new(path.clone(), message));
                }
            }
            ValidationErrorsKind::Struct(inner) => collect_issues(inner, Some(&path), out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_issues(inner, Some(&format!("{}[{}]", path, index)), out);
                }
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status.as_u16(), error = ?self.error, "Request failed");
        }

        let body = ErrorResponse {
            message: self.public_message(),
            details: (!self.details.is_empty()).then_some(self.details),
        };

        (self.status, Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<Error>,
{
    fn from(err: E) -> Self {
        AppError::internal(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use serde::Deserialize;
    use validator::Validate;

    async fn body_json(error: AppError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_not_found_renders_message() {
        let (status, body) = body_json(AppError::not_found(anyhow::anyhow!("Book not found"))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Book not found");
        assert!(body.get("details").is_none());
    }

    #[tokio::test]
    async fn test_internal_error_hides_cause() {
        let (status, body) =
            body_json(AppError::internal_error("connection refused".to_string())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Internal Server Error");
    }

    #[tokio::test]
    async fn test_validation_error_lists_details() {
        let error = AppError::validation(vec![FieldIssue::new("isbn", "ISBN too short")]);
        let (status, body) = body_json(error).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["message"], "Validation failed");
        assert_eq!(body["details"][0]["field"], "isbn");
        assert_eq!(body["details"][0]["message"], "ISBN too short");
    }

    #[test]
    fn test_foreign_errors_become_internal() {
        let parse_err = "abc".parse::<i32>().unwrap_err();
        let error: AppError = parse_err.into();
        assert_eq!(error.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_status_constructors() {
        assert_eq!(
            AppError::unauthorized("no".to_string()).status,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AppError::forbidden("no".to_string()).status, StatusCode::FORBIDDEN);
        assert_eq!(AppError::conflict("dup".to_string()).status, StatusCode::CONFLICT);
        assert_eq!(
            AppError::bad_request(anyhow::anyhow!("bad")).status,
            StatusCode::BAD_REQUEST
        );
    }

    #[derive(Debug, Deserialize, Validate)]
    struct Sample {
        #[validate(length(min = 1, message = "Title is required"))]
        title: String,
        #[validate(range(min = 1900))]
        year: i32,
    }

    #[test]
    fn test_field_issues_use_custom_or_default_message() {
        let sample = Sample {
            title: String::new(),
            year: 1800,
        };
        let errors = sample.validate().unwrap_err();
        let issues = field_issues(&errors);

        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0], FieldIssue::new("title", "Title is required"));
        assert_eq!(issues[1], FieldIssue::new("year", "year is invalid"));
    }
}

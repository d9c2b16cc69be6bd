use anyhow::anyhow;
use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
    http::StatusCode,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use shelfwise_core::{AppError, FieldIssue};

const DATA_ERROR_PREFIX: &str = "Failed to deserialize the JSON body into the target type: ";

/// Turns a serde data error (as rendered by axum) into a field issue.
///
/// `missing field `title` at line 1 column 9` becomes `title: title is required`;
/// `book_id: UUID parsing failed ... at line 1 column 20` becomes
/// `book_id: UUID parsing failed ...`.
fn json_data_issue(body_text: &str) -> FieldIssue {
    let text = body_text
        .strip_prefix(DATA_ERROR_PREFIX)
        .unwrap_or(body_text);
    let text = text
        .rsplit_once(" at line ")
        .map(|(head, _)| head)
        .unwrap_or(text);

    if let Some(field) = text
        .split("missing field `")
        .nth(1)
        .and_then(|s| s.split('`').next())
    {
        return FieldIssue::new(field, format!("{} is required", field));
    }

    match text.split_once(": ") {
        Some((path, message)) if !path.contains(' ') => FieldIssue::new(path, message),
        _ => FieldIssue::new("body", text),
    }
}

/// JSON body extractor that also runs `validator` rules.
///
/// Unparseable JSON is a 400; JSON of the wrong shape and rule violations are
/// a 422 listing each failing field.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| match rejection {
                JsonRejection::JsonDataError(err) => {
                    AppError::validation(vec![json_data_issue(&err.body_text())])
                }
                JsonRejection::MissingJsonContentType(_) => AppError::new(
                    StatusCode::BAD_REQUEST,
                    anyhow!("Missing 'Content-Type: application/json' header"),
                ),
                JsonRejection::JsonSyntaxError(_) => {
                    AppError::new(StatusCode::BAD_REQUEST, anyhow!("Malformed JSON body"))
                }
                _ => AppError::new(StatusCode::BAD_REQUEST, anyhow!("Invalid request body")),
            })?;

        value
            .validate()
            .map_err(|errors| AppError::from_validation_errors(&errors))?;

        Ok(ValidatedJson(value))
    }
}

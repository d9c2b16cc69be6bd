use axum::{
    Json,
    extract::{FromRequestParts, Path, State},
    http::{StatusCode, request::Parts},
};
use tracing::instrument;

use shelfwise_core::{AppError, ErrorResponse};
use shelfwise_models::{
    BookEnvelope, BookId, BookListResponse, BookResponse, CreateBookRequest, UpdateBookRequest,
};

use super::service::BookService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// `{id}` path segment; anything that is not a UUID is a JSON 400.
#[derive(Debug, Clone, Copy)]
pub struct BookPath(pub BookId);

impl<S> FromRequestParts<S> for BookPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Path::<BookId>::from_request_parts(parts, state)
            .await
            .map(|Path(id)| BookPath(id))
            .map_err(|_| AppError::bad_request(anyhow::anyhow!("Invalid book id")))
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/books/create",
    request_body = CreateBookRequest,
    responses(
        (status = 201, description = "Book created", body = BookResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Librarians only", body = ErrorResponse),
        (status = 409, description = "ISBN already exists", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Books",
    security(("cookie_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_book(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateBookRequest>,
) -> Result<(StatusCode, Json<BookResponse>), AppError> {
    let book = BookService::create_book(&state.db, dto).await?;

    Ok((
        StatusCode::CREATED,
        Json(BookResponse {
            message: "Book created successfully".to_string(),
            book,
        }),
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/books/update/{id}",
    params(
        ("id" = BookId, Path, description = "Book ID")
    ),
    request_body = UpdateBookRequest,
    responses(
        (status = 200, description = "Book updated", body = BookResponse),
        (status = 403, description = "Librarians only", body = ErrorResponse),
        (status = 400, description = "Invalid book id", body = ErrorResponse),
        (status = 404, description = "Book not found", body = ErrorResponse),
        (status = 409, description = "ISBN belongs to another book", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Books",
    security(("cookie_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_book(
    State(state): State<AppState>,
    BookPath(id): BookPath,
    ValidatedJson(dto): ValidatedJson<UpdateBookRequest>,
) -> Result<Json<BookResponse>, AppError> {
    let book = BookService::update_book(&state.db, id, dto).await?;

    Ok(Json(BookResponse {
        message: "Book updated successfully".to_string(),
        book,
    }))
}

#[utoipa::path(
    delete,
    path = "/api/v1/books/delete/{id}",
    params(
        ("id" = BookId, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book deleted", body = BookResponse),
        (status = 403, description = "Librarians only", body = ErrorResponse),
        (status = 400, description = "Invalid book id", body = ErrorResponse),
        (status = 404, description = "Book not found", body = ErrorResponse)
    ),
    tag = "Books",
    security(("cookie_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_book(
    State(state): State<AppState>,
    BookPath(id): BookPath,
) -> Result<Json<BookResponse>, AppError> {
    let book = BookService::delete_book(&state.db, id).await?;

    Ok(Json(BookResponse {
        message: "Book deleted successfully".to_string(),
        book,
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/books/get/{id}",
    params(
        ("id" = BookId, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book details", body = BookEnvelope),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 400, description = "Invalid book id", body = ErrorResponse),
        (status = 404, description = "Book not found", body = ErrorResponse)
    ),
    tag = "Books",
    security(("cookie_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_book(
    State(state): State<AppState>,
    BookPath(id): BookPath,
) -> Result<Json<BookEnvelope>, AppError> {
    let book = BookService::get_book(&state.db, id).await?;
    Ok(Json(BookEnvelope { book }))
}

#[utoipa::path(
    get,
    path = "/api/v1/books/list",
    responses(
        (status = 200, description = "All books ordered by title", body = BookListResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Books",
    security(("cookie_auth" = []))
)]
#[instrument(skip(state))]
pub async fn list_books(State(state): State<AppState>) -> Result<Json<BookListResponse>, AppError> {
    let books = BookService::list_books(&state.db).await?;
    Ok(Json(BookListResponse { books }))
}

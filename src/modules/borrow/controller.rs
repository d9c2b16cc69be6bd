use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;

use shelfwise_core::{AppError, ErrorResponse};
use shelfwise_models::{BorrowRequest, ExtendLoanRequest, LoanResponse, ReturnLoanRequest};

use super::service::LoanService;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::utils::email::OutgoingEmail;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/v1/borrow",
    request_body = BorrowRequest,
    responses(
        (status = 201, description = "Book borrowed", body = LoanResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Librarians only, or borrower already holds 3 books", body = ErrorResponse),
        (status = 404, description = "Book not available or not found, or unknown borrower", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Borrowing",
    security(("cookie_auth" = []))
)]
#[instrument(skip(state))]
pub async fn borrow_book(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<BorrowRequest>,
) -> Result<(StatusCode, Json<LoanResponse>), AppError> {
    let borrower = dto.user_id.unwrap_or(auth_user.id);
    let receipt = LoanService::borrow_book(&state.db, borrower, dto.book_id, dto.return_date).await?;

    let email = OutgoingEmail::borrow_confirmation(
        &receipt.borrower_email,
        &receipt.book_title,
        dto.return_date,
    );
    if let Err(err) = state.mailer.send(email).await {
        tracing::warn!(error = ?err.error, loan_id = %receipt.loan.id, "Borrow confirmation email failed");
    }

    Ok((
        StatusCode::CREATED,
        Json(LoanResponse {
            message: "Book borrowed successfully".to_string(),
            borrow: receipt.loan,
        }),
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/borrow/extend",
    request_body = ExtendLoanRequest,
    responses(
        (status = 200, description = "Due date moved", body = LoanResponse),
        (status = 403, description = "Librarians only", body = ErrorResponse),
        (status = 404, description = "No active loan with that id", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Borrowing",
    security(("cookie_auth" = []))
)]
#[instrument(skip(state))]
pub async fn extend_loan(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<ExtendLoanRequest>,
) -> Result<Json<LoanResponse>, AppError> {
    let loan = LoanService::extend_loan(&state.db, dto).await?;

    Ok(Json(LoanResponse {
        message: "Borrow period extended successfully".to_string(),
        borrow: loan,
    }))
}

#[utoipa::path(
    put,
    path = "/api/v1/borrow/return",
    request_body = ReturnLoanRequest,
    responses(
        (status = 200, description = "Loan closed and book available again", body = LoanResponse),
        (status = 403, description = "Librarians only", body = ErrorResponse),
        (status = 404, description = "No active loan for that book and user", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Borrowing",
    security(("cookie_auth" = []))
)]
#[instrument(skip(state))]
pub async fn return_book(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<ReturnLoanRequest>,
) -> Result<Json<LoanResponse>, AppError> {
    let loan = LoanService::return_book(&state.db, dto).await?;

    Ok(Json(LoanResponse {
        message: "Book return processed successfully".to_string(),
        borrow: loan,
    }))
}

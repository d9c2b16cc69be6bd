//! Borrowed-book records and the borrowing DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::{BookId, LoanId, UserId};
use shelfwise_core::serde::deserialize_flexible_datetime;

/// Most unreturned loans a single user may hold at once.
pub const MAX_ACTIVE_LOANS: i64 = 3;

/// A borrowed-book record. `due_date` is cleared once the book is returned.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct Loan {
    pub id: LoanId,
    pub user_id: UserId,
    pub book_id: BookId,
    pub borrowed_at: DateTime<Utc>,
    pub due_date: Option<DateTime<Utc>>,
    pub returned: bool,
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct BorrowRequest {
    pub book_id: BookId,
    /// Borrower; defaults to the signed-in user.
    #[serde(default)]
    pub user_id: Option<UserId>,
    /// RFC 3339 timestamp or `YYYY-MM-DD`.
    #[serde(deserialize_with = "deserialize_flexible_datetime")]
    #[schema(example = "2030-01-31")]
    pub return_date: DateTime<Utc>,
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct ExtendLoanRequest {
    pub borrow_id: LoanId,
    #[serde(deserialize_with = "deserialize_flexible_datetime")]
    #[schema(example = "2030-02-14")]
    pub new_return_date: DateTime<Utc>,
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct ReturnLoanRequest {
    pub book_id: BookId,
    pub user_id: UserId,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct LoanResponse {
    pub message: String,
    pub borrow: Loan,
}

/// One overdue loan joined with its borrower and book.
#[derive(FromRow, Debug, Clone)]
pub struct OverdueLoanRow {
    pub user_id: UserId,
    pub email: String,
    pub username: String,
    pub title: String,
    pub due_date: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_borrow_request_user_is_optional() {
        let json = r#"{"book_id":"6f1c1c1e-0f2a-4b8e-9d7a-0a0b0c0d0e0f","return_date":"2030-01-31"}"#;
        let request: BorrowRequest = serde_json::from_str(json).unwrap();
        assert!(request.user_id.is_none());
        assert_eq!(
            request.return_date,
            Utc.with_ymd_and_hms(2030, 1, 31, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_borrow_request_rejects_bad_date() {
        let json = r#"{"book_id":"6f1c1c1e-0f2a-4b8e-9d7a-0a0b0c0d0e0f","return_date":"whenever"}"#;
        assert!(serde_json::from_str::<BorrowRequest>(json).is_err());
    }

    #[test]
    fn test_extend_request_accepts_rfc3339() {
        let json = r#"{"borrow_id":"6f1c1c1e-0f2a-4b8e-9d7a-0a0b0c0d0e0f","new_return_date":"2030-02-14T09:00:00Z"}"#;
        let request: ExtendLoanRequest = serde_json::from_str(json).unwrap();
        assert_eq!(
            request.new_return_date,
            Utc.with_ymd_and_hms(2030, 2, 14, 9, 0, 0).unwrap()
        );
    }
}

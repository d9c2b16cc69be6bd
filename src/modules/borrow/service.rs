//! Borrow, extend and return.
//!
//! A book's `available` flag is false exactly while it has an active
//! (unreturned) loan. Borrow and return change the flag and the loan in one
//! transaction, and the borrow side flips the flag with a conditional update so
//! two concurrent borrows of the same book cannot both succeed.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use shelfwise_core::AppError;
use shelfwise_models::{
    Book, BookId, ExtendLoanRequest, Loan, MAX_ACTIVE_LOANS, ReturnLoanRequest, UserId,
};

use crate::metrics;

const LOAN_COLUMNS: &str = "id, user_id, book_id, borrowed_at, due_date, returned";

fn loan_not_found() -> AppError {
    AppError::not_found(anyhow::anyhow!("Borrow record not found or update failed"))
}

fn book_unavailable() -> AppError {
    AppError::not_found(anyhow::anyhow!("Book not available or not found"))
}

/// A committed borrow plus what the confirmation email needs.
#[derive(Debug, Clone)]
pub struct BorrowReceipt {
    pub loan: Loan,
    pub borrower_email: String,
    pub book_title: String,
}

pub struct LoanService;

impl LoanService {
    /// Opens a loan for `user_id` and marks the book unavailable, in one
    /// transaction.
    ///
    /// # Arguments
    ///
    /// * `db` - Database pool
    /// * `user_id` - The borrower, either the caller or a user chosen by a librarian
    /// * `book_id` - The book to lend
    /// * `due_date` - When the book is due back; already checked to be in the future
    ///
    /// # Returns
    ///
    /// The new loan together with the borrower's email and the book title, so
    /// the caller can send a confirmation without another query.
    ///
    /// # Errors
    ///
    /// * `404 Not Found` if the borrower does not exist
    /// * `403 Forbidden` if the borrower already holds the maximum number of loans
    /// * `404 Not Found` if the book is missing or already lent out
    #[instrument(skip(db))]
    pub async fn borrow_book(
        db: &PgPool,
        user_id: UserId,
        book_id: BookId,
        due_date: DateTime<Utc>,
    ) -> Result<BorrowReceipt, AppError> {
        let mut tx = db.begin().await?;

        // Locking the borrower serializes concurrent borrows by the same user,
        // so the count below cannot go stale before the insert.
        let borrower_email = sqlx::query_scalar::<_, String>(
            "SELECT email FROM users WHERE id = $1 FOR UPDATE",
        )
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("User not found")))?;

        let active = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM borrowed_books WHERE user_id = $1 AND returned = FALSE",
        )
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        if active >= MAX_ACTIVE_LOANS {
            metrics::track_borrow_rejected("limit_reached");
            return Err(AppError::forbidden(format!(
                "You can only borrow a maximum of {} books at a time",
                MAX_ACTIVE_LOANS
            )));
        }

        let book = sqlx::query_as::<_, Book>(
            "UPDATE books SET available = FALSE
             WHERE id = $1 AND available = TRUE
             RETURNING id, title, author, year, isbn, available",
        )
        .bind(book_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| {
            metrics::track_borrow_rejected("unavailable");
            book_unavailable()
        })?;

        let loan = sqlx::query_as::<_, Loan>(&format!(
            "INSERT INTO borrowed_books (user_id, book_id, due_date)
             VALUES ($1, $2, $3)
             RETURNING {LOAN_COLUMNS}"
        ))
        .bind(user_id)
        .bind(book_id)
        .bind(due_date)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_unique_violation()
            {
                return book_unavailable();
            }
            AppError::from(e)
        })?;

        tx.commit().await?;

        metrics::track_borrow();
        tracing::info!(loan_id = %loan.id, "Book borrowed");

        Ok(BorrowReceipt {
            loan,
            borrower_email,
            book_title: book.title,
        })
    }

    /// Moves the due date of an active loan.
    ///
    /// # Errors
    ///
    /// Returns `404 Not Found` if the loan does not exist or was already returned.
    #[instrument(skip(db))]
    pub async fn extend_loan(db: &PgPool, dto: ExtendLoanRequest) -> Result<Loan, AppError> {
        let loan = sqlx::query_as::<_, Loan>(&format!(
            "UPDATE borrowed_books SET due_date = $2
             WHERE id = $1 AND returned = FALSE
             RETURNING {LOAN_COLUMNS}"
        ))
        .bind(dto.borrow_id)
        .bind(dto.new_return_date)
        .fetch_optional(db)
        .await?
        .ok_or_else(loan_not_found)?;

        tracing::info!(loan_id = %loan.id, "Loan extended");
        Ok(loan)
    }

    /// Closes the active loan of `dto.book_id` held by `dto.user_id` and makes
    /// the book available again.
    ///
    /// # Errors
    ///
    /// Returns `404 Not Found` if that user has no active loan of that book.
    #[instrument(skip(db))]
    pub async fn return_book(db: &PgPool, dto: ReturnLoanRequest) -> Result<Loan, AppError> {
        let mut tx = db.begin().await?;

        let loan = sqlx::query_as::<_, Loan>(&format!(
            "UPDATE borrowed_books SET returned = TRUE, due_date = NULL
             WHERE book_id = $1 AND user_id = $2 AND returned = FALSE
             RETURNING {LOAN_COLUMNS}"
        ))
        .bind(dto.book_id)
        .bind(dto.user_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(loan_not_found)?;

        sqlx::query("UPDATE books SET available = TRUE WHERE id = $1")
            .bind(dto.book_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        metrics::track_return();
        tracing::info!(loan_id = %loan.id, "Book returned");

        Ok(loan)
    }
}

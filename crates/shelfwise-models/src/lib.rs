//! # Shelfwise Models
//!
//! Domain entities and request/response DTOs.
//!
//! - [`ids`]: typed ids for users, books and loans
//! - [`users`]: user rows
//! - [`auth`]: registration and login payloads
//! - [`books`]: catalog rows and payloads
//! - [`loans`]: borrowed-book rows and borrowing payloads

pub mod auth;
pub mod books;
pub mod ids;
pub mod loans;
pub mod users;

pub use shelfwise_auth::Role;

pub use auth::{AuthResponse, LoginRequest, MessageResponse, RegisterRequest};
pub use books::{
    Book, BookEnvelope, BookListResponse, BookResponse, CreateBookRequest, UpdateBookRequest,
};
pub use ids::{BookId, LoanId, UserId};
pub use loans::{
    BorrowRequest, ExtendLoanRequest, Loan, LoanResponse, MAX_ACTIVE_LOANS, OverdueLoanRow,
    ReturnLoanRequest,
};
pub use users::{User, UserWithPassword};

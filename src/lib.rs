//! # Shelfwise API
//!
//! A library-management REST API built with Rust, Axum, and PostgreSQL.
//! Librarians manage the catalog and record loans; students browse the
//! catalog. A daily job emails borrowers whose loans are overdue.
//!
//! ## Architecture
//!
//! ```text
//! src/
//! ├── jobs/            # Overdue reminder job and its cron scheduler
//! ├── middleware/      # Session cookies, session resolution, role gate
//! ├── modules/         # Feature modules
//! │   ├── auth/        # Register, login, logout, me
//! │   ├── books/       # Catalog CRUD
//! │   └── borrow/      # Borrow, extend, return
//! └── utils/           # Outbound email
//! ```
//!
//! Each feature module has the same layout: `controller.rs` (handlers),
//! `service.rs` (queries and business rules) and `router.rs`. Entities and
//! DTOs live in the `shelfwise-models` crate.
//!
//! ## Sessions
//!
//! Login and registration set two signed, httpOnly cookies:
//!
//! - `access`: short-lived JWT (default 15 minutes)
//! - `refresh`: long-lived JWT (default 7 days)
//!
//! When the access token is missing or expired but the refresh token is
//! valid, the request goes through and the response carries a new `access`
//! cookie.
//!
//! ## Roles
//!
//! | Role | Books | Borrowing |
//! |------|-------|-----------|
//! | Librarian | full access | full access |
//! | Student | read only | read only |
//!
//! ## Loans
//!
//! A borrower holds at most three active loans. A book is unavailable exactly
//! while it has an active loan.
//!
//! ## API Documentation
//!
//! - Swagger UI: `http://localhost:3000/swagger-ui`
//! - Scalar: `http://localhost:3000/scalar`

pub mod docs;
pub mod jobs;
pub mod logging;
pub mod metrics;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;
pub mod utils;
pub mod validator;

// Re-export workspace crates for convenience
pub use shelfwise_auth;
pub use shelfwise_config;
pub use shelfwise_core;
pub use shelfwise_db;
pub use shelfwise_models;

//! # Shelfwise Core
//!
//! Core types, errors, and utilities for the Shelfwise API.
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`password`]: bcrypt password hashing and verification
//! - [`serde`]: Lenient date deserialization for request bodies
//!
//! # Example
//!
//! ```ignore
//! use shelfwise_core::errors::AppError;
//! use shelfwise_core::password::{hash_password, verify_password};
//!
//! let error = AppError::not_found(anyhow::anyhow!("Book not found"));
//! let hash = hash_password("secret1")?;
//! ```

pub mod errors;
pub mod password;
pub mod serde;

pub use errors::{AppError, ErrorResponse, FieldIssue};
pub use password::{hash_password, verify_password};

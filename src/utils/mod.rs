//! Shared utilities.
//!
//! - [`email`]: the `Mailer` abstraction and its SMTP/logging backends

pub mod email;

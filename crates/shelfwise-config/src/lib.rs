//! # Shelfwise Config
//!
//! Configuration structures loaded from environment variables:
//!
//! - [`jwt`]: token secrets and lifetimes
//! - [`cors`]: CORS allow-list
//! - [`email`]: SMTP settings
//! - [`server`]: listen address, environment mode and metrics exporter
//! - [`scheduler`]: overdue scan schedule
//!
//! # Example
//!
//! ```ignore
//! use shelfwise_config::{JwtConfig, ServerConfig};
//!
//! let jwt_config = JwtConfig::from_env();
//! let server_config = ServerConfig::from_env();
//! ```

pub mod cors;
pub mod email;
pub mod jwt;
pub mod scheduler;
pub mod server;

pub use cors::CorsConfig;
pub use email::EmailConfig;
pub use jwt::JwtConfig;
pub use scheduler::SchedulerConfig;
pub use server::ServerConfig;

/// Interprets `true`/`1`/`yes`/`on` (any case) as enabled.
pub(crate) fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::parse_flag;

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("true"));
        assert!(parse_flag("TRUE"));
        assert!(parse_flag(" 1 "));
        assert!(parse_flag("on"));
        assert!(!parse_flag("false"));
        assert!(!parse_flag("0"));
        assert!(!parse_flag(""));
    }
}

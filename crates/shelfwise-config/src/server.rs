use std::env;

use crate::parse_flag;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// `APP_ENV=production`; turns on the `Secure` cookie flag.
    pub production: bool,
    pub metrics_enabled: bool,
    pub metrics_port: u16,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(3000),
            production: env::var("APP_ENV")
                .map(|v| is_production(&v))
                .unwrap_or(false),
            metrics_enabled: env::var("METRICS_ENABLED")
                .map(|v| parse_flag(&v))
                .unwrap_or(false),
            metrics_port: env::var("METRICS_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(9090),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn is_production(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("production")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_production() {
        assert!(is_production("production"));
        assert!(is_production("PRODUCTION "));
        assert!(!is_production("development"));
        assert!(!is_production("prod"));
    }

    #[test]
    fn test_bind_address() {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            production: false,
            metrics_enabled: false,
            metrics_port: 9090,
        };
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
    }
}

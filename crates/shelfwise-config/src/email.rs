use std::env;

use crate::parse_flag;

#[derive(Clone, Debug)]
pub struct EmailConfig {
    pub enabled: bool,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: String,
    pub from_email: String,
    pub from_name: String,
}

impl EmailConfig {
    pub fn from_env() -> Self {
        Self {
            enabled: env::var("SMTP_ENABLED")
                .map(|v| parse_flag(&v))
                .unwrap_or(false),
            smtp_host: env::var("SMTP_HOST").unwrap_or_else(|_| "localhost".to_string()),
            smtp_port: env::var("SMTP_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1025),
            smtp_username: env::var("SMTP_USERNAME").unwrap_or_default(),
            smtp_password: env::var("SMTP_PASSWORD").unwrap_or_default(),
            from_email: env::var("FROM_EMAIL")
                .unwrap_or_else(|_| "noreply@shelfwise.dev".to_string()),
            from_name: env::var("FROM_NAME").unwrap_or_else(|_| "Shelfwise Library".to_string()),
        }
    }

    /// `"Name <address>"`, the form lettre expects for a mailbox.
    pub fn from_mailbox(&self) -> String {
        format!("{} <{}>", self.from_name, self.from_email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_mailbox() {
        let config = EmailConfig {
            enabled: false,
            smtp_host: "localhost".to_string(),
            smtp_port: 1025,
            smtp_username: String::new(),
            smtp_password: String::new(),
            from_email: "desk@library.test".to_string(),
            from_name: "Front Desk".to_string(),
        };
        assert_eq!(config.from_mailbox(), "Front Desk <desk@library.test>");
    }
}

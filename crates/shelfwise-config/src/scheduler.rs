use std::env;

use crate::parse_flag;

/// Every day at midnight UTC (`sec min hour day month weekday`).
pub const DEFAULT_OVERDUE_SCAN_CRON: &str = "0 0 0 * * *";

#[derive(Clone, Debug)]
pub struct SchedulerConfig {
    pub overdue_scan_enabled: bool,
    pub overdue_scan_cron: String,
}

impl SchedulerConfig {
    pub fn from_env() -> Self {
        Self {
            overdue_scan_enabled: env::var("OVERDUE_SCAN_ENABLED")
                .map(|v| parse_flag(&v))
                .unwrap_or(true),
            overdue_scan_cron: env::var("OVERDUE_SCAN_CRON")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_OVERDUE_SCAN_CRON.to_string()),
        }
    }
}

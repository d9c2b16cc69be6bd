//! Background jobs.
//!
//! - [`overdue`]: finds overdue loans and emails one reminder per borrower
//! - [`scheduler`]: runs the overdue scan on a cron schedule until shutdown

pub mod overdue;
pub mod scheduler;

pub use overdue::{OverdueNotifier, OverdueReport};
pub use scheduler::spawn_overdue_scheduler;

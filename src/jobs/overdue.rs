use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use shelfwise_core::AppError;
use shelfwise_models::{OverdueLoanRow, UserId};

use crate::metrics;
use crate::utils::email::{Mailer, OutgoingEmail};

/// Outcome of one overdue scan.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OverdueReport {
    /// Distinct borrowers holding at least one overdue loan.
    pub borrowers: usize,
    pub reminders_sent: usize,
    pub failures: usize,
}

/// Titles of one borrower's overdue books, earliest due first.
#[derive(Debug, PartialEq, Eq)]
struct Reminder {
    user_id: UserId,
    email: String,
    titles: Vec<String>,
}

/// Groups rows per borrower. Rows must arrive ordered by user, then due date.
fn group_by_borrower(rows: Vec<OverdueLoanRow>) -> Vec<Reminder> {
    let mut reminders: Vec<Reminder> = Vec::new();

    for row in rows {
        match reminders.last_mut() {
            Some(last) if last.user_id == row.user_id => last.titles.push(row.title),
            _ => reminders.push(Reminder {
                user_id: row.user_id,
                email: row.email,
                titles: vec![row.title],
            }),
        }
    }

    reminders
}

#[derive(Clone)]
pub struct OverdueNotifier {
    db: PgPool,
    mailer: Arc<dyn Mailer>,
}

impl OverdueNotifier {
    pub fn new(db: PgPool, mailer: Arc<dyn Mailer>) -> Self {
        Self { db, mailer }
    }

    /// Active loans whose due date is before `now`.
    pub async fn overdue_loans(&self, now: DateTime<Utc>) -> Result<Vec<OverdueLoanRow>, AppError> {
        let rows = sqlx::query_as::<_, OverdueLoanRow>(
            "SELECT u.id AS user_id, u.email, u.username, b.title, bb.due_date
             FROM borrowed_books bb
             JOIN users u ON u.id = bb.user_id
             JOIN books b ON b.id = bb.book_id
             WHERE bb.returned = FALSE AND bb.due_date IS NOT NULL AND bb.due_date < $1
             ORDER BY u.id, bb.due_date, b.title",
        )
        .bind(now)
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }

    /// Sends one reminder per borrower with overdue loans. A failed delivery
    /// is logged and counted; it does not stop the remaining reminders.
    #[instrument(skip(self))]
    pub async fn run(&self, now: DateTime<Utc>) -> Result<OverdueReport, AppError> {
        let reminders = group_by_borrower(self.overdue_loans(now).await?);
        let mut report = OverdueReport {
            borrowers: reminders.len(),
            ..OverdueReport::default()
        };

        for reminder in reminders {
            let email = OutgoingEmail::overdue_reminder(&reminder.email, &reminder.titles);
            match self.mailer.send(email).await {
                Ok(()) => {
                    report.reminders_sent += 1;
                    metrics::track_overdue_reminder(true);
                }
                Err(err) => {
                    report.failures += 1;
                    metrics::track_overdue_reminder(false);
                    tracing::warn!(
                        user_id = %reminder.user_id,
                        error = ?err.error,
                        "Overdue reminder failed"
                    );
                }
            }
        }

        tracing::info!(
            borrowers = report.borrowers,
            sent = report.reminders_sent,
            failed = report.failures,
            "Overdue scan finished"
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn row(user: UserId, email: &str, title: &str, day: u32) -> OverdueLoanRow {
        OverdueLoanRow {
            user_id: user,
            email: email.to_string(),
            username: "reader".to_string(),
            title: title.to_string(),
            due_date: Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_group_by_borrower_keeps_order() {
        let alice = UserId::new();
        let bob = UserId::new();

        let reminders = group_by_borrower(vec![
            row(alice, "alice@library.test", "Dune", 1),
            row(alice, "alice@library.test", "Emma", 3),
            row(bob, "bob@library.test", "Ulysses", 2),
        ]);

        assert_eq!(reminders.len(), 2);
        assert_eq!(reminders[0].email, "alice@library.test");
        assert_eq!(reminders[0].titles, vec!["Dune", "Emma"]);
        assert_eq!(reminders[1].titles, vec!["Ulysses"]);
    }

    #[test]
    fn test_group_by_borrower_empty() {
        assert!(group_by_borrower(Vec::new()).is_empty());
    }
}

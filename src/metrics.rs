//! Prometheus metrics.
//!
//! The `metrics` macros are no-ops until a recorder is installed, so the
//! helpers below can be called unconditionally. [`init_metrics`] installs the
//! recorder only when `METRICS_ENABLED` is set.

use std::time::{Duration, Instant};

use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
    routing::get,
};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};

use shelfwise_auth::Role;

/// Installs the Prometheus recorder and spawns its upkeep task.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".to_string()),
            &[
                0.001, 0.005, 0.01, 0.025, 0.05, 0.075, 0.1, 0.25, 0.5, 0.75, 1.0, 2.5, 5.0,
            ],
        )?
        .install_recorder()?;

    let upkeep_handle = handle.clone();
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(Duration::from_secs(5)).await;
            upkeep_handle.run_upkeep();
        }
    });

    Ok(handle)
}

pub async fn metrics_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().as_str().to_owned();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| req.uri().path().to_owned());

    gauge!("http_requests_active").increment(1.0);

    let response = next.run(req).await;

    let status = response.status().as_u16().to_string();
    counter!("http_requests_total", "method" => method.clone(), "path" => path.clone(), "status" => status)
        .increment(1);
    histogram!("http_request_duration_seconds", "method" => method, "path" => path)
        .record(start.elapsed().as_secs_f64());

    gauge!("http_requests_active").decrement(1.0);

    response
}

/// Router served on the separate metrics port.
pub fn metrics_app(handle: PrometheusHandle) -> Router {
    Router::new().route("/metrics", get(move || async move { handle.render() }))
}

pub fn track_user_registered(role: Role) {
    counter!("users_registered_total", "role" => role.as_str()).increment(1);
}

pub fn track_login_success(role: Role) {
    counter!("user_logins_total", "role" => role.as_str(), "status" => "success").increment(1);
}

pub fn track_login_failure(reason: &str) {
    counter!("user_logins_total", "role" => "unknown", "status" => "failure", "reason" => reason.to_string())
        .increment(1);
}

pub fn track_borrow() {
    counter!("loans_borrowed_total").increment(1);
}

pub fn track_borrow_rejected(reason: &'static str) {
    counter!("loans_rejected_total", "reason" => reason).increment(1);
}

pub fn track_return() {
    counter!("loans_returned_total").increment(1);
}

pub fn track_overdue_reminder(delivered: bool) {
    let status = if delivered { "sent" } else { "failed" };
    counter!("overdue_reminders_total", "status" => status).increment(1);
}

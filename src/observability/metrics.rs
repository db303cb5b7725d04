//! Prometheus counters for the three backends.
//!
//! Recording is always safe: without an installed recorder the `metrics`
//! macros are no-ops, so tests and the seed command never need `init`.

use std::fmt;
use std::net::SocketAddr;

/// Enum representing all metric names used in the system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    RecordsCreated,
    RecordsUpdated,
    RecordsDeleted,
    RequestsRejected,
    ShowsRejectedUnavailable,
    QuizDraws,
    QuizCategoryExhausted,
    AuthFailures,
    DirectoryCalls,
    DirectoryErrors,
}

impl MetricName {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::RecordsCreated => "fyyur_records_created_total",
            MetricName::RecordsUpdated => "fyyur_records_updated_total",
            MetricName::RecordsDeleted => "fyyur_records_deleted_total",
            MetricName::RequestsRejected => "fyyur_requests_rejected_total",
            MetricName::ShowsRejectedUnavailable => "fyyur_shows_rejected_unavailable_total",
            MetricName::QuizDraws => "fyyur_quiz_draws_total",
            MetricName::QuizCategoryExhausted => "fyyur_quiz_category_exhausted_total",
            MetricName::AuthFailures => "fyyur_auth_failures_total",
            MetricName::DirectoryCalls => "fyyur_directory_calls_total",
            MetricName::DirectoryErrors => "fyyur_directory_errors_total",
        }
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Install the Prometheus recorder and serve `/metrics` on `addr`.
pub fn init(addr: SocketAddr) -> Result<(), Box<dyn std::error::Error>> {
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| format!("Failed to install Prometheus exporter: {e}"))?;
    Ok(())
}

pub fn record_created(entity: &'static str) {
    ::metrics::counter!(MetricName::RecordsCreated.as_str(), "entity" => entity).increment(1);
}

pub fn record_updated(entity: &'static str) {
    ::metrics::counter!(MetricName::RecordsUpdated.as_str(), "entity" => entity).increment(1);
}

pub fn record_deleted(entity: &'static str) {
    ::metrics::counter!(MetricName::RecordsDeleted.as_str(), "entity" => entity).increment(1);
}

/// A request that failed validation or lookup before touching storage.
pub fn request_rejected(app: &'static str, status: u16) {
    ::metrics::counter!(
        MetricName::RequestsRejected.as_str(),
        "app" => app,
        "status" => status.to_string()
    )
    .increment(1);
}

pub mod booking {
    use super::MetricName;

    pub fn show_rejected_unavailable() {
        ::metrics::counter!(MetricName::ShowsRejectedUnavailable.as_str()).increment(1);
    }
}

pub mod trivia {
    use super::MetricName;

    pub fn quiz_draw(exhausted: bool) {
        ::metrics::counter!(MetricName::QuizDraws.as_str()).increment(1);
        if exhausted {
            ::metrics::counter!(MetricName::QuizCategoryExhausted.as_str()).increment(1);
        }
    }
}

pub mod coffee {
    use super::MetricName;

    pub fn auth_failure(code: &'static str) {
        ::metrics::counter!(MetricName::AuthFailures.as_str(), "code" => code).increment(1);
    }

    pub fn directory_call(operation: &'static str, ok: bool) {
        ::metrics::counter!(MetricName::DirectoryCalls.as_str(), "operation" => operation)
            .increment(1);
        if !ok {
            ::metrics::counter!(MetricName::DirectoryErrors.as_str(), "operation" => operation)
                .increment(1);
        }
    }
}

use std::fs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*, EnvFilter};

/// Initializes console output, a JSON daily log per app, and a shared
/// `logs/error.log` that only receives errors.
///
/// The returned guards flush the file writers; keep them alive for the
/// lifetime of the process.
pub fn init_logging(app_name: &str) -> Vec<WorkerGuard> {
    // Ensure logs directory exists
    let _ = fs::create_dir_all("logs");

    let file_appender = tracing_appender::rolling::daily("logs", format!("{app_name}.log"));
    let (app_writer, app_guard) = tracing_appender::non_blocking(file_appender);

    let error_appender = tracing_appender::rolling::never("logs", "error.log");
    let (error_writer, error_guard) = tracing_appender::non_blocking(error_appender);

    let file_layer = fmt::layer().json().with_writer(app_writer);

    let error_layer = fmt::layer()
        .with_ansi(false)
        .with_file(true)
        .with_line_number(true)
        .with_writer(error_writer)
        .with_filter(LevelFilter::ERROR);

    let console_layer = fmt::layer()
        .with_target(true)
        .with_writer(std::io::stdout);

    // Respect RUST_LOG if set; otherwise default to verbose for our crate
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("fyyur_suite=debug,tower_http=info,info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(error_layer)
        .with(console_layer)
        .init();

    vec![app_guard, error_guard]
}

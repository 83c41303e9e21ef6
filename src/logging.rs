//! # Structured Logging Module
//!
//! Environment-aware structured logging for drain and pagination loops.

use chrono::Utc;
use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize structured logging with environment-specific configuration
///
/// `RUST_LOG` wins when set; otherwise the level follows the detected
/// environment. `BUTTER_LOG_FORMAT=json` switches the console output to JSON.
pub fn init_structured_logging() {
    LOGGER_INITIALIZED.get_or_init(|| {
        let environment = get_environment();
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(get_log_level(&environment)));
        let json = std::env::var("BUTTER_LOG_FORMAT").is_ok_and(|format| format == "json");

        let layer = if json {
            fmt::layer()
                .with_target(true)
                .with_ansi(false)
                .json()
                .with_filter(filter)
                .boxed()
        } else {
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_level(true)
                .with_filter(filter)
                .boxed()
        };

        // Use try_init to avoid panic if global subscriber already set
        if tracing_subscriber::registry().with(layer).try_init().is_err() {
            tracing::debug!("Global tracing subscriber already initialized - continuing with existing subscriber");
        }

        tracing::info!(
            environment = %environment,
            json,
            "Structured logging initialized"
        );
    });
}

/// Get current environment from environment variables
fn get_environment() -> String {
    std::env::var("BUTTER_ENV")
        .or_else(|_| std::env::var("APP_ENV"))
        .unwrap_or_else(|_| "development".to_string())
}

/// Get log level based on environment
fn get_log_level(environment: &str) -> String {
    match environment {
        "test" => "debug".to_string(),
        "development" => "debug".to_string(),
        "production" => "info".to_string(),
        _ => "debug".to_string(),
    }
}

/// Log structured data for one submitted page of a drain or paginate loop
pub fn log_page_operation(
    operation: &str,
    page: usize,
    page_items: usize,
    remaining: usize,
    unprocessed: usize,
) {
    tracing::debug!(
        operation = %operation,
        page = page,
        page_items = page_items,
        remaining = remaining,
        unprocessed = unprocessed,
        timestamp = %Utc::now().to_rfc3339(),
        "PAGE_OPERATION"
    );
}

/// Log an aborted drain with the amount of work left behind
pub fn log_drain_aborted(operation: &str, pages: usize, remaining: usize, error: &str) {
    tracing::warn!(
        operation = %operation,
        pages = pages,
        remaining = remaining,
        error = %error,
        timestamp = %Utc::now().to_rfc3339(),
        "DRAIN_ABORTED"
    );
}

//! # Logging
//!
//! Environment-aware structured logging for the application manager. Console
//! output is human readable by default and switches to JSON lines when
//! `APPMGR_LOG_FORMAT=json`, which is what the device log collector expects.

use std::sync::OnceLock;

use chrono::Utc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Install the global subscriber. Safe to call more than once.
pub fn init_structured_logging() {
    LOGGER_INITIALIZED.get_or_init(|| {
        let environment = get_environment();
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(get_log_level(&environment)));
        let json = std::env::var("APPMGR_LOG_FORMAT")
            .map(|format| format.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let layer = if json {
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .json()
                .with_filter(filter)
                .boxed()
        } else {
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_ansi(true)
                .with_filter(filter)
                .boxed()
        };

        // The host may already own the global subscriber
        if tracing_subscriber::registry().with(layer).try_init().is_err() {
            tracing::debug!("Keeping the subscriber installed by the host");
        }

        tracing::info!(
            environment = %environment,
            json = json,
            "STRUCTURED LOGGING: Initialized"
        );
    });
}

/// `APPMGR_ENV`, falling back to `development`.
pub fn get_environment() -> String {
    std::env::var("APPMGR_ENV").unwrap_or_else(|_| String::from("development"))
}

fn get_log_level(environment: &str) -> &'static str {
    match environment {
        "production" => "info",
        _ => "debug",
    }
}

/// Log structured data for switch protocol steps
pub fn log_switch_operation(
    operation: &str,
    application: &str,
    window: Option<&str>,
    state: &str,
    details: Option<&str>,
) {
    tracing::info!(
        operation = %operation,
        application = %application,
        window = window,
        state = %state,
        details = details,
        timestamp = %Utc::now().to_rfc3339(),
        "SWITCH_OPERATION"
    );
}

/// Log structured data for action queue processing
pub fn log_action_operation(
    operation: &str,
    action: &str,
    target: Option<&str>,
    status: &str,
    details: Option<&str>,
) {
    tracing::info!(
        operation = %operation,
        action = %action,
        target = target,
        status = %status,
        details = details,
        timestamp = %Utc::now().to_rfc3339(),
        "ACTION_OPERATION"
    );
}

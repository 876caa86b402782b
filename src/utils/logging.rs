//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the view lifecycle.

use tracing::{info, warn, error, debug};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use crate::config::LoggingConfig;
use crate::utils::errors::{ErrorSeverity, ViewError, Result};

/// Initialize logging based on configuration
///
/// The returned guard flushes the file writer on drop and must be held
/// for the lifetime of the process.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = tracing_subscriber::EnvFilter::try_new(&config.level)
        .map_err(|e| ViewError::Config(format!("Invalid log filter: {}", e)))?;

    let (file_layer, guard) = match &config.file_path {
        Some(dir) => {
            let file_appender = tracing_appender::rolling::daily(dir, "marketdeck.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = tracing_subscriber::fmt::layer()
                .json()
                .with_writer(non_blocking);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .with(file_layer)
        .try_init()
        .map_err(|e| ViewError::Config(format!("Logging already initialized: {}", e)))?;

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log the end of a fetch cycle
pub fn log_fetch_cycle(view: &str, generation: u64, resources: usize, duration_ms: u64, success: bool) {
    if success {
        debug!(
            view = view,
            generation = generation,
            resources = resources,
            duration_ms = duration_ms,
            "Fetch cycle completed"
        );
    } else {
        warn!(
            view = view,
            generation = generation,
            resources = resources,
            duration_ms = duration_ms,
            "Fetch cycle failed"
        );
    }
}

/// Log an optimistic mutation outcome
pub fn log_mutation(view: &str, action: &str, target: &str, committed: bool) {
    if committed {
        info!(
            view = view,
            action = action,
            target = target,
            "Mutation committed"
        );
    } else {
        warn!(
            view = view,
            action = action,
            target = target,
            "Mutation reverted"
        );
    }
}

/// Log API errors with context, at the level their severity calls for
pub fn log_api_error(api: &str, err: &ViewError, context: Option<&str>) {
    let severity = err.severity();
    match severity {
        ErrorSeverity::Info => info!(api = api, severity = %severity, error = %err, context = context, "API request refused"),
        ErrorSeverity::Warning => warn!(api = api, severity = %severity, error = %err, context = context, "API request failed"),
        ErrorSeverity::Error | ErrorSeverity::Critical => error!(
            api = api,
            severity = %severity,
            error = %err,
            context = context,
            "API error occurred"
        ),
    }
}

//! Logging and observability
//!
//! Structured logging through `tracing`:
//! - Plain or JSON console output
//! - Configurable log levels
//! - Local JSON file logging with rotation
//!
//! Every pipeline run executes inside a `pipeline_run` span carrying its
//! `run_id`, so all stage events of one run can be correlated.
//!
//! # Example
//!
//! ```no_run
//! use reportflow::logging::init_logging;
//! use reportflow::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the completion of a pipeline stage
///
/// # Example
///
/// ```no_run
/// use reportflow::log_stage_complete;
/// use std::time::Instant;
///
/// let started = Instant::now();
/// log_stage_complete!("transform", started.elapsed());
/// ```
#[macro_export]
macro_rules! log_stage_complete {
    ($stage:expr, $duration:expr) => {
        tracing::info!(
            stage = $stage,
            duration_ms = $duration.as_millis() as u64,
            "Stage completed"
        );
    };
    ($stage:expr, $duration:expr, $($field:tt)+) => {
        tracing::info!(
            stage = $stage,
            duration_ms = $duration.as_millis() as u64,
            $($field)+,
            "Stage completed"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use reportflow::log_error_with_context;
/// use reportflow::domain::ReportflowError;
///
/// let error = ReportflowError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}

#[cfg(test)]
mod tests {
    use crate::domain::ReportflowError;
    use std::time::Duration;

    #[test]
    fn test_macros_expand() {
        let error = ReportflowError::Decode("not an array".to_string());
        log_error_with_context!(&error, "decode failed");
        log_stage_complete!("transform", Duration::from_millis(5));
        log_stage_complete!("transform", Duration::from_millis(5), rows = 3usize);
    }
}

//!
//! src/logging.rs  Andrew Belles  Oct 2nd, 2025
//!
//! Initializes logger so that the collector and report runs
//! give informative outputs while running
//!
//!

use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use tracing_error::ErrorLayer;
use tracing_appender::non_blocking;

use crate::config::{LogFormat, LoggingConfig};

/// Must be held until exit or buffered events are lost
pub struct LoggingGuard(#[allow(dead_code)] tracing_appender::non_blocking::WorkerGuard);

pub fn init_logging(cfg: &LoggingConfig) ->
    Result<LoggingGuard, crate::errors::TrendsError> {

    let (writer, guard) = non_blocking(std::io::stdout());
    let filter = std::env::var("RUST_LOG")
        .ok()
        .map(EnvFilter::new)
        .unwrap_or_else(|| EnvFilter::new(cfg.filter_directives.clone()));

    let time = fmt::time::UtcTime::rfc_3339();
    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(ErrorLayer::default());

    match cfg.format {
        LogFormat::Json => {
            let fmt_layer = fmt::layer()
                .with_writer(writer)
                .with_timer(time)
                .with_target(cfg.include_target)
                .with_file(cfg.include_file_line)
                .with_line_number(cfg.include_file_line)
                .json()
                .flatten_event(true)
                .with_current_span(true)
                .with_span_list(true);
            registry.with(fmt_layer).try_init()
        },
        LogFormat::Pretty => {
            let fmt_layer = fmt::layer()
                .with_writer(writer)
                .with_timer(time)
                .with_ansi(cfg.with_ansi)
                .with_target(cfg.include_target)
                .with_file(cfg.include_file_line)
                .with_line_number(cfg.include_file_line);
            registry.with(fmt_layer).try_init()
        }
    }
    .map_err(|e| crate::errors::TrendsError::Config(format!("logger init: {e}")))?;

    Ok( LoggingGuard(guard) )
}

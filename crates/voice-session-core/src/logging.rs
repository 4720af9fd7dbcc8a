use std::str::FromStr;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{fmt, EnvFilter};

use crate::errors::{VoiceError, VoiceResult};

/// Subscriber settings resolved from [`crate::config::LogSettings`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub level: Level,
    pub json: bool,
    /// Include file and line of each event
    pub file_info: bool,
    /// Log enter/exit of the `reconcile` span
    pub reconcile_spans: bool,
    /// Name printed in the startup line
    pub app_name: String,
}

/// Install the global tracing subscriber
///
/// Fails if a global subscriber is already set.
pub fn setup_logging(config: LoggingConfig) -> VoiceResult<()> {
    let filter = EnvFilter::from_default_env().add_directive(config.level.into());

    let span_events = if config.reconcile_spans {
        FmtSpan::ACTIVE
    } else {
        FmtSpan::NONE
    };

    let builder = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_span_events(span_events)
        .with_file(config.file_info)
        .with_line_number(config.file_info);

    let result = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    result.map_err(|e| VoiceError::Logging(e.to_string()))?;

    tracing::info!("Starting {} v{}", config.app_name, env!("CARGO_PKG_VERSION"));
    Ok(())
}

/// Parse a log level from a string
pub fn parse_log_level(level: &str) -> VoiceResult<Level> {
    Level::from_str(level).map_err(|_| VoiceError::config(format!("Invalid log level: {}", level)))
}

//! Logging initialisation via tracing-subscriber.
//!
//! Call [`init`] once at startup, after the configuration is resolved.

use std::str::FromStr;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::config::LogConfig;
use crate::error::AppError;

/// Output format selected by `LOG_FORMAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(AppError::Logger(format!(
                "unrecognised log format: '{other}' (expected 'text' or 'json')"
            ))),
        }
    }
}

/// Initialise the global tracing subscriber on stderr.
///
/// If `prefer_level` is `true`, `log.level` takes precedence and `RUST_LOG` is
/// only used as a fallback when the level is invalid. If `prefer_level` is
/// `false`, `RUST_LOG` takes precedence and `log.level` is the fallback.
pub fn init(log: &LogConfig, prefer_level: bool) -> Result<(), AppError> {
    let format = parse_format(&log.format)?;

    let filter = if prefer_level {
        match level_filter(&log.level) {
            Ok(filter) => filter,
            Err(level_err) => EnvFilter::try_from_default_env().map_err(|env_err| {
                AppError::Logger(format!("{level_err}; RUST_LOG parse failed: {env_err}"))
            })?,
        }
    } else {
        EnvFilter::try_from_default_env().or_else(|_| level_filter(&log.level))?
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    }
    .map_err(|e| AppError::Logger(format!("failed to set subscriber: {e}")))?;

    Ok(())
}

fn level_filter(level: &str) -> Result<EnvFilter, AppError> {
    let level = parse_level(level)?;
    Ok(EnvFilter::new(level.to_string()))
}

/// Parse a log level string into a [`LevelFilter`], returning an error on
/// unrecognised values.
pub fn parse_level(level: &str) -> Result<LevelFilter, AppError> {
    if level.is_empty() {
        return Err(AppError::Logger("log level must not be empty".into()));
    }
    level
        .parse::<LevelFilter>()
        .map_err(|_| AppError::Logger(format!("unrecognised log level: '{level}'")))
}

pub fn parse_format(format: &str) -> Result<LogFormat, AppError> {
    format.parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_levels_parse() {
        for l in &["error", "warn", "info", "debug"] {
            assert!(parse_level(l).is_ok(), "expected '{l}' to be valid");
        }
    }

    #[test]
    fn invalid_level_errors() {
        assert!(parse_level("verbose").is_err());
        assert!(parse_level("").is_err());
        assert!(parse_level("INFO_LEVEL").is_err());
    }

    #[test]
    fn formats_parse() {
        assert_eq!(parse_format("text").unwrap(), LogFormat::Text);
        assert_eq!(parse_format("json").unwrap(), LogFormat::Json);
    }

    #[test]
    fn unknown_format_errors() {
        let msg = parse_format("pretty").unwrap_err().to_string();
        assert!(msg.contains("logger error"));
        assert!(msg.contains("pretty"));
    }

    #[test]
    fn init_rejects_bad_format_before_installing() {
        let log = LogConfig { level: "info".into(), format: "xml".into() };
        assert!(matches!(init(&log, true), Err(AppError::Logger(_))));
    }

    #[test]
    fn init_info_succeeds_or_already_init() {
        // May already be set by a prior test run in the same process — both outcomes are fine.
        let log = LogConfig { level: "info".into(), format: "text".into() };
        match init(&log, true) {
            Ok(()) => {}
            Err(AppError::Logger(msg)) if msg.contains("set subscriber") => {}
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
}

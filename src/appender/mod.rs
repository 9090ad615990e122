// src/appender/mod.rs
pub mod console;

use crate::error::ConfigError;
use crate::level::LogLevel;
use chrono::{DateTime, Local};
use indexmap::IndexMap;
use serde_json::Value;

pub use console::{ConsoleAppender, ConsoleStreams, Destination, Rendered};

/// Already-parsed key/value options handed to an appender
pub type ConfigMap = IndexMap<String, Value>;

/// Option key understood by every appender
pub const THRESHOLD_LEVEL_KEY: &str = "ThresholdLevel";

/// Metadata travelling with each record
#[derive(Debug, Clone)]
pub struct LogInfo {
    pub logger_name: String,
    pub level: LogLevel,
    pub timestamp: DateTime<Local>,
    pub file: Option<String>,
    pub line: Option<u32>,
    pub module_path: Option<String>,
}

impl LogInfo {
    pub fn new(logger_name: &str, level: LogLevel) -> Self {
        LogInfo {
            logger_name: logger_name.to_string(),
            level,
            timestamp: Local::now(),
            file: None,
            line: None,
            module_path: None,
        }
    }

    pub fn with_location(mut self, file: Option<&str>, line: Option<u32>) -> Self {
        self.file = file.map(String::from);
        self.line = line;
        self
    }
}

/// A destination that renders and writes accepted records.
///
/// Appenders are shared between loggers (and threads), so configuration
/// changes go through `&self`.
pub trait Appender: Send + Sync {
    fn identifier(&self) -> &str;

    /// Minimum level a record needs to reach `emit`
    fn threshold(&self) -> LogLevel;
    fn set_threshold(&self, level: LogLevel);

    /// Apply already-parsed options. Unknown keys are ignored.
    fn configure(&self, options: &ConfigMap) -> Result<(), ConfigError>;

    /// Render and write one record, unconditionally
    fn emit(&self, message: &str, level: LogLevel, info: &LogInfo);

    fn log(&self, message: &str, level: LogLevel, info: &LogInfo) {
        if level != LogLevel::Off && level >= self.threshold() {
            self.emit(message, level, info);
        }
    }
}

impl std::fmt::Debug for dyn Appender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Appender")
            .field("identifier", &self.identifier())
            .field("threshold", &self.threshold())
            .finish()
    }
}

/// Read a level-name option. `Ok(None)` when the key is absent.
pub(crate) fn level_option(
    appender: &str,
    options: &ConfigMap,
    key: &str,
) -> Result<Option<LogLevel>, ConfigError> {
    match options.get(key) {
        None => Ok(None),
        Some(Value::String(name)) => name
            .parse::<LogLevel>()
            .map(Some)
            .map_err(|_| ConfigError::invalid_value(appender, key, name)),
        Some(other) => Err(ConfigError::invalid_value(appender, key, other)),
    }
}

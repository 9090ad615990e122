// src/logger.rs
use crate::appender::{Appender, LogInfo};
use crate::level::LogLevel;
use parking_lot::RwLock;
use std::sync::Arc;

pub const DEFAULT_THRESHOLD: LogLevel = LogLevel::Debug;

#[derive(Debug, Clone)]
struct LoggerSettings {
    threshold: LogLevel,
    appenders: Vec<Arc<dyn Appender>>,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        LoggerSettings {
            threshold: DEFAULT_THRESHOLD,
            appenders: Vec::new(),
        }
    }
}

/// Named logger forwarding accepted records to its appenders.
///
/// The identifier is fixed at creation; threshold and appenders can change
/// afterwards and are shared through `&self`, since the registry hands the
/// same logger to every caller asking for its identifier.
#[derive(Debug)]
pub struct Logger {
    identifier: String,
    settings: RwLock<LoggerSettings>,
}

impl Logger {
    pub fn new(identifier: &str) -> Self {
        Logger {
            identifier: identifier.to_string(),
            settings: RwLock::new(LoggerSettings::default()),
        }
    }

    pub fn with_appenders(
        identifier: &str,
        threshold: LogLevel,
        appenders: Vec<Arc<dyn Appender>>,
    ) -> Self {
        Logger {
            identifier: identifier.to_string(),
            settings: RwLock::new(LoggerSettings {
                threshold,
                appenders,
            }),
        }
    }

    /// New logger named `identifier` with a copy of this logger's
    /// configuration. Appenders are shared, not duplicated.
    pub fn derive(&self, identifier: &str) -> Logger {
        Logger {
            identifier: identifier.to_string(),
            settings: RwLock::new(self.settings.read().clone()),
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn threshold(&self) -> LogLevel {
        self.settings.read().threshold
    }

    pub fn set_threshold(&self, level: LogLevel) {
        self.settings.write().threshold = level;
    }

    pub fn appenders(&self) -> Vec<Arc<dyn Appender>> {
        self.settings.read().appenders.clone()
    }

    pub fn add_appender(&self, appender: Arc<dyn Appender>) {
        self.settings.write().appenders.push(appender);
    }

    pub fn set_appenders(&self, appenders: Vec<Arc<dyn Appender>>) {
        self.settings.write().appenders = appenders;
    }

    pub fn clear_appenders(&self) {
        self.settings.write().appenders.clear();
    }

    /// Replace threshold and appenders together
    pub fn configure(&self, threshold: LogLevel, appenders: Vec<Arc<dyn Appender>>) {
        *self.settings.write() = LoggerSettings {
            threshold,
            appenders,
        };
    }

    /// Back to defaults: no appenders, `Debug` threshold
    pub fn reset_configuration(&self) {
        *self.settings.write() = LoggerSettings::default();
    }

    pub fn is_enabled_for(&self, level: LogLevel) -> bool {
        level != LogLevel::Off && level >= self.threshold()
    }

    pub fn log(&self, level: LogLevel, message: &str) {
        if self.is_enabled_for(level) {
            self.dispatch(message, level, &LogInfo::new(&self.identifier, level));
        }
    }

    /// Log with caller-provided metadata (source location, timestamp)
    pub fn log_with_info(&self, level: LogLevel, message: &str, info: &LogInfo) {
        if self.is_enabled_for(level) {
            self.dispatch(message, level, info);
        }
    }

    /// The closure only runs when `level` passes the threshold
    pub fn log_lazy<F>(&self, level: LogLevel, message: F)
    where
        F: FnOnce() -> String,
    {
        if self.is_enabled_for(level) {
            let message = message();
            self.dispatch(&message, level, &LogInfo::new(&self.identifier, level));
        }
    }

    pub fn trace(&self, message: &str) {
        self.log(LogLevel::Trace, message);
    }

    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    pub fn warning(&self, message: &str) {
        self.log(LogLevel::Warning, message);
    }

    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }

    pub fn fatal(&self, message: &str) {
        self.log(LogLevel::Fatal, message);
    }

    fn dispatch(&self, message: &str, level: LogLevel, info: &LogInfo) {
        // Snapshot so appenders run without the settings lock held
        let appenders = self.appenders();
        for appender in &appenders {
            appender.log(message, level, info);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appender::ConfigMap;
    use crate::error::ConfigError;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct Recorder {
        records: Mutex<Vec<(LogLevel, String, String)>>,
    }

    impl Appender for Recorder {
        fn identifier(&self) -> &str {
            "recorder"
        }
        fn threshold(&self) -> LogLevel {
            LogLevel::Trace
        }
        fn set_threshold(&self, _level: LogLevel) {}
        fn configure(&self, _options: &ConfigMap) -> Result<(), ConfigError> {
            Ok(())
        }
        fn emit(&self, message: &str, level: LogLevel, info: &LogInfo) {
            self.records
                .lock()
                .push((level, message.to_string(), info.logger_name.clone()));
        }
    }

    #[test]
    fn test_defaults() {
        let logger = Logger::new("app");
        assert_eq!(logger.identifier(), "app");
        assert_eq!(logger.threshold(), LogLevel::Debug);
        assert!(logger.appenders().is_empty());
    }

    #[test]
    fn test_threshold_filtering() {
        let recorder = Arc::new(Recorder::default());
        let logger = Logger::with_appenders(
            "app",
            LogLevel::Warning,
            vec![recorder.clone() as Arc<dyn Appender>],
        );

        logger.info("skipped");
        logger.warning("careful");
        logger.fatal("gone");
        logger.log(LogLevel::Off, "never");

        let records = recorder.records.lock();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], (LogLevel::Warning, "careful".to_string(), "app".to_string()));
        assert_eq!(records[1].0, LogLevel::Fatal);
    }

    #[test]
    fn test_lazy_message_not_built_when_disabled() {
        let logger = Logger::new("app");
        logger.set_threshold(LogLevel::Error);

        let mut built = false;
        logger.log_lazy(LogLevel::Debug, || {
            built = true;
            "expensive".to_string()
        });
        assert!(!built);
    }

    #[test]
    fn test_derive_copies_configuration() {
        let recorder: Arc<dyn Appender> = Arc::new(Recorder::default());
        let base = Logger::with_appenders("a", LogLevel::Info, vec![Arc::clone(&recorder)]);

        let derived = base.derive("a.b");
        assert_eq!(derived.identifier(), "a.b");
        assert_eq!(derived.threshold(), LogLevel::Info);
        assert_eq!(derived.appenders().len(), 1);
        assert!(Arc::ptr_eq(&derived.appenders()[0], &recorder));

        // Independent afterwards
        derived.set_threshold(LogLevel::Fatal);
        assert_eq!(base.threshold(), LogLevel::Info);
    }

    #[test]
    fn test_reset_configuration() {
        let logger = Logger::with_appenders(
            "",
            LogLevel::Fatal,
            vec![Arc::new(Recorder::default()) as Arc<dyn Appender>],
        );
        logger.reset_configuration();
        assert_eq!(logger.threshold(), DEFAULT_THRESHOLD);
        assert!(logger.appenders().is_empty());
    }
}

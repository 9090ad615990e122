// src/bridge.rs
//! Routes records of the `log` facade into a [`LoggerRegistry`].
//!
//! The record target becomes the logger identifier, with Rust path
//! separators turned into dots: `my_crate::net::http` is logged through
//! `my_crate.net.http`.

use crate::appender::LogInfo;
use crate::level::LogLevel;
use crate::registry::LoggerRegistry;
use std::sync::Arc;

pub struct LogBridge {
    registry: Arc<LoggerRegistry>,
}

impl LogBridge {
    pub fn new(registry: Arc<LoggerRegistry>) -> Self {
        LogBridge { registry }
    }
}

pub fn target_to_identifier(target: &str) -> String {
    target.replace("::", ".")
}

impl log::Log for LogBridge {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.registry
            .get_logger(&target_to_identifier(metadata.target()))
            .is_enabled_for(metadata.level().into())
    }

    fn log(&self, record: &log::Record) {
        let level = LogLevel::from(record.level());
        let logger = self.registry.get_logger(&target_to_identifier(record.target()));
        if !logger.is_enabled_for(level) {
            return;
        }

        let mut info = LogInfo::new(logger.identifier(), level)
            .with_location(record.file(), record.line());
        info.module_path = record.module_path().map(String::from);

        logger.log_with_info(level, &record.args().to_string(), &info);
    }

    fn flush(&self) {}
}

/// Install a bridge over the process-wide registry as the `log` logger
pub fn init() -> Result<(), log::SetLoggerError> {
    install(LoggerRegistry::shared())
}

/// Install a bridge over `registry` as the `log` logger
pub fn install(registry: Arc<LoggerRegistry>) -> Result<(), log::SetLoggerError> {
    log::set_boxed_logger(Box::new(LogBridge::new(registry)))?;
    log::set_max_level(log::LevelFilter::Trace);
    Ok(())
}

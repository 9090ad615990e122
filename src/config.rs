// src/config.rs
use crate::appender::{Appender, ConfigMap, ConsoleAppender};
use crate::error::{ConfigError, RegistryError};
use crate::level::LogLevel;
use crate::logger::{Logger, DEFAULT_THRESHOLD};
use crate::registry::LoggerRegistry;
use crate::tty::TerminalEnv;
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;

/// Appender kinds that can be built from a configuration document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum AppenderClass {
    #[serde(alias = "Console", alias = "console")]
    StdOutAppender,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AppenderConfig {
    pub class: AppenderClass,
    pub identifier: String,
    /// Remaining keys, handed to the appender's `configure`
    #[serde(flatten)]
    pub options: ConfigMap,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct RootLoggerConfig {
    pub threshold_level: Option<LogLevel>,
    pub appender_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LoggerConfig {
    pub identifier: String,
    #[serde(default)]
    pub threshold_level: Option<LogLevel>,
    #[serde(default)]
    pub appender_ids: Vec<String>,
}

/// Already-parsed logging configuration: appenders, the root logger and
/// named loggers
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct LoggingConfig {
    pub appenders: Vec<AppenderConfig>,
    pub root_logger: RootLoggerConfig,
    pub loggers: Vec<LoggerConfig>,
}

impl LoggingConfig {
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load from a file; `.json` files are read as JSON, anything else as YAML
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::from_json_str(&content),
            _ => Self::from_yaml_str(&content),
        }
    }

    /// Replace the configuration of `registry` with this one
    pub fn apply(&self, registry: &LoggerRegistry) -> Result<(), ConfigError> {
        self.apply_with_env(registry, &TerminalEnv::from_process())
    }

    /// Like [`apply`](Self::apply) with an explicit terminal environment for
    /// console appenders.
    ///
    /// Everything is built and validated before the registry is touched, so
    /// a failing configuration leaves the previous one in place. The swap
    /// itself is a single registry update; concurrent `get_logger` callers
    /// never observe a half-applied configuration.
    pub fn apply_with_env(
        &self,
        registry: &LoggerRegistry,
        env: &TerminalEnv,
    ) -> Result<(), ConfigError> {
        let appenders = self.build_appenders(env)?;

        let root_appenders = select_appenders(&appenders, "", &self.root_logger.appender_ids)?;
        let mut loggers = Vec::with_capacity(self.loggers.len());
        for logger_config in &self.loggers {
            if logger_config.identifier.is_empty() {
                return Err(RegistryError::InvalidIdentifier.into());
            }
            let selected = select_appenders(
                &appenders,
                &logger_config.identifier,
                &logger_config.appender_ids,
            )?;
            loggers.push(Logger::with_appenders(
                &logger_config.identifier,
                logger_config.threshold_level.unwrap_or(DEFAULT_THRESHOLD),
                selected,
            ));
        }

        registry.replace_configuration(
            self.root_logger.threshold_level.unwrap_or(DEFAULT_THRESHOLD),
            root_appenders,
            loggers,
        )?;
        Ok(())
    }

    fn build_appenders(
        &self,
        env: &TerminalEnv,
    ) -> Result<IndexMap<String, Arc<dyn Appender>>, ConfigError> {
        let mut appenders: IndexMap<String, Arc<dyn Appender>> = IndexMap::new();
        for appender_config in &self.appenders {
            if appenders.contains_key(&appender_config.identifier) {
                return Err(ConfigError::DuplicateAppender(
                    appender_config.identifier.clone(),
                ));
            }
            let appender: Arc<dyn Appender> = match appender_config.class {
                AppenderClass::StdOutAppender => {
                    Arc::new(ConsoleAppender::with_env(&appender_config.identifier, env))
                }
            };
            appender.configure(&appender_config.options)?;
            appenders.insert(appender_config.identifier.clone(), appender);
        }
        Ok(appenders)
    }
}

fn select_appenders(
    appenders: &IndexMap<String, Arc<dyn Appender>>,
    logger: &str,
    ids: &[String],
) -> Result<Vec<Arc<dyn Appender>>, ConfigError> {
    ids.iter()
        .map(|id| {
            appenders
                .get(id)
                .cloned()
                .ok_or_else(|| ConfigError::UnknownAppender {
                    logger: logger.to_string(),
                    appender: id.clone(),
                })
        })
        .collect()
}

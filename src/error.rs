#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Invalid logger identifier: registered loggers need a non-empty identifier (use the root logger instead)")]
    InvalidIdentifier,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid '{key}' value for appender '{appender}': {value}")]
    InvalidConfigurationValue {
        appender: String,
        key: String,
        value: String,
    },

    #[error("Logger '{logger}' references unknown appender '{appender}'")]
    UnknownAppender { logger: String, appender: String },

    #[error("Appender '{0}' is defined more than once")]
    DuplicateAppender(String),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    pub(crate) fn invalid_value(appender: &str, key: &str, value: impl ToString) -> Self {
        ConfigError::InvalidConfigurationValue {
            appender: appender.to_string(),
            key: key.to_string(),
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("Unknown log level: {0}")]
pub struct ParseLevelError(pub String);

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("Unknown color: {0}")]
pub struct ParseColorError(pub String);

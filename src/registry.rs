// src/registry.rs
use crate::appender::Appender;
use crate::error::RegistryError;
use crate::level::LogLevel;
use crate::logger::Logger;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

static SHARED: Lazy<Arc<LoggerRegistry>> = Lazy::new(|| Arc::new(LoggerRegistry::new()));

/// Holds the loggers and matches identifiers to them.
///
/// The root logger (identifier `""`) always exists. Any other identifier is
/// resolved against the closest registered ancestor in its dot-delimited
/// hierarchy, and the derived logger is cached until the next
/// [`reset_configuration`](Self::reset_configuration).
#[derive(Debug)]
pub struct LoggerRegistry {
    root: Arc<Logger>,
    loggers: RwLock<HashMap<String, Arc<Logger>>>,
}

impl Default for LoggerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl LoggerRegistry {
    pub fn new() -> Self {
        LoggerRegistry {
            root: Arc::new(Logger::new("")),
            loggers: RwLock::new(HashMap::new()),
        }
    }

    /// Process-wide registry, created on first use
    pub fn shared() -> Arc<LoggerRegistry> {
        Arc::clone(&*SHARED)
    }

    /// The catch-all logger used when no registered ancestor matches
    pub fn root_logger(&self) -> Arc<Logger> {
        Arc::clone(&self.root)
    }

    /// Add `logger`, replacing any logger with the same identifier.
    ///
    /// The root cannot be registered this way; configure it through
    /// [`root_logger`](Self::root_logger).
    pub fn register_logger(&self, logger: Logger) -> Result<Arc<Logger>, RegistryError> {
        if logger.identifier().is_empty() {
            return Err(RegistryError::InvalidIdentifier);
        }

        let logger = Arc::new(logger);
        self.loggers
            .write()
            .insert(logger.identifier().to_string(), Arc::clone(&logger));
        Ok(logger)
    }

    /// Drop every non-root logger and restore the root to its defaults
    pub fn reset_configuration(&self) {
        let mut loggers = self.loggers.write();
        loggers.clear();
        self.root.reset_configuration();
    }

    /// Swap in a whole configuration: the root's threshold and appenders plus
    /// the full set of named loggers.
    ///
    /// Everything happens under one write lock, so `get_logger` sees either
    /// the previous configuration or this one, never a mix. Nothing changes
    /// if any logger has an empty identifier.
    pub fn replace_configuration(
        &self,
        root_threshold: LogLevel,
        root_appenders: Vec<Arc<dyn Appender>>,
        loggers: Vec<Logger>,
    ) -> Result<(), RegistryError> {
        if loggers.iter().any(|logger| logger.identifier().is_empty()) {
            return Err(RegistryError::InvalidIdentifier);
        }

        let mut map = self.loggers.write();
        map.clear();
        self.root.configure(root_threshold, root_appenders);
        for logger in loggers {
            map.insert(logger.identifier().to_string(), Arc::new(logger));
        }
        Ok(())
    }

    /// Logger for `identifier`, derived and cached on first request
    pub fn get_logger(&self, identifier: &str) -> Arc<Logger> {
        if identifier.is_empty() {
            return self.root_logger();
        }

        if let Some(logger) = self.loggers.read().get(identifier) {
            return Arc::clone(logger);
        }

        let mut loggers = self.loggers.write();
        // Another caller may have resolved it between the two locks
        if let Some(logger) = loggers.get(identifier) {
            return Arc::clone(logger);
        }

        let base = closest_ancestor(&loggers, identifier).unwrap_or(&self.root);
        let logger = Arc::new(base.derive(identifier));
        loggers.insert(identifier.to_string(), Arc::clone(&logger));
        logger
    }

    /// Identifier of the logger `identifier` would be derived from, `""` for
    /// the root. Does not create anything.
    pub fn resolve_base(&self, identifier: &str) -> String {
        let loggers = self.loggers.read();
        if loggers.contains_key(identifier) {
            return identifier.to_string();
        }
        closest_ancestor(&loggers, identifier)
            .map(|logger| logger.identifier().to_string())
            .unwrap_or_default()
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.loggers.read().contains_key(identifier)
    }

    /// Sorted identifiers of all non-root loggers
    pub fn identifiers(&self) -> Vec<String> {
        let mut identifiers: Vec<String> = self.loggers.read().keys().cloned().collect();
        identifiers.sort();
        identifiers
    }

    pub fn len(&self) -> usize {
        self.loggers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.loggers.read().is_empty()
    }
}

/// Strip the last dot-delimited component: `"a.b.c"` -> `"a.b"`, `"a"` -> `""`
pub fn parent_identifier(identifier: &str) -> &str {
    match identifier.rfind('.') {
        Some(index) => &identifier[..index],
        None => "",
    }
}

// Walks from the most specific ancestor upwards and stops at the first hit
fn closest_ancestor<'m>(
    loggers: &'m HashMap<String, Arc<Logger>>,
    identifier: &str,
) -> Option<&'m Arc<Logger>> {
    let mut candidate = parent_identifier(identifier);
    while !candidate.is_empty() {
        if let Some(logger) = loggers.get(candidate) {
            return Some(logger);
        }
        candidate = parent_identifier(candidate);
    }
    None
}

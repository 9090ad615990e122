// src/appender/console.rs
use super::{level_option, Appender, ConfigMap, LogInfo, THRESHOLD_LEVEL_KEY};
use crate::colors::TtyColor;
use crate::error::ConfigError;
use crate::level::LogLevel;
use crate::tty::{TerminalEnv, TerminalProtocol};
use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use std::collections::HashMap;
use std::io::{self, Write};

pub const ERROR_THRESHOLD_KEY: &str = "ErrorThresholdLevel";
pub const TEXT_COLORS_KEY: &str = "TextColors";
pub const BACKGROUND_COLORS_KEY: &str = "BackgroundColors";

/// Output stream selected for a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    Stdout,
    Stderr,
}

/// A record after stream selection and colorization, before the newline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub destination: Destination,
    pub text: String,
}

/// The pair of streams a console appender writes to
pub struct ConsoleStreams {
    stdout: Box<dyn Write + Send>,
    stderr: Box<dyn Write + Send>,
}

impl ConsoleStreams {
    pub fn new(stdout: Box<dyn Write + Send>, stderr: Box<dyn Write + Send>) -> Self {
        ConsoleStreams { stdout, stderr }
    }

    /// The process standard output and standard error
    pub fn standard() -> Self {
        Self::new(Box::new(io::stdout()), Box::new(io::stderr()))
    }

    fn select(&mut self, destination: Destination) -> &mut Box<dyn Write + Send> {
        match destination {
            Destination::Stdout => &mut self.stdout,
            Destination::Stderr => &mut self.stderr,
        }
    }
}

#[derive(Debug, Clone)]
struct ConsoleSettings {
    threshold: LogLevel,
    error_threshold: Option<LogLevel>,
    text_colors: HashMap<LogLevel, TtyColor>,
    background_colors: HashMap<LogLevel, TtyColor>,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        ConsoleSettings {
            threshold: LogLevel::Trace,
            error_threshold: Some(LogLevel::Error),
            text_colors: HashMap::new(),
            background_colors: HashMap::new(),
        }
    }
}

/// Appender printing records to stdout or stderr.
///
/// * Records below the error threshold (or all records, when no error
///   threshold is set) go to stdout.
/// * Records at or above the error threshold go to stderr.
///
/// Text and background colors can be set per level. The escape grammar is
/// picked once, at construction, from the terminal environment.
pub struct ConsoleAppender {
    identifier: String,
    protocol: TerminalProtocol,
    settings: RwLock<ConsoleSettings>,
    streams: Mutex<ConsoleStreams>,
}

impl ConsoleAppender {
    /// Console appender on the process streams, detecting the protocol from
    /// the process environment
    pub fn new(identifier: &str) -> Self {
        Self::with_env(identifier, &TerminalEnv::from_process())
    }

    pub fn with_env(identifier: &str, env: &TerminalEnv) -> Self {
        Self::with_streams(identifier, env, ConsoleStreams::standard())
    }

    pub fn with_streams(identifier: &str, env: &TerminalEnv, streams: ConsoleStreams) -> Self {
        ConsoleAppender {
            identifier: identifier.to_string(),
            protocol: env.protocol(),
            settings: RwLock::new(ConsoleSettings::default()),
            streams: Mutex::new(streams),
        }
    }

    pub fn protocol(&self) -> TerminalProtocol {
        self.protocol
    }

    pub fn error_threshold(&self) -> Option<LogLevel> {
        self.settings.read().error_threshold
    }

    pub fn set_error_threshold(&self, level: Option<LogLevel>) {
        self.settings.write().error_threshold = level;
    }

    /// Set the text color for `level`, or remove it with `None`
    pub fn set_text_color(&self, color: Option<TtyColor>, level: LogLevel) {
        let mut settings = self.settings.write();
        match color {
            Some(color) => settings.text_colors.insert(level, color),
            None => settings.text_colors.remove(&level),
        };
    }

    /// Set the background color for `level`, or remove it with `None`
    pub fn set_background_color(&self, color: Option<TtyColor>, level: LogLevel) {
        let mut settings = self.settings.write();
        match color {
            Some(color) => settings.background_colors.insert(level, color),
            None => settings.background_colors.remove(&level),
        };
    }

    pub fn text_color(&self, level: LogLevel) -> Option<TtyColor> {
        self.settings.read().text_colors.get(&level).copied()
    }

    pub fn background_color(&self, level: LogLevel) -> Option<TtyColor> {
        self.settings.read().background_colors.get(&level).copied()
    }

    /// Pick the destination and colorize `message` for `level`
    pub fn render(&self, message: &str, level: LogLevel) -> Rendered {
        let settings = self.settings.read();

        let destination = match settings.error_threshold {
            Some(threshold) if level >= threshold => Destination::Stderr,
            _ => Destination::Stdout,
        };

        let text_color = settings.text_colors.get(&level).copied();
        let background_color = settings.background_colors.get(&level).copied();
        drop(settings);

        Rendered {
            destination,
            text: self.colorize(message, text_color, background_color),
        }
    }

    fn colorize(
        &self,
        message: &str,
        text_color: Option<TtyColor>,
        background_color: Option<TtyColor>,
    ) -> String {
        if text_color.is_none() && background_color.is_none() {
            return message.to_string();
        }

        let mut colorized = String::with_capacity(message.len() + 32);
        if let Some(color) = text_color {
            colorized.push_str(&self.protocol.text_color(color));
        }
        if let Some(color) = background_color {
            colorized.push_str(&self.protocol.background_color(color));
        }
        colorized.push_str(message);
        colorized.push_str(self.protocol.reset_sequence());
        colorized
    }

    fn color_map_option(
        &self,
        options: &ConfigMap,
        key: &str,
    ) -> Result<Option<Vec<(LogLevel, Option<TtyColor>)>>, ConfigError> {
        let entries = match options.get(key) {
            None => return Ok(None),
            Some(Value::Object(entries)) => entries,
            Some(other) => return Err(ConfigError::invalid_value(&self.identifier, key, other)),
        };

        let mut parsed = Vec::with_capacity(entries.len());
        for (level_name, color_value) in entries {
            let level = level_name
                .parse::<LogLevel>()
                .map_err(|_| ConfigError::invalid_value(&self.identifier, key, level_name))?;
            let color = match color_value {
                Value::Null => None,
                Value::String(name) => Some(
                    name.parse::<TtyColor>()
                        .map_err(|_| ConfigError::invalid_value(&self.identifier, key, name))?,
                ),
                other => return Err(ConfigError::invalid_value(&self.identifier, key, other)),
            };
            parsed.push((level, color));
        }
        Ok(Some(parsed))
    }
}

impl Appender for ConsoleAppender {
    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn threshold(&self) -> LogLevel {
        self.settings.read().threshold
    }

    fn set_threshold(&self, level: LogLevel) {
        self.settings.write().threshold = level;
    }

    fn configure(&self, options: &ConfigMap) -> Result<(), ConfigError> {
        // Validate everything first so a bad option leaves the appender untouched
        let threshold = level_option(&self.identifier, options, THRESHOLD_LEVEL_KEY)?;
        let error_threshold = level_option(&self.identifier, options, ERROR_THRESHOLD_KEY)?;
        let text_colors = self.color_map_option(options, TEXT_COLORS_KEY)?;
        let background_colors = self.color_map_option(options, BACKGROUND_COLORS_KEY)?;

        let mut settings = self.settings.write();
        if let Some(threshold) = threshold {
            settings.threshold = threshold;
        }
        // An absent key disables error redirection
        settings.error_threshold = error_threshold;

        for (level, color) in text_colors.into_iter().flatten() {
            match color {
                Some(color) => settings.text_colors.insert(level, color),
                None => settings.text_colors.remove(&level),
            };
        }
        for (level, color) in background_colors.into_iter().flatten() {
            match color {
                Some(color) => settings.background_colors.insert(level, color),
                None => settings.background_colors.remove(&level),
            };
        }
        Ok(())
    }

    fn emit(&self, message: &str, level: LogLevel, _info: &LogInfo) {
        let rendered = self.render(message, level);
        let mut line = rendered.text;
        line.push('\n');

        let mut streams = self.streams.lock();
        let stream = streams.select(rendered.destination);
        // Write failures on the console are not recoverable here
        let _ = stream.write_all(line.as_bytes());
        let _ = stream.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct Capture(Arc<parking_lot::Mutex<Vec<u8>>>);

    impl Capture {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().clone()).unwrap()
        }
    }

    impl Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn xterm() -> TerminalEnv {
        TerminalEnv {
            xcode_colors: None,
            term: Some("xterm-256color".to_string()),
        }
    }

    fn debugger() -> TerminalEnv {
        TerminalEnv {
            xcode_colors: Some("YES".to_string()),
            term: None,
        }
    }

    fn captured(env: &TerminalEnv) -> (ConsoleAppender, Capture, Capture) {
        let out = Capture::default();
        let err = Capture::default();
        let streams = ConsoleStreams::new(Box::new(out.clone()), Box::new(err.clone()));
        (ConsoleAppender::with_streams("console", env, streams), out, err)
    }

    fn info(level: LogLevel) -> LogInfo {
        LogInfo::new("test", level)
    }

    fn options(value: serde_json::Value) -> ConfigMap {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_defaults() {
        let appender = ConsoleAppender::with_env("console", &xterm());
        assert_eq!(appender.identifier(), "console");
        assert_eq!(appender.threshold(), LogLevel::Trace);
        assert_eq!(appender.error_threshold(), Some(LogLevel::Error));
        assert_eq!(appender.protocol(), TerminalProtocol::Xterm256);
        assert_eq!(
            ConsoleAppender::with_env("console", &debugger()).protocol(),
            TerminalProtocol::DebuggerRgb
        );
    }

    #[test]
    fn test_no_error_threshold_goes_to_stdout() {
        let (appender, out, err) = captured(&xterm());
        appender.set_error_threshold(None);

        appender.emit("hello", LogLevel::Info, &info(LogLevel::Info));
        appender.emit("fatal", LogLevel::Fatal, &info(LogLevel::Fatal));

        assert_eq!(out.contents(), "hello\nfatal\n");
        assert_eq!(err.contents(), "");
    }

    #[test]
    fn test_error_threshold_routing() {
        let (appender, out, err) = captured(&xterm());
        appender.set_error_threshold(Some(LogLevel::Error));

        appender.emit("boom", LogLevel::Error, &info(LogLevel::Error));
        appender.emit("careful", LogLevel::Warning, &info(LogLevel::Warning));
        appender.emit("dead", LogLevel::Fatal, &info(LogLevel::Fatal));

        assert_eq!(out.contents(), "careful\n");
        assert_eq!(err.contents(), "boom\ndead\n");
    }

    #[test]
    fn test_uncolored_record_has_no_escapes() {
        let (appender, out, _err) = captured(&xterm());
        appender.set_text_color(Some(TtyColor::Red), LogLevel::Error);

        appender.emit("plain", LogLevel::Info, &info(LogLevel::Info));
        assert_eq!(out.contents(), "plain\n");
    }

    #[test]
    fn test_debugger_text_color() {
        let (appender, _out, err) = captured(&debugger());
        appender.set_text_color(Some(TtyColor::Red), LogLevel::Error);

        appender.emit("x", LogLevel::Error, &info(LogLevel::Error));
        assert_eq!(err.contents(), "\x1b[fg255,0,0;x\x1b[;\n");
    }

    #[test]
    fn test_xterm_text_and_background() {
        let appender = ConsoleAppender::with_env("console", &xterm());
        appender.set_text_color(Some(TtyColor::White), LogLevel::Fatal);
        appender.set_background_color(Some(TtyColor::DarkRed), LogLevel::Fatal);

        let rendered = appender.render("down", LogLevel::Fatal);
        assert_eq!(rendered.destination, Destination::Stderr);
        assert_eq!(rendered.text, "\x1b[38;5;15m\x1b[48;5;1mdown\x1b[0m");
    }

    #[test]
    fn test_background_only() {
        let appender = ConsoleAppender::with_env("console", &debugger());
        appender.set_background_color(Some(TtyColor::Blue), LogLevel::Info);

        let rendered = appender.render("note", LogLevel::Info);
        assert_eq!(rendered.destination, Destination::Stdout);
        assert_eq!(rendered.text, "\x1b[bg0,0,255;note\x1b[;");
    }

    #[test]
    fn test_color_removal_round_trip() {
        let appender = ConsoleAppender::with_env("console", &xterm());
        appender.set_text_color(Some(TtyColor::Blue), LogLevel::Info);
        assert_eq!(appender.text_color(LogLevel::Info), Some(TtyColor::Blue));

        appender.set_text_color(None, LogLevel::Info);
        appender.set_text_color(None, LogLevel::Info);
        assert_eq!(appender.text_color(LogLevel::Info), None);
        assert_eq!(appender.render("x", LogLevel::Info).text, "x");
    }

    #[test]
    fn test_color_maps_are_independent() {
        let appender = ConsoleAppender::with_env("console", &xterm());
        appender.set_text_color(Some(TtyColor::Green), LogLevel::Debug);
        appender.set_background_color(Some(TtyColor::Black), LogLevel::Debug);
        appender.set_background_color(None, LogLevel::Debug);

        assert_eq!(appender.text_color(LogLevel::Debug), Some(TtyColor::Green));
        assert_eq!(appender.background_color(LogLevel::Debug), None);
    }

    #[test]
    fn test_configure_error_threshold() {
        let appender = ConsoleAppender::with_env("console", &xterm());

        appender
            .configure(&options(json!({ "ErrorThresholdLevel": "Warning" })))
            .unwrap();
        assert_eq!(appender.error_threshold(), Some(LogLevel::Warning));

        // Absent key clears the threshold
        appender.configure(&options(json!({}))).unwrap();
        assert_eq!(appender.error_threshold(), None);
    }

    #[test]
    fn test_configure_invalid_error_threshold() {
        let appender = ConsoleAppender::with_env("my-console", &xterm());
        appender.set_error_threshold(Some(LogLevel::Fatal));

        let err = appender
            .configure(&options(json!({ "ErrorThresholdLevel": "Severe" })))
            .unwrap_err();
        match &err {
            ConfigError::InvalidConfigurationValue { appender, key, value } => {
                assert_eq!(appender, "my-console");
                assert_eq!(key, ERROR_THRESHOLD_KEY);
                assert_eq!(value, "Severe");
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(appender.error_threshold(), Some(LogLevel::Fatal));
    }

    #[test]
    fn test_configure_threshold_and_colors() {
        let appender = ConsoleAppender::with_env("console", &xterm());
        appender.set_background_color(Some(TtyColor::Grey), LogLevel::Info);

        appender
            .configure(&options(json!({
                "ThresholdLevel": "info",
                "ErrorThresholdLevel": "error",
                "TextColors": { "Error": "red", "Warning": "dark_yellow" },
                "BackgroundColors": { "Info": null },
                "SomethingElse": 42
            })))
            .unwrap();

        assert_eq!(appender.threshold(), LogLevel::Info);
        assert_eq!(appender.text_color(LogLevel::Error), Some(TtyColor::Red));
        assert_eq!(appender.text_color(LogLevel::Warning), Some(TtyColor::DarkYellow));
        assert_eq!(appender.background_color(LogLevel::Info), None);
    }

    #[test]
    fn test_configure_invalid_color_leaves_appender_untouched() {
        let appender = ConsoleAppender::with_env("console", &xterm());

        let result = appender.configure(&options(json!({
            "ThresholdLevel": "fatal",
            "TextColors": { "Error": "ultraviolet" }
        })));

        assert!(result.is_err());
        assert_eq!(appender.threshold(), LogLevel::Trace);
        assert_eq!(appender.error_threshold(), Some(LogLevel::Error));
        assert_eq!(appender.text_color(LogLevel::Error), None);
    }

    #[test]
    fn test_log_applies_appender_threshold() {
        let (appender, out, _err) = captured(&xterm());
        appender.set_threshold(LogLevel::Warning);

        appender.log("dropped", LogLevel::Info, &info(LogLevel::Info));
        appender.log("kept", LogLevel::Warning, &info(LogLevel::Warning));

        assert_eq!(out.contents(), "kept\n");
    }
}

// src/lib.rs
pub mod appender;
pub mod bridge;
pub mod colors;
pub mod config;
pub mod error;
pub mod level;
pub mod logger;
pub mod registry;
pub mod tty;

pub use error::*;

pub use appender::{Appender, ConfigMap, ConsoleAppender, ConsoleStreams, Destination, LogInfo, Rendered};
pub use colors::TtyColor;
pub use config::LoggingConfig;
pub use level::LogLevel;
pub use logger::Logger;
pub use registry::LoggerRegistry;
pub use tty::{TerminalEnv, TerminalProtocol};

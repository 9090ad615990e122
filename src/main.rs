use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::Arc;

use hierlog::appender::console::ERROR_THRESHOLD_KEY;
use hierlog::tty::should_use_colors;
use hierlog::{
    Appender, ConfigMap, ConsoleAppender, LogLevel, LoggerRegistry, LoggingConfig, TerminalEnv,
    TtyColor,
};

#[derive(Debug, Clone, Copy, PartialEq, ValueEnum)]
enum ColorChoice {
    Auto,
    Always,
    Never,
}

#[derive(Parser)]
#[command(name = "hierlog")]
#[command(about = "Log lines through a hierarchical logger registry")]
#[command(version)]
struct Args {
    /// Messages to log (default: one message per stdin line)
    #[arg(value_name = "MESSAGE")]
    messages: Vec<String>,

    /// Logging configuration file (YAML, or JSON with a .json extension)
    #[arg(short = 'c', long = "config")]
    config_file: Option<PathBuf>,

    /// Identifier of the logger to log through
    #[arg(short = 'l', long = "logger", default_value = "app")]
    logger: String,

    /// Level of every logged message
    #[arg(long, default_value = "info")]
    level: LogLevel,

    /// Send records at or above this level to stderr (default console only)
    #[arg(long, value_name = "LEVEL")]
    error_threshold: Option<LogLevel>,

    /// Colorize the default console
    #[arg(long, value_enum, default_value = "auto")]
    color: ColorChoice,

    /// Debug mode - show logger resolution details
    #[arg(long)]
    debug: bool,
}

impl Args {
    fn validate(&self) -> Result<(), String> {
        if self.config_file.is_some() && self.error_threshold.is_some() {
            return Err("Cannot use both --config and --error-threshold".to_string());
        }
        if self.level == LogLevel::Off {
            return Err("Messages cannot be logged at level 'off'".to_string());
        }
        Ok(())
    }

    fn color_preference(&self) -> Option<bool> {
        match self.color {
            ColorChoice::Auto => None,
            ColorChoice::Always => Some(true),
            ColorChoice::Never => Some(false),
        }
    }
}

fn main() {
    let args = Args::parse();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let registry = LoggerRegistry::shared();
    let env = TerminalEnv::from_process();

    if let Some(path) = &args.config_file {
        let config = LoggingConfig::from_path(path)
            .with_context(|| format!("Failed to load configuration '{}'", path.display()))?;
        config
            .apply_with_env(&registry, &env)
            .with_context(|| format!("Invalid configuration '{}'", path.display()))?;
    } else {
        let console = ConsoleAppender::with_env("console", &env);
        let mut options = ConfigMap::new();
        if let Some(level) = args.error_threshold {
            options.insert(ERROR_THRESHOLD_KEY.to_string(), level.as_str().into());
        }
        console.configure(&options)?;
        if should_use_colors(args.color_preference()) {
            apply_default_palette(&console);
        }

        let root = registry.root_logger();
        root.set_threshold(LogLevel::Trace);
        root.add_appender(Arc::new(console));
    }

    if args.logger.is_empty() {
        bail!("Logger identifier cannot be empty");
    }

    let base = registry.resolve_base(&args.logger);
    let logger = registry.get_logger(&args.logger);
    if args.debug {
        eprintln!(
            "hierlog: logger '{}' resolved from '{}'",
            logger.identifier(),
            if base.is_empty() { "<root>" } else { base.as_str() }
        );
        eprintln!(
            "hierlog: threshold {}, {} appender(s)",
            logger.threshold(),
            logger.appenders().len()
        );
    }

    let mut logged = 0usize;
    if args.messages.is_empty() {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let line = line.context("Failed to read stdin")?;
            logger.log(args.level, &line);
            logged += 1;
        }
    } else {
        for message in &args.messages {
            logger.log(args.level, message);
            logged += 1;
        }
    }

    if args.debug {
        eprintln!("hierlog: {} message(s) at level {}", logged, args.level);
    }

    Ok(())
}

fn apply_default_palette(console: &ConsoleAppender) {
    console.set_text_color(Some(TtyColor::DarkGrey), LogLevel::Trace);
    console.set_text_color(Some(TtyColor::Grey), LogLevel::Debug);
    console.set_text_color(Some(TtyColor::DarkYellow), LogLevel::Warning);
    console.set_text_color(Some(TtyColor::Red), LogLevel::Error);
    console.set_text_color(Some(TtyColor::White), LogLevel::Fatal);
    console.set_background_color(Some(TtyColor::DarkRed), LogLevel::Fatal);
}

//! Options and setup shared by the command-line entry points.

use clap::ValueEnum;
use std::io::IsTerminal;

/// Color mode configuration for output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Always use colors
    Always,

    /// Never use colors
    Never,

    /// Use colors if the output is a terminal, otherwise don't use colors
    Auto,
}

/// Log level for diagnostic output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    None,

    /// Only error messages
    Error,

    /// Warning and error messages
    Warn,

    /// Info, warning, and error messages
    Info,

    /// Debug, info, warning, and error messages
    Debug,

    /// Trace, debug, info, warning, and error messages
    Trace,
}

/// How the outcome is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable verdict line
    Console,

    /// A single JSON object
    Json,
}

impl ColorMode {
    /// Resolve against whether stdout is a terminal.
    #[must_use]
    pub fn use_colors(self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => std::io::stdout().is_terminal(),
        }
    }
}

/// Initialize logger based on log level
///
/// `RUST_LOG` takes precedence over `log_level`. Only the first call in a process has any effect.
pub fn init_logging(log_level: LogLevel) {
    let level = match log_level {
        LogLevel::None => "off",
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    };

    let env = env_logger::Env::default().filter_or("RUST_LOG", level);

    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(matches!(log_level, LogLevel::Debug | LogLevel::Trace))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_color_modes() {
        assert!(ColorMode::Always.use_colors());
        assert!(!ColorMode::Never.use_colors());
    }

    #[test]
    fn test_value_names() {
        assert_eq!(LogLevel::from_str("debug", false).unwrap(), LogLevel::Debug);
        assert_eq!(OutputFormat::from_str("json", false).unwrap(), OutputFormat::Json);
        assert_eq!(ColorMode::from_str("auto", false).unwrap(), ColorMode::Auto);
    }
}

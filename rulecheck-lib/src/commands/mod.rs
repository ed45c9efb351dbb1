//! Command-line interface and orchestration for rulecheck
//!
//! This module parses arguments, loads configuration, and drives one rule
//! through the whole pipeline before reporting and choosing the exit code.
//!
//! # Execution Flow
//!
//! 1. Parse arguments and load configuration
//! 2. Load the rule document named by `--input`
//! 3. Build a cluster client from the kubeconfig when the rule needs one
//! 4. Collect inputs, build the evaluation context, compile, and evaluate
//! 5. Render the [`Outcome`](crate::expr::Outcome) and map it to an exit code
//!
//! Failures inside the pipeline become a fatal outcome that is reported like
//! any other. Only problems outside the rule, such as an unreadable
//! configuration file, are returned as errors.

mod check;
mod common;
mod config;
mod host;
mod run;

pub use check::{CheckArgs, check, evaluate_rule};
pub use common::{ColorMode, LogLevel, OutputFormat};
pub use config::{Config, DEFAULT_CONFIG_TOML, FATAL_EXIT_CODE};
pub use host::Host;
pub use run::run;

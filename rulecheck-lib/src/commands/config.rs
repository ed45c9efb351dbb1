use crate::Result;
use crate::expr::Outcome;
use crate::inputs::UnrecognizedInputPolicy;
use camino::Utf8Path;
use core::time::Duration;
use ohno::{IntoAppError, app_err};
use serde::{Deserialize, Serialize};
use std::fs;

/// The default configuration TOML content, embedded from `default_config.toml`
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../../default_config.toml");

/// Exit code for runs that couldn't produce a verdict, and for usage errors.
pub const FATAL_EXIT_CODE: i32 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Whether inputs of unknown types are skipped or rejected
    #[serde(default)]
    pub unrecognized_inputs: UnrecognizedInputPolicy,

    /// Process exit code for a violated rule
    #[serde(default = "default_violated_exit_code")]
    pub violated_exit_code: i32,

    /// Process exit code when the expression reads absent data
    #[serde(default)]
    pub missing_data_exit_code: i32,

    /// Timeout for each cluster API request
    #[serde(default = "default_request_timeout", with = "humantime_serde")]
    pub request_timeout: Duration,
}

const fn default_violated_exit_code() -> i32 {
    1
}

const fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

impl Config {
    /// Load configuration from `config_path`, or use the defaults when no path is given.
    pub fn load(config_path: Option<&Utf8Path>) -> Result<Self> {
        let Some(path) = config_path else {
            return Ok(Self::default());
        };

        let text = fs::read_to_string(path).into_app_err_with(|| format!("reading rulecheck configuration file '{path}'"))?;
        let config: Self = toml::from_str(&text).into_app_err_with(|| format!("parsing configuration file '{path}'"))?;
        config.validate()?;

        log::debug!("loaded configuration from '{path}'");
        Ok(config)
    }

    /// Process exit code for `outcome`.
    #[must_use]
    pub const fn exit_code(&self, outcome: &Outcome) -> i32 {
        match outcome {
            Outcome::Satisfied => 0,
            Outcome::Violated { .. } => self.violated_exit_code,
            Outcome::MissingData { .. } => self.missing_data_exit_code,
            Outcome::Fatal(_) => FATAL_EXIT_CODE,
        }
    }

    fn validate(&self) -> Result<()> {
        for (name, code) in [
            ("violated_exit_code", self.violated_exit_code),
            ("missing_data_exit_code", self.missing_data_exit_code),
        ] {
            if !(0..=255).contains(&code) {
                return Err(app_err!("{name} must be between 0 and 255, got {code}"));
            }

            if code == FATAL_EXIT_CODE {
                return Err(app_err!("{name} cannot be {FATAL_EXIT_CODE}, which is reserved for fatal errors"));
            }
        }

        if self.request_timeout.is_zero() {
            return Err(app_err!("request_timeout must be greater than zero"));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG_TOML).expect("default_config.toml should be valid TOML that deserializes to Config")
    }
}

//! Global configuration parsing and validation.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::request::is_atom;
use crate::{AppError, Result};

/// Default TCP bind address for the relay listener.
fn default_bind_addr() -> String {
    "127.0.0.1:7035".into()
}

/// Default per-line byte bound for all three bridge channels: 1 MiB.
fn default_max_line_bytes() -> usize {
    1_048_576
}

/// One configured backend entry, in either accepted TOML form.
///
/// The structured form names the fields explicitly:
///
/// ```toml
/// backends = [
///     { command = "RUN", argv = ["/bin/cat"] },
/// ]
/// ```
///
/// The compact form is a single `"NAME:prog arg arg"` string, matching the
/// legacy setup syntax, with the argument vector split on spaces:
///
/// ```toml
/// backends = ["STATUS:/usr/bin/uptime -p"]
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum BackendEntry {
    /// Explicit `command` + `argv` table.
    Structured {
        /// Subcommand token the entry answers to.
        command: String,
        /// Program path followed by fixed arguments.
        argv: Vec<String>,
    },
    /// Compact `"NAME:prog arg arg"` string.
    Compact(String),
}

impl BackendEntry {
    /// Resolve the entry into a `(command, argv)` pair.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` for a compact entry without a `:`
    /// separator or with an empty argument vector.
    pub fn resolve(&self) -> Result<(String, Vec<String>)> {
        match self {
            Self::Structured { command, argv } => Ok((command.clone(), argv.clone())),
            Self::Compact(raw) => {
                let Some((command, rest)) = raw.split_once(':') else {
                    return Err(AppError::Config(format!("malformed backend setup: {raw}")));
                };
                let argv: Vec<String> = rest.split_whitespace().map(str::to_owned).collect();
                Ok((command.to_owned(), argv))
            }
        }
    }
}

/// Global configuration parsed from `config.toml`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct GlobalConfig {
    /// TCP address the relay listens on.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    /// Maximum accepted line length on every bridge channel, in bytes.
    #[serde(default = "default_max_line_bytes")]
    pub max_line_bytes: usize,
    /// Configured backend commands, in priority order.
    ///
    /// Duplicate subcommand tokens are allowed; the first configured entry
    /// wins at lookup time.
    pub backends: Vec<BackendEntry>,
}

impl GlobalConfig {
    /// Load and validate configuration from a TOML file path.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the file cannot be read or contains
    /// invalid TOML, or if validation fails.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|err| AppError::Config(format!("failed to read config: {err}")))?;
        Self::from_toml_str(&raw)
    }

    /// Parse configuration from a TOML string and validate it.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if parsing or validation fails.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.max_line_bytes == 0 {
            return Err(AppError::Config(
                "max_line_bytes must be greater than zero".into(),
            ));
        }

        if self.backends.is_empty() {
            return Err(AppError::Config(
                "at least one backend must be configured".into(),
            ));
        }

        for entry in &self.backends {
            let (command, argv) = entry.resolve()?;
            if !is_atom(&command) {
                return Err(AppError::Config(format!(
                    "backend command is not a valid atom: {command}"
                )));
            }
            if argv.is_empty() {
                return Err(AppError::Config(format!(
                    "backend {command} has an empty argument vector"
                )));
            }
        }

        Ok(())
    }
}

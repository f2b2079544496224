//! Backend registry — maps subcommand tokens to configured argument vectors.
//!
//! The registry is built once from [`GlobalConfig`] and passed by reference
//! into each connection handler. It holds no mutable state and performs no
//! I/O; lookup is a pure case-insensitive scan over the configured entries.

use crate::config::GlobalConfig;
use crate::Result;

/// One configured backend: subcommand token plus its argument vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendSpec {
    /// Subcommand token the entry answers to, as configured.
    pub command: String,
    /// Program path followed by fixed arguments.
    pub argv: Vec<String>,
}

/// Ordered collection of configured backends.
#[derive(Debug, Clone, Default)]
pub struct BackendRegistry {
    specs: Vec<BackendSpec>,
}

impl BackendRegistry {
    /// Build a registry from validated configuration, preserving order.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a compact entry fails to resolve;
    /// `GlobalConfig::validate` has normally rejected these already.
    pub fn from_config(config: &GlobalConfig) -> Result<Self> {
        let mut specs = Vec::with_capacity(config.backends.len());
        for entry in &config.backends {
            let (command, argv) = entry.resolve()?;
            specs.push(BackendSpec { command, argv });
        }
        Ok(Self { specs })
    }

    /// Look up the backend for a subcommand token.
    ///
    /// Matching is case-insensitive. When several entries share a token the
    /// first configured one wins.
    #[must_use]
    pub fn lookup(&self, token: &str) -> Option<&BackendSpec> {
        self.specs
            .iter()
            .find(|spec| spec.command.eq_ignore_ascii_case(token))
    }

    /// Subcommand tokens in configured order, for the connection greeting.
    #[must_use]
    pub fn command_names(&self) -> Vec<&str> {
        self.specs.iter().map(|spec| spec.command.as_str()).collect()
    }

    /// Number of configured backends.
    #[must_use]
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// Whether the registry holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

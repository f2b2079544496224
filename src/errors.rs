//! Error types shared across the application.

use std::fmt::{Display, Formatter};

/// Shared application result type.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error enumeration covering all domain failure modes.
///
/// The four request variants (`MalformedRequest`, `InvalidSubcommand`,
/// `UnknownSubcommand`, `InvalidArgument`) are user-input errors detected
/// before any backend process is spawned; their payload is the exact text
/// returned to the client in the terminal `NO` response.
#[derive(Debug)]
pub enum AppError {
    /// Configuration parsing or validation failure.
    Config(String),
    /// Request carries no subcommand token at all.
    MalformedRequest(String),
    /// The subcommand token is not a valid atom.
    InvalidSubcommand(String),
    /// No configured backend matches the subcommand token.
    UnknownSubcommand(String),
    /// A later argument token is not a valid atom.
    InvalidArgument(String),
    /// Resource allocation failure (process spawn, pipe capture).
    Internal(String),
    /// Mid-exchange transport failure (client connection lost, framing).
    Bridge(String),
    /// File-system or I/O operation failure.
    Io(String),
}

impl AppError {
    /// The text sent to the client in the terminal `NO` response.
    ///
    /// Pre-spawn validation errors echo their own message; everything else
    /// collapses to `"Internal failure"` so internal detail never leaks
    /// onto the wire.
    #[must_use]
    pub fn client_text(&self) -> &str {
        match self {
            Self::MalformedRequest(msg)
            | Self::InvalidSubcommand(msg)
            | Self::UnknownSubcommand(msg)
            | Self::InvalidArgument(msg) => msg,
            Self::Config(_) | Self::Internal(_) | Self::Bridge(_) | Self::Io(_) => {
                "Internal failure"
            }
        }
    }
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::MalformedRequest(msg) => write!(f, "malformed request: {msg}"),
            Self::InvalidSubcommand(msg) => write!(f, "invalid subcommand: {msg}"),
            Self::UnknownSubcommand(msg) => write!(f, "unknown subcommand: {msg}"),
            Self::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            Self::Internal(msg) => write!(f, "internal: {msg}"),
            Self::Bridge(msg) => write!(f, "bridge: {msg}"),
            Self::Io(msg) => write!(f, "io: {msg}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(format!("invalid config: {err}"))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

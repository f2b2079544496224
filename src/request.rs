//! Request validation — the pre-spawn contract for bridge invocations.
//!
//! A request is a subcommand token plus an ordered list of argument tokens,
//! already split by the host tokenizer. Every token must be an *atom*: a
//! single unstructured value with no embedded protocol control characters.
//! All failures here occur before any process-level side effect.

use crate::{AppError, Result};

/// Characters that disqualify a token from being an atom: ASCII control
/// characters (including CR, LF, and the 0x05 control marker), the space
/// separator, and the quoted-string and literal syntax characters.
fn is_atom_char(c: char) -> bool {
    !c.is_ascii_control() && c != ' ' && c != '"' && c != '{' && c != '}'
}

/// Whether `token` is a valid atom.
#[must_use]
pub fn is_atom(token: &str) -> bool {
    !token.is_empty() && token.chars().all(is_atom_char)
}

/// A validated bridge request. Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeRequest {
    /// The subcommand token, as received (lookup is case-insensitive).
    pub subcommand: String,
    /// Argument tokens appended verbatim to the backend argument vector.
    pub args: Vec<String>,
}

impl BridgeRequest {
    /// Validate a token sequence into a `BridgeRequest`.
    ///
    /// # Errors
    ///
    /// - `AppError::MalformedRequest` if no token is present.
    /// - `AppError::InvalidSubcommand` if the first token is not an atom.
    /// - `AppError::InvalidArgument` if any later token is not an atom.
    pub fn parse(tokens: &[String]) -> Result<Self> {
        let Some((subcommand, args)) = tokens.split_first() else {
            return Err(AppError::MalformedRequest("Missing subcommand.".into()));
        };

        if !is_atom(subcommand) {
            return Err(AppError::InvalidSubcommand("Invalid subcommand.".into()));
        }

        if !args.iter().all(|arg| is_atom(arg)) {
            return Err(AppError::InvalidArgument("Invalid arguments.".into()));
        }

        Ok(Self {
            subcommand: subcommand.clone(),
            args: args.to_vec(),
        })
    }

    /// The `UnknownSubcommand` error for this request, echoing the
    /// uppercased token.
    #[must_use]
    pub fn unknown_subcommand_error(&self) -> AppError {
        AppError::UnknownSubcommand(format!(
            "Unknown {} subcommand.",
            self.subcommand.to_ascii_uppercase()
        ))
    }
}

//! Client-facing responses and their wire rendering.
//!
//! The bridge emits [`Reply`] values through an mpsc channel; the server's
//! writer task renders each to one wire line. Only [`Reply::Done`] and
//! [`Reply::Fail`] are terminal — everything else is informational and a
//! client that has not yet seen a terminal reply knows the exchange is
//! still in progress.

use crate::bridge::ExitOutcome;

/// Fixed text of the terminal success response.
pub const DONE_TEXT: &str = "command exited successfully";

/// Fixed text of the terminal backend-failure response.
pub const FAIL_TEXT: &str = "command failed";

/// One response line to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Credit-grant acknowledgement: ready for one more input line.
    Continue,
    /// Non-terminal backend stdout line, forwarded verbatim.
    Info(String),
    /// Non-terminal backend stderr line, forwarded verbatim.
    Warn(String),
    /// Terminal success response.
    Done(String),
    /// Terminal failure response (backend failure or validation error).
    Fail(String),
}

impl Reply {
    /// The terminal reply for a backend exit outcome.
    #[must_use]
    pub fn from_outcome(outcome: ExitOutcome) -> Self {
        match outcome {
            ExitOutcome::Success => Self::Done(DONE_TEXT.into()),
            ExitOutcome::Failure => Self::Fail(FAIL_TEXT.into()),
        }
    }

    /// Whether this reply completes the exchange.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done(_) | Self::Fail(_))
    }

    /// Render the reply as one wire line, without the trailing newline.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Continue => "+ OK".into(),
            Self::Info(text) => format!("* OK {text}"),
            Self::Warn(text) => format!("* NO {text}"),
            Self::Done(text) => format!("OK {text}"),
            Self::Fail(text) => format!("NO {text}"),
        }
    }
}

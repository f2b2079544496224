#![forbid(unsafe_code)]

//! `exec-relay` — line-oriented subprocess relay.
//!
//! Clients send `EXEC <subcommand> [args…]` over a line-based TCP
//! connection; the server spawns the configured backend with its stdio
//! piped and bridges it to the client until it exits, with credit-based
//! flow control over the client's input lines.

pub mod bridge;
pub mod config;
pub mod errors;
pub mod registry;
pub mod reply;
pub mod request;
pub mod server;

pub use config::GlobalConfig;
pub use errors::{AppError, Result};

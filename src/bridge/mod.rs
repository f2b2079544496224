//! The subprocess bridge: line codec, process launcher, credit-controlled
//! forwarding loop, and exit reporting.
//!
//! One bridge invocation is a synchronous exchange from the caller's point
//! of view: spawn the backend, run [`run::run_bridge`] until the backend
//! closes both stdout and stderr, then reap it with [`exit::wait_for_exit`].
//! The loop multiplexes three line streams and enforces the credit rule:
//! the client supplies input only when, and as often as, the backend has
//! asked for it with the control marker.

pub mod codec;
pub mod exit;
pub mod launcher;
pub mod run;
pub mod session;

pub use codec::LineCodec;
pub use exit::{wait_for_exit, ExitOutcome};
pub use launcher::{spawn_backend, BackendProcess};
pub use run::{run_bridge, CONTROL_MARKER};
pub use session::BridgeSession;

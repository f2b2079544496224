//! Live state of one bridge invocation.
//!
//! `BridgeSession` is the explicit state machine behind the forwarding
//! loop: the credit counter, the open/closed flags for the two backend
//! output streams, and the single-slot lookahead for client input that
//! arrived ahead of its credit. It is owned exclusively by the loop for
//! the lifetime of one invocation.

/// Credit and stream state for one bridge exchange.
#[derive(Debug)]
pub struct BridgeSession {
    /// Outstanding line credits: how many client lines the backend has
    /// asked for and not yet received. Never negative.
    pub requested_lines: u64,
    /// Backend stdout has not yet reached end-of-stream.
    pub stdout_open: bool,
    /// Backend stderr has not yet reached end-of-stream.
    pub stderr_open: bool,
    /// The client input channel has reached end-of-stream.
    pub client_eof: bool,
    /// One complete client line received before its credit was granted.
    /// Forwarded as soon as credit arrives, never forwarded unsolicited.
    /// If the backend exits without granting the credit, the line is
    /// handed back to the caller instead of being dropped.
    pub pending_line: Option<String>,
    granted: u64,
    forwarded: u64,
}

impl BridgeSession {
    /// Fresh session: zero credit, both backend streams open.
    #[must_use]
    pub fn new() -> Self {
        Self {
            requested_lines: 0,
            stdout_open: true,
            stderr_open: true,
            client_eof: false,
            pending_line: None,
            granted: 0,
            forwarded: 0,
        }
    }

    /// Record one credit grant (a control-marker line from the backend).
    pub fn grant_credit(&mut self) {
        self.requested_lines += 1;
        self.granted += 1;
    }

    /// Record one client line forwarded to the backend.
    pub fn consume_credit(&mut self) {
        debug_assert!(self.requested_lines > 0, "credit underflow");
        self.requested_lines = self.requested_lines.saturating_sub(1);
        self.forwarded += 1;
    }

    /// The loop's continuation predicate: at least one backend output
    /// stream is still open.
    #[must_use]
    pub fn streams_open(&self) -> bool {
        self.stdout_open || self.stderr_open
    }

    /// Whether the client input channel should be polled.
    ///
    /// True while the backend's stdin is still held, the client has not
    /// hung up, and either credit is outstanding or the lookahead slot is
    /// free. The slot bounds unsolicited buffering at one line; hang-up
    /// detection is why polling continues at zero credit.
    #[must_use]
    pub fn wants_client_input(&self, stdin_held: bool) -> bool {
        stdin_held && !self.client_eof && (self.requested_lines > 0 || self.pending_line.is_none())
    }

    /// Total credits granted since session start.
    #[must_use]
    pub fn granted(&self) -> u64 {
        self.granted
    }

    /// Total client lines forwarded since session start. Never exceeds
    /// [`Self::granted`].
    #[must_use]
    pub fn forwarded(&self) -> u64 {
        self.forwarded
    }
}

impl Default for BridgeSession {
    fn default() -> Self {
        Self::new()
    }
}

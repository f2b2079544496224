//! The bridge forwarding loop.
//!
//! A private readiness loop scoped to one invocation, multiplexing backend
//! stdout, backend stderr, and (credit-gated) client input. The caller
//! sees it as a single blocking call that returns once the backend has
//! closed both output streams; reaping the process is the exit reporter's
//! job, after the loop.
//!
//! # Protocol
//!
//! - A stdout line equal to [`CONTROL_MARKER`] is a line-credit request:
//!   the client receives [`Reply::Continue`] and one credit is granted.
//! - Any other stdout line is forwarded as [`Reply::Info`].
//! - Any stderr line is forwarded as [`Reply::Warn`].
//! - While credit is outstanding, client lines are written verbatim to the
//!   backend's stdin, one `\n`-terminated line per credit.
//!
//! Per-channel line order is preserved; ordering across channels follows
//! whatever the multiplexer reports ready and is deliberately unspecified.

use futures_util::StreamExt;
use tokio::io::{AsyncRead, AsyncWriteExt};
use tokio::process::{Child, ChildStdin};
use tokio::sync::mpsc;
use tokio_util::codec::FramedRead;
use tracing::{debug, warn};

use crate::bridge::codec::LineCodec;
use crate::bridge::launcher::BackendProcess;
use crate::bridge::session::BridgeSession;
use crate::reply::Reply;
use crate::{AppError, Result};

/// The reserved control-marker line: a single ENQ byte on backend stdout
/// requests one line of client input.
pub const CONTROL_MARKER: &str = "\u{5}";

/// Run the bridge loop for one launched backend.
///
/// Returns the child handle for reaping once both backend output streams
/// have reached end-of-stream, plus at most one client line that was read
/// ahead of a credit grant that never came. That line was never delivered
/// to the backend; the caller owns routing it (for a connection, it is the
/// next request line). The loop never exits early on malformed lines,
/// single-stream closure, or outstanding credit.
///
/// Client hang-up (end-of-stream on `client_input`) closes the backend's
/// stdin so non-participating backends observe end of input; it does not
/// terminate the loop.
///
/// # Errors
///
/// Returns `AppError::Bridge` if a reply can no longer be delivered (the
/// client connection is gone). The backend is killed before returning;
/// nothing is left running on the error path.
pub async fn run_bridge<R>(
    backend: BackendProcess,
    client_input: &mut FramedRead<R, LineCodec>,
    reply_tx: &mpsc::Sender<Reply>,
) -> Result<(Child, Option<String>)>
where
    R: AsyncRead + Unpin + Send,
{
    let BackendProcess {
        mut child,
        stdin,
        mut stdout,
        mut stderr,
    } = backend;
    let mut stdin = Some(stdin);

    match drive(&mut stdin, &mut stdout, &mut stderr, client_input, reply_tx).await {
        Ok(mut session) => {
            debug!(
                granted = session.granted(),
                forwarded = session.forwarded(),
                "bridge loop finished, both backend streams closed"
            );
            Ok((child, session.pending_line.take()))
        }
        Err(err) => {
            warn!(%err, "bridge aborted, killing backend");
            child.start_kill().ok();
            Err(err)
        }
    }
}

/// The readiness loop proper. Runs until both backend streams close.
async fn drive<R>(
    stdin: &mut Option<ChildStdin>,
    stdout: &mut FramedRead<tokio::process::ChildStdout, LineCodec>,
    stderr: &mut FramedRead<tokio::process::ChildStderr, LineCodec>,
    client_input: &mut FramedRead<R, LineCodec>,
    reply_tx: &mpsc::Sender<Reply>,
) -> Result<BridgeSession>
where
    R: AsyncRead + Unpin + Send,
{
    let mut session = BridgeSession::new();

    while session.streams_open() {
        tokio::select! {
            item = stdout.next(), if session.stdout_open => {
                handle_stdout(item, &mut session, stdin, reply_tx).await?;
            }

            item = stderr.next(), if session.stderr_open => {
                handle_stderr(item, &mut session, reply_tx).await?;
            }

            item = client_input.next(), if session.wants_client_input(stdin.is_some()) => {
                handle_client(item, &mut session, stdin).await;
            }
        }
    }

    Ok(session)
}

/// Process one backend-stdout readiness result.
async fn handle_stdout(
    item: Option<Result<String>>,
    session: &mut BridgeSession,
    stdin: &mut Option<ChildStdin>,
    reply_tx: &mpsc::Sender<Reply>,
) -> Result<()> {
    match item {
        None => {
            debug!("backend stdout reached end-of-stream");
            session.stdout_open = false;
        }
        Some(Err(AppError::Bridge(msg))) => {
            // Framing error (oversized line) — skip, keep the stream.
            warn!(error = msg.as_str(), "backend stdout framing error, skipping");
        }
        Some(Err(err)) => {
            warn!(%err, "backend stdout read error, treating as closed");
            session.stdout_open = false;
        }
        Some(Ok(line)) if line == CONTROL_MARKER => {
            send_reply(reply_tx, Reply::Continue).await?;
            session.grant_credit();
            debug!(
                requested_lines = session.requested_lines,
                "backend requested a client line"
            );
            // A line that arrived ahead of its credit is forwarded now.
            if let Some(pending) = session.pending_line.take() {
                forward_line(stdin, &pending).await;
                session.consume_credit();
            }
        }
        Some(Ok(line)) => {
            send_reply(reply_tx, Reply::Info(line)).await?;
        }
    }
    Ok(())
}

/// Process one backend-stderr readiness result.
async fn handle_stderr(
    item: Option<Result<String>>,
    session: &mut BridgeSession,
    reply_tx: &mpsc::Sender<Reply>,
) -> Result<()> {
    match item {
        None => {
            debug!("backend stderr reached end-of-stream");
            session.stderr_open = false;
        }
        Some(Err(AppError::Bridge(msg))) => {
            warn!(error = msg.as_str(), "backend stderr framing error, skipping");
        }
        Some(Err(err)) => {
            warn!(%err, "backend stderr read error, treating as closed");
            session.stderr_open = false;
        }
        Some(Ok(line)) => {
            send_reply(reply_tx, Reply::Warn(line)).await?;
        }
    }
    Ok(())
}

/// Process one client-input readiness result.
///
/// A line arriving with credit outstanding is forwarded immediately; a
/// line arriving without credit parks in the session's single lookahead
/// slot. End-of-stream drops the backend's stdin handle, delivering EOF
/// to the backend.
async fn handle_client(
    item: Option<Result<String>>,
    session: &mut BridgeSession,
    stdin: &mut Option<ChildStdin>,
) {
    match item {
        None => {
            debug!("client input reached end-of-stream, closing backend stdin");
            session.client_eof = true;
            stdin.take();
        }
        Some(Err(err)) => {
            warn!(%err, "client input error, closing backend stdin");
            session.client_eof = true;
            stdin.take();
        }
        Some(Ok(line)) => {
            if session.requested_lines > 0 {
                forward_line(stdin, &line).await;
                session.consume_credit();
            } else {
                debug!("client line arrived before credit, holding");
                session.pending_line = Some(line);
            }
        }
    }
}

/// Write one `\n`-terminated line to the backend's stdin and flush.
///
/// A write failure means the backend stopped reading (it may already have
/// exited); the handle is dropped and the exchange continues — backend
/// failures are data, not bridge faults.
async fn forward_line(stdin: &mut Option<ChildStdin>, line: &str) {
    let Some(handle) = stdin.as_mut() else {
        return;
    };

    let result = async {
        handle.write_all(line.as_bytes()).await?;
        handle.write_all(b"\n").await?;
        handle.flush().await
    }
    .await;

    if let Err(err) = result {
        warn!(%err, "write to backend stdin failed, closing it");
        stdin.take();
    }
}

/// Deliver one reply to the client, mapping a closed channel to the fatal
/// connection-lost error.
async fn send_reply(reply_tx: &mpsc::Sender<Reply>, reply: Reply) -> Result<()> {
    reply_tx
        .send(reply)
        .await
        .map_err(|_| AppError::Bridge("client connection lost".into()))
}

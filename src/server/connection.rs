//! Per-connection request handling.
//!
//! One connection carries a greeting, then a sequence of request lines of
//! the form `EXEC <subcommand> [args…]`, each answered by zero or more
//! non-terminal replies and exactly one terminal reply. Replies flow
//! through an mpsc channel drained by a dedicated writer task, so the
//! bridge core never touches the socket.
//!
//! The read half is framed once and reused for both request lines and the
//! bridge's client input: any input the client sent ahead of the exchange
//! is already sitting in the frame buffer and is delivered to the bridge
//! rather than dropped.

use std::net::SocketAddr;

use futures_util::{SinkExt, StreamExt};
use tokio::io::AsyncRead;
use tokio::net::tcp::OwnedWriteHalf;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_util::codec::{FramedRead, FramedWrite};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::bridge::{run_bridge, spawn_backend, wait_for_exit, LineCodec};
use crate::config::GlobalConfig;
use crate::registry::BackendRegistry;
use crate::reply::Reply;
use crate::request::BridgeRequest;
use crate::{AppError, Result};

/// Depth of the per-connection reply channel.
const REPLY_CHANNEL_CAPACITY: usize = 64;

/// Serve one client connection until it closes or shutdown is requested.
///
/// # Errors
///
/// Returns `AppError::Bridge` if the client connection is lost while an
/// exchange is in flight.
pub async fn handle_connection(
    socket: TcpStream,
    peer: SocketAddr,
    config: &GlobalConfig,
    registry: &BackendRegistry,
    cancel: CancellationToken,
) -> Result<()> {
    info!(%peer, "client connected");

    let (read_half, write_half) = socket.into_split();
    let mut frames = FramedRead::new(read_half, LineCodec::new(config.max_line_bytes));
    let (reply_tx, reply_rx) = mpsc::channel::<Reply>(REPLY_CHANNEL_CAPACITY);
    let writer = tokio::spawn(write_replies(write_half, reply_rx));

    let greeting = format!("exec-relay ready: {}", registry.command_names().join(" "));
    let result = async {
        send(&reply_tx, Reply::Info(greeting)).await?;

        loop {
            tokio::select! {
                () = cancel.cancelled() => {
                    debug!(%peer, "shutdown requested, closing connection");
                    break;
                }

                item = frames.next() => {
                    match item {
                        None => break,
                        Some(Err(err)) => {
                            warn!(%peer, %err, "unreadable request line");
                            send(&reply_tx, Reply::Fail("Invalid request line.".into())).await?;
                        }
                        Some(Ok(line)) => {
                            // An exchange may hand back one client line it
                            // read ahead of a credit that never came; that
                            // line is the next request.
                            let mut next = Some(line);
                            while let Some(request) = next.take() {
                                next = dispatch(&request, config, registry, &mut frames, &reply_tx)
                                    .await?;
                            }
                        }
                    }
                }
            }
        }

        Ok(())
    }
    .await;

    // Close the channel so the writer drains and exits.
    drop(reply_tx);
    writer.await.ok();
    info!(%peer, "client disconnected");
    result
}

/// Parse one request line and run the exchange it names.
///
/// Returns a client line the exchange read but never consumed, to be
/// treated as the next request line.
async fn dispatch<R>(
    line: &str,
    config: &GlobalConfig,
    registry: &BackendRegistry,
    client_input: &mut FramedRead<R, LineCodec>,
    reply_tx: &mpsc::Sender<Reply>,
) -> Result<Option<String>>
where
    R: AsyncRead + Unpin + Send,
{
    let tokens: Vec<String> = line.split_ascii_whitespace().map(str::to_owned).collect();
    let Some((verb, rest)) = tokens.split_first() else {
        // Blank line between requests — ignore.
        return Ok(None);
    };

    if !verb.eq_ignore_ascii_case("EXEC") {
        send(reply_tx, Reply::Fail("Unknown command.".into())).await?;
        return Ok(None);
    }

    match run_exchange(rest, config, registry, client_input, reply_tx).await {
        Ok((terminal, leftover)) => {
            send(reply_tx, terminal).await?;
            Ok(leftover)
        }
        // The client is gone; tear the connection down.
        Err(err @ AppError::Bridge(_)) => Err(err),
        // Everything else is a terminal failure reply, connection stays up.
        Err(err) => {
            debug!(%err, "exchange failed before completion");
            send(reply_tx, Reply::Fail(err.client_text().into())).await?;
            Ok(None)
        }
    }
}

/// One full bridge exchange: validate, look up, spawn, bridge, reap.
///
/// Validation and lookup failures return before any process is started.
async fn run_exchange<R>(
    tokens: &[String],
    config: &GlobalConfig,
    registry: &BackendRegistry,
    client_input: &mut FramedRead<R, LineCodec>,
    reply_tx: &mpsc::Sender<Reply>,
) -> Result<(Reply, Option<String>)>
where
    R: AsyncRead + Unpin + Send,
{
    let request = BridgeRequest::parse(tokens)?;
    let spec = registry
        .lookup(&request.subcommand)
        .ok_or_else(|| request.unknown_subcommand_error())?;

    let backend = spawn_backend(spec, &request.args, config.max_line_bytes)?;
    let (child, leftover) = run_bridge(backend, client_input, reply_tx).await?;
    Ok((Reply::from_outcome(wait_for_exit(child).await), leftover))
}

/// Writer task: render and write replies until the channel closes.
///
/// A write failure means the client hung up; remaining replies are
/// dropped and the bridge notices through its own send failure.
async fn write_replies(write_half: OwnedWriteHalf, mut reply_rx: mpsc::Receiver<Reply>) {
    let mut framed = FramedWrite::new(write_half, LineCodec::default());

    while let Some(reply) = reply_rx.recv().await {
        if let Err(err) = framed.send(reply.render()).await {
            debug!(%err, "reply write failed, dropping remaining replies");
            break;
        }
    }
}

/// Queue one reply, mapping a closed channel to the connection-lost error.
async fn send(reply_tx: &mpsc::Sender<Reply>, reply: Reply) -> Result<()> {
    reply_tx
        .send(reply)
        .await
        .map_err(|_| AppError::Bridge("client connection lost".into()))
}

//! Backend process launcher.
//!
//! Spawns the configured backend executable with all three stdio handles
//! piped and `kill_on_drop(true)`, so no process outlives an error path.
//! The parent keeps exactly three channel ends: a write handle to the
//! backend's stdin and framed line readers over its stdout and stderr.

use std::process::Stdio;

use tokio::process::{Child, ChildStderr, ChildStdin, ChildStdout, Command};
use tokio_util::codec::FramedRead;
use tracing::info;

use crate::bridge::codec::LineCodec;
use crate::registry::BackendSpec;
use crate::{AppError, Result};

/// A launched backend and the parent's three ends of its stdio pipes.
///
/// stdout and stderr arrive pre-framed with [`LineCodec`]; partial reads
/// accumulate inside the frame buffers and surface only as complete lines.
#[derive(Debug)]
pub struct BackendProcess {
    /// Child handle — kept alive so `kill_on_drop` works and the exit
    /// reporter can reap it.
    pub child: Child,
    /// Write channel to the backend's stdin.
    pub stdin: ChildStdin,
    /// Framed line reader over the backend's stdout.
    pub stdout: FramedRead<ChildStdout, LineCodec>,
    /// Framed line reader over the backend's stderr.
    pub stderr: FramedRead<ChildStderr, LineCodec>,
}

/// Spawn the backend for one bridge invocation.
///
/// The full argument vector is the configured `argv` followed by the
/// request's argument tokens, appended verbatim. A failure to execute the
/// target inside the spawned process is fatal to that process only and
/// surfaces later as an abnormal exit status.
///
/// # Errors
///
/// Returns `AppError::Internal` if the spawn itself fails or a stdio
/// handle cannot be captured. On every error path the child (if any) is
/// dropped with `kill_on_drop`, leaving nothing half-open behind.
pub fn spawn_backend(
    spec: &BackendSpec,
    request_args: &[String],
    max_line_bytes: usize,
) -> Result<BackendProcess> {
    // validate() guarantees a non-empty argv for configured specs.
    let (program, fixed_args) = spec
        .argv
        .split_first()
        .ok_or_else(|| AppError::Internal(format!("backend {} has no argv", spec.command)))?;

    let mut cmd = Command::new(program);
    cmd.args(fixed_args)
        .args(request_args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd
        .spawn()
        .map_err(|err| AppError::Internal(format!("failed to spawn backend: {err}")))?;

    let stdin = child
        .stdin
        .take()
        .ok_or_else(|| AppError::Internal("failed to capture backend stdin".into()))?;
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| AppError::Internal("failed to capture backend stdout".into()))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| AppError::Internal("failed to capture backend stderr".into()))?;

    info!(
        command = %spec.command,
        program = %program,
        pid = child.id().unwrap_or(0),
        "backend process spawned"
    );

    Ok(BackendProcess {
        child,
        stdin,
        stdout: FramedRead::new(stdout, LineCodec::new(max_line_bytes)),
        stderr: FramedRead::new(stderr, LineCodec::new(max_line_bytes)),
    })
}

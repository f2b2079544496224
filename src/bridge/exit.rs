//! Backend termination and exit-status mapping.

use tokio::process::Child;
use tracing::info;

/// Result of backend process termination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitOutcome {
    /// Normal exit with status 0.
    Success,
    /// Nonzero exit status, signal termination, or an unobservable status.
    Failure,
}

/// Reap the backend and map its exit status.
///
/// Awaiting here is safe because the bridge loop has already drained and
/// closed both backend output pipes. An error from the wait itself is
/// reported as [`ExitOutcome::Failure`] — backend trouble never escalates
/// into a server fault.
pub async fn wait_for_exit(mut child: Child) -> ExitOutcome {
    match child.wait().await {
        Ok(status) if status.success() => {
            info!("backend exited successfully");
            ExitOutcome::Success
        }
        Ok(status) => {
            let detail = status.code().map_or_else(
                || "terminated by signal".to_owned(),
                |code| format!("exited with code {code}"),
            );
            info!(status = %detail, "backend failed");
            ExitOutcome::Failure
        }
        Err(err) => {
            info!(%err, "failed to reap backend, reporting failure");
            ExitOutcome::Failure
        }
    }
}

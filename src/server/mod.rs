//! TCP server surface.
//!
//! Thin host glue around the bridge core: a listener accepting line-based
//! client connections, and a per-connection handler that parses request
//! lines and drives one bridge exchange at a time.

pub mod connection;

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::GlobalConfig;
use crate::registry::BackendRegistry;
use crate::{AppError, Result};

/// A bound relay server, ready to accept connections.
#[derive(Debug)]
pub struct Server {
    listener: TcpListener,
    config: Arc<GlobalConfig>,
    registry: Arc<BackendRegistry>,
}

impl Server {
    /// Bind the listener on the configured address.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the address cannot be bound.
    pub async fn bind(config: Arc<GlobalConfig>, registry: Arc<BackendRegistry>) -> Result<Self> {
        let listener = TcpListener::bind(&config.bind_addr).await.map_err(|err| {
            AppError::Config(format!("failed to bind {}: {err}", config.bind_addr))
        })?;
        Ok(Self {
            listener,
            config,
            registry,
        })
    }

    /// The actual bound address (relevant when configured with port 0).
    ///
    /// # Errors
    ///
    /// Returns `AppError::Io` if the local address cannot be queried.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept connections until the cancellation token fires.
    ///
    /// Each connection gets its own task; a handler failure is logged and
    /// never brings the listener down. Cancellation is observed between
    /// accepts — an exchange already in flight runs to its own completion.
    pub async fn run(self, cancel: CancellationToken) {
        info!(addr = %self.config.bind_addr, "exec-relay listening");

        loop {
            tokio::select! {
                () = cancel.cancelled() => {
                    info!("listener shutting down");
                    break;
                }

                accepted = self.listener.accept() => {
                    match accepted {
                        Ok((socket, peer)) => {
                            let config = Arc::clone(&self.config);
                            let registry = Arc::clone(&self.registry);
                            let cancel = cancel.clone();
                            tokio::spawn(async move {
                                if let Err(err) = connection::handle_connection(
                                    socket, peer, &config, &registry, cancel,
                                )
                                .await
                                {
                                    warn!(%peer, %err, "connection handler failed");
                                }
                            });
                        }
                        Err(err) => {
                            warn!(%err, "accept failed");
                        }
                    }
                }
            }
        }
    }
}

//! # Server Lifecycle
//!
//! Binds the router to a socket and hands back a handle that can stop it.
//! Port `0` asks the OS for an ephemeral port; [`ProxyServer::port`]
//! reports the one actually bound so the caller can point build tooling
//! at it.

use std::future::Future;
use std::io;
use std::net::SocketAddr;

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::state::AppState;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] io::Error),

    #[error("server task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// A running proxy. Dropping the handle leaves the server running; call
/// [`stop`](Self::stop) to shut it down.
#[derive(Debug)]
pub struct ProxyServer {
    local_addr: SocketAddr,
    shutdown: CancellationToken,
    task: JoinHandle<io::Result<()>>,
}

impl ProxyServer {
    /// Bind `addr` and start serving on the current runtime.
    pub async fn start(state: AppState, addr: SocketAddr) -> Result<Self, ServerError> {
        let bind_err = |source| ServerError::Bind { addr, source };
        let listener = TcpListener::bind(addr).await.map_err(bind_err)?;
        let local_addr = listener.local_addr().map_err(bind_err)?;

        let shutdown = CancellationToken::new();
        let signal = shutdown.clone();
        let router = crate::app(state);
        let task = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async move {
                    signal.cancelled().await;
                })
                .await
        });

        tracing::info!(addr = %local_addr, "resolver proxy started on port {}", local_addr.port());
        Ok(Self {
            local_addr,
            shutdown,
            task,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn port(&self) -> u16 {
        self.local_addr.port()
    }

    /// Stop accepting connections, let in-flight requests finish, and wait
    /// for the server task.
    pub async fn stop(self) -> Result<(), ServerError> {
        self.shutdown.cancel();
        self.task.await?.map_err(ServerError::Serve)?;
        tracing::info!(addr = %self.local_addr, "resolver proxy stopped");
        Ok(())
    }

    /// Serve until `signal` resolves, then stop.
    pub async fn run_until<F>(state: AppState, addr: SocketAddr, signal: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()>,
    {
        let server = Self::start(state, addr).await?;
        signal.await;
        server.stop().await
    }
}

//! `BridgeContext`: the explicit, injected replacement for the original's
//! file-scope global pool/bootstrap state.
//!
//! One `BridgeContext` is created per process by [`BridgeContext::bootstrap`],
//! called exactly once by the system channel's chain before any chain
//! (system or not) registers. Every chain then holds a cheap `Arc` clone.

use crate::connection::IpcConnection;
use crate::error::{IpcError, Result};
use crate::pool::SendPool;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// How long to sleep between ready-marker polls.
pub const READY_MARKER_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// The shared state bootstrapped once by the system channel and reused by
/// every chain in the process.
pub struct BridgeContext {
    control: Mutex<IpcConnection>,
    send_pool: SendPool,
    recv_port: u16,
    unix_socket_path: PathBuf,
    ready_marker_path: PathBuf,
    bootstrapped: AtomicBool,
}

impl BridgeContext {
    /// Runs the system channel's one-time bootstrap: waits for the ready
    /// marker, deletes it, dials the control connection, then dials
    /// `pool_size` more connections for the send pool.
    ///
    /// # Errors
    ///
    /// Returns [`IpcError::Dial`] if any dial fails; that failure is
    /// bootstrap-fatal.
    pub async fn bootstrap(
        unix_socket_path: PathBuf,
        recv_port: u16,
        ready_marker_path: PathBuf,
        pool_size: usize,
    ) -> Result<Arc<Self>> {
        Self::wait_for_ready_marker(&ready_marker_path).await;
        Self::remove_ready_marker(&ready_marker_path);

        let control = IpcConnection::dial(&unix_socket_path).await?;
        info!(path = %unix_socket_path.display(), "dialed control connection");

        let mut connections = Vec::with_capacity(pool_size);
        for _ in 0..pool_size {
            connections.push(IpcConnection::dial(&unix_socket_path).await?);
        }
        info!(pool_size, "dialed send pool");

        Ok(Arc::new(Self {
            control: Mutex::new(control),
            send_pool: SendPool::new(connections),
            recv_port,
            unix_socket_path,
            ready_marker_path,
            bootstrapped: AtomicBool::new(true),
        }))
    }

    /// Polls for the ready-marker file, sleeping
    /// [`READY_MARKER_POLL_INTERVAL`] between checks, with no timeout.
    async fn wait_for_ready_marker(path: &Path) {
        while !path.exists() {
            tokio::time::sleep(READY_MARKER_POLL_INTERVAL).await;
        }
    }

    /// Deletes the ready-marker file; a missing file is logged and
    /// ignored.
    fn remove_ready_marker(path: &Path) {
        if let Err(e) = std::fs::remove_file(path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %path.display(), error = %e, "failed to remove ready marker");
            } else {
                debug!(path = %path.display(), "ready marker already gone");
            }
        }
    }

    /// Whether this context has completed bootstrap. Always `true` once
    /// constructed — retained as the one-shot latch the process relies on.
    #[must_use]
    pub fn is_bootstrapped(&self) -> bool {
        self.bootstrapped.load(Ordering::Acquire)
    }

    /// The configured send pool.
    #[must_use]
    pub fn send_pool(&self) -> &SendPool {
        &self.send_pool
    }

    /// Dials this chain's inbound block stream on the receive TCP
    /// endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`IpcError::Dial`] if the connection cannot be established.
    pub async fn dial_receive_endpoint(&self) -> Result<TcpStream> {
        let addr = format!("localhost:{}", self.recv_port);
        TcpStream::connect(&addr)
            .await
            .map_err(|e| IpcError::Dial(addr, e))
    }

    /// Registers `channel_id` on the control connection: `channelID`
    /// (string) then `batchTimeout` nanoseconds (u64).
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub async fn register_channel(&self, channel_id: &str, batch_timeout_ns: u64) -> Result<()> {
        let mut control = self.control.lock().await;
        control
            .write_registration(channel_id, batch_timeout_ns)
            .await
    }

    /// The configured receive port.
    #[must_use]
    pub fn recv_port(&self) -> u16 {
        self.recv_port
    }

    /// The control/pool Unix-domain socket path.
    #[must_use]
    pub fn unix_socket_path(&self) -> &Path {
        &self.unix_socket_path
    }

    /// The ready-marker filesystem path.
    #[must_use]
    pub fn ready_marker_path(&self) -> &Path {
        &self.ready_marker_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;
    use tokio::net::UnixListener;

    #[tokio::test]
    async fn bootstrap_waits_for_ready_marker_then_dials() {
        let dir = tempdir().unwrap();
        let socket_path = dir.path().join("control.sock");
        let marker_path = dir.path().join("engine.ready");

        let listener = UnixListener::bind(&socket_path).unwrap();
        let accept_count = 3; // control + 2 pool slots
        let acceptor = tokio::spawn(async move {
            for _ in 0..accept_count {
                let _ = listener.accept().await.unwrap();
            }
        });

        let bootstrap = tokio::spawn(BridgeContext::bootstrap(
            socket_path,
            0,
            marker_path.clone(),
            2,
        ));

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!bootstrap.is_finished());

        fs::write(&marker_path, b"ready").unwrap();

        let ctx = bootstrap.await.unwrap().unwrap();
        acceptor.await.unwrap();

        assert!(ctx.is_bootstrapped());
        assert_eq!(ctx.send_pool().len(), 2);
        assert!(!marker_path.exists());
    }

    #[tokio::test]
    async fn missing_ready_marker_delete_is_tolerated() {
        let dir = tempdir().unwrap();
        BridgeContext::remove_ready_marker(&dir.path().join("does-not-exist"));
    }
}

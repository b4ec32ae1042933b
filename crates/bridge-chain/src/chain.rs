//! Chain pipeline: per-channel submit path, receive path, and
//! append loop.

use crate::error::{ChainError, Result};
use crate::ledger::LedgerAppender;
use crate::metrics::ChainMetrics;
use bridge_ipc::{codec, BridgeContext};
use bridge_types::{Block, BlockType, ChannelId, Envelope};
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// A chain's lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainState {
    /// Constructed but not yet started.
    Created,
    /// The system channel's one-time bootstrap is in flight.
    Bootstrapping,
    /// Receive and append loops are running.
    Running,
    /// `Halt` has fired; the chain no longer accepts submissions.
    Halted,
}

/// The default capacity for a chain's internal regular/config queues.
const QUEUE_CAPACITY: usize = 256;

/// A per-channel chain pipeline.
pub struct Chain {
    channel_id: ChannelId,
    context: Arc<BridgeContext>,
    is_system_channel: bool,
    state: RwLock<ChainState>,
    exit: CancellationToken,
    metrics: Option<Arc<dyn ChainMetrics>>,
}

impl Chain {
    /// Creates a chain bound to `channel_id`, sharing `context` (already
    /// bootstrapped if `is_system_channel` is false, or about to perform
    /// that bootstrap if true — bootstrap itself happens before
    /// construction via [`BridgeContext::bootstrap`]; `is_system_channel`
    /// here only marks which chain owned that call, an explicit argument
    /// rather than a global toggle).
    #[must_use]
    pub fn new(channel_id: ChannelId, context: Arc<BridgeContext>, is_system_channel: bool) -> Self {
        Self {
            channel_id,
            context,
            is_system_channel,
            state: RwLock::new(ChainState::Created),
            exit: CancellationToken::new(),
            metrics: None,
        }
    }

    /// Attaches a submission-metrics hook, reported on every successful
    /// `Order`/`Configure`.
    #[must_use]
    pub fn with_metrics(mut self, metrics: Arc<dyn ChainMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// This chain's channel identity.
    #[must_use]
    pub fn channel_id(&self) -> &ChannelId {
        &self.channel_id
    }

    /// Whether this chain owns the process's bootstrap.
    #[must_use]
    pub fn is_system_channel(&self) -> bool {
        self.is_system_channel
    }

    /// The current lifecycle state.
    #[must_use]
    pub fn state(&self) -> ChainState {
        *self.state.read()
    }

    /// Registers the channel, dials the receive endpoint, and spawns the
    /// receive loop and append loop.
    ///
    /// # Errors
    ///
    /// Returns an error if registration or dialing the receive endpoint
    /// fails.
    pub async fn start(
        self: &Arc<Self>,
        batch_timeout_ns: u64,
        appender: Arc<dyn LedgerAppender>,
    ) -> Result<()> {
        if self.is_system_channel {
            *self.state.write() = ChainState::Bootstrapping;
        }

        self.context
            .register_channel(self.channel_id.as_str(), batch_timeout_ns)
            .await
            .map_err(ChainError::Submit)?;

        let recv_stream = self
            .context
            .dial_receive_endpoint()
            .await
            .map_err(ChainError::Submit)?;

        let (regular_tx, regular_rx) = mpsc::channel(QUEUE_CAPACITY);
        let (config_tx, config_rx) = mpsc::channel(QUEUE_CAPACITY);

        let recv_channel_id = self.channel_id.clone();
        let recv_exit = self.exit.clone();
        tokio::spawn(receive_loop(
            recv_channel_id,
            recv_stream,
            regular_tx,
            config_tx,
            recv_exit,
        ));

        let append_exit = self.exit.clone();
        let append_channel_id = self.channel_id.clone();
        tokio::spawn(append_loop(
            append_channel_id,
            regular_rx,
            config_rx,
            appender,
            append_exit,
        ));

        *self.state.write() = ChainState::Running;
        info!(channel_id = %self.channel_id, "chain running");
        Ok(())
    }

    /// Always succeeds: bootstrap readiness is enforced at [`Chain::start`].
    pub fn wait_ready(&self) {}

    /// A future that resolves once the chain halts.
    pub async fn errored(&self) {
        self.exit.cancelled().await;
    }

    /// Forwards `env` to the external engine as a regular submission
    /// (`Order`).
    ///
    /// `config_seq` is accepted for interface fidelity with the ordering
    /// service's submit contract but is not otherwise used by the bridge.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::Exiting`] if the chain has halted, or
    /// [`ChainError::Submit`] on an IPC write failure.
    pub async fn order(&self, env: &Envelope, _config_seq: u64) -> Result<()> {
        self.check_not_exiting()?;
        let bytes = env.encode();
        self.context
            .send_pool()
            .submit(self.channel_id.as_str(), false, &bytes)
            .await
            .map_err(ChainError::Submit)?;
        self.record_submission();
        Ok(())
    }

    /// Extracts the inner update envelope from `cfg_env` and forwards it
    /// as a config submission (`Configure`).
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::Exiting`] if the chain has halted,
    /// [`ChainError::ConfigExtract`] if extraction fails (nothing is
    /// sent), or [`ChainError::Submit`] on an IPC write failure.
    pub async fn configure(&self, cfg_env: &Envelope, _config_seq: u64) -> Result<()> {
        self.check_not_exiting()?;
        let inner = crate::extract::extract_last_update(cfg_env)?;
        let bytes = inner.encode();
        self.context
            .send_pool()
            .submit(self.channel_id.as_str(), true, &bytes)
            .await
            .map_err(ChainError::Submit)?;
        self.record_submission();
        Ok(())
    }

    fn record_submission(&self) {
        if let Some(metrics) = &self.metrics {
            metrics.record_submission(self.channel_id.as_str());
        }
    }

    fn check_not_exiting(&self) -> Result<()> {
        if self.exit.is_cancelled() {
            Err(ChainError::Exiting)
        } else {
            Ok(())
        }
    }

    /// Fires the exit signal and transitions to `Halted`. Idempotent:
    /// repeated calls are no-ops beyond the first (`CancellationToken`
    /// cancellation is itself idempotent).
    pub fn halt(&self) {
        self.exit.cancel();
        *self.state.write() = ChainState::Halted;
    }
}

/// Reads `(blockBytes, typeTag)` pairs indefinitely, dispatching each
/// decoded block onto the regular or config queue. Malformed block
/// bytes are logged and skipped; an I/O failure on the stream ends the
/// loop, as does the exit signal firing (the latter is an explicit
/// addition over the original engine, which only ever noticed a socket
/// error).
async fn receive_loop(
    channel_id: ChannelId,
    mut stream: TcpStream,
    regular_tx: mpsc::Sender<Block>,
    config_tx: mpsc::Sender<Block>,
    exit: CancellationToken,
) {
    loop {
        let block_bytes = tokio::select! {
            () = exit.cancelled() => {
                debug!(%channel_id, "receive loop stopping on exit signal");
                return;
            }
            result = codec::read_bytes(&mut stream) => match result {
                Ok(bytes) => bytes,
                Err(e) => {
                    debug!(%channel_id, error = %e, "receive stream closed");
                    return;
                }
            },
        };

        let tag_bytes = match codec::read_bytes(&mut stream).await {
            Ok(bytes) => bytes,
            Err(e) => {
                debug!(%channel_id, error = %e, "receive stream closed reading type tag");
                return;
            }
        };

        let block = match Block::decode(&block_bytes) {
            Ok(block) => block,
            Err(e) => {
                warn!(%channel_id, error = %e, "malformed block frame, skipping");
                continue;
            }
        };

        let block_type = tag_bytes
            .first()
            .copied()
            .map_or(BlockType::Regular, BlockType::from_tag_byte);

        let send_result = match block_type {
            BlockType::Regular => regular_tx.send(block).await,
            BlockType::Config => config_tx.send(block).await,
        };
        if send_result.is_err() {
            debug!(%channel_id, "append loop gone, stopping receive loop");
            return;
        }
    }
}

/// Selects over the regular queue, the config queue, and the exit
/// signal, appending each block to the ledger. Append failures are
/// fatal: ledger divergence is unrecoverable, so the process exits
/// rather than continuing in an inconsistent state.
async fn append_loop(
    channel_id: ChannelId,
    mut regular_rx: mpsc::Receiver<Block>,
    mut config_rx: mpsc::Receiver<Block>,
    appender: Arc<dyn LedgerAppender>,
    exit: CancellationToken,
) {
    loop {
        tokio::select! {
            () = exit.cancelled() => {
                debug!(%channel_id, "append loop stopping on exit signal");
                return;
            }
            Some(block) = regular_rx.recv() => {
                if let Err(e) = appender.append_block(&block).await {
                    error!(%channel_id, number = block.number, error = %e, "fatal append failure");
                    std::process::exit(1);
                }
            }
            Some(block) = config_rx.recv() => {
                if let Err(e) = appender.process_config_block(&block).await {
                    error!(%channel_id, number = block.number, error = %e, "fatal config-block processing failure");
                    std::process::exit(1);
                }
                if let Err(e) = appender.append_block(&block).await {
                    error!(%channel_id, number = block.number, error = %e, "fatal append failure after config processing");
                    std::process::exit(1);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Mutex;

    #[derive(Default)]
    struct RecordingAppender {
        regular: Mutex<Vec<u64>>,
        config: Mutex<Vec<u64>>,
        fail_process: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl LedgerAppender for RecordingAppender {
        async fn append_block(&self, block: &Block) -> std::result::Result<(), crate::ledger::LedgerError> {
            self.regular.lock().await.push(block.number);
            Ok(())
        }

        async fn process_config_block(
            &self,
            block: &Block,
        ) -> std::result::Result<(), crate::ledger::LedgerError> {
            self.config.lock().await.push(block.number);
            if self.fail_process.load(Ordering::SeqCst) > 0 {
                return Err(crate::ledger::LedgerError("boom".to_string()));
            }
            Ok(())
        }
    }

    fn sample_block(number: u64) -> Block {
        Block {
            number,
            header_bytes: bytes::Bytes::from_static(b"header"),
            metadata: std::collections::HashMap::new(),
        }
    }

    #[tokio::test]
    async fn dispatches_regular_and_config_blocks_in_order() {
        let appender = Arc::new(RecordingAppender::default());
        let (regular_tx, regular_rx) = mpsc::channel(8);
        let (config_tx, config_rx) = mpsc::channel(8);
        let exit = CancellationToken::new();

        regular_tx.send(sample_block(1)).await.unwrap();
        config_tx.send(sample_block(2)).await.unwrap();

        let appender_clone = appender.clone();
        let exit_clone = exit.clone();
        let handle = tokio::spawn(append_loop(
            ChannelId::from("c"),
            regular_rx,
            config_rx,
            appender_clone,
            exit_clone,
        ));

        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        exit.cancel();
        handle.await.unwrap();

        assert_eq!(*appender.regular.lock().await, vec![1]);
        assert_eq!(*appender.config.lock().await, vec![2]);
    }

    #[test]
    fn halt_is_idempotent() {
        let exit = CancellationToken::new();
        exit.cancel();
        exit.cancel();
        assert!(exit.is_cancelled());
    }

    #[derive(Default)]
    struct RecordingMetrics {
        submissions: std::sync::Mutex<Vec<String>>,
    }

    impl ChainMetrics for RecordingMetrics {
        fn record_submission(&self, channel_id: &str) {
            self.submissions.lock().unwrap().push(channel_id.to_string());
        }
    }

    #[tokio::test]
    async fn order_reports_a_submission_to_the_metrics_hook() {
        let dir = tempfile::tempdir().unwrap();
        let socket_path = dir.path().join("engine.sock");
        let marker_path = dir.path().join("engine.ready");

        let listener = tokio::net::UnixListener::bind(&socket_path).unwrap();
        let acceptor = tokio::spawn(async move {
            // control connection + one pool slot
            let (mut control, _) = listener.accept().await.unwrap();
            let (mut pool_slot, _) = listener.accept().await.unwrap();
            // Drain the registration frame so the bootstrap's write doesn't block.
            let _ = codec::read_string(&mut control).await;
            let _ = codec::read_u64(&mut control).await;
            (
                codec::read_bytes(&mut pool_slot).await.unwrap(),
                codec::read_bytes(&mut pool_slot).await.unwrap(),
                codec::read_bytes(&mut pool_slot).await.unwrap(),
            )
        });

        let bootstrap = tokio::spawn(BridgeContext::bootstrap(
            socket_path,
            0,
            marker_path.clone(),
            1,
        ));
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        std::fs::write(&marker_path, b"ready").unwrap();
        let context = bootstrap.await.unwrap().unwrap();

        context.register_channel("c", 0).await.unwrap();

        let metrics = Arc::new(RecordingMetrics::default());
        let chain = Chain::new(ChannelId::from("c"), context, false).with_metrics(metrics.clone());

        let env = Envelope::new(bytes::Bytes::from_static(b"payload"), bytes::Bytes::from_static(b"sig"));
        chain.order(&env, 0).await.unwrap();

        let (channel_id_bytes, is_config_bytes, _env_bytes) = acceptor.await.unwrap();
        assert_eq!(channel_id_bytes, b"c".to_vec());
        assert_eq!(is_config_bytes, vec![0u8]);
        assert_eq!(*metrics.submissions.lock().unwrap(), vec!["c".to_string()]);
    }
}

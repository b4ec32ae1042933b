//! Prometheus metrics for the bridge node.
//!
//! Kept deliberately small: just the counters the chain pipeline itself
//! produces (blocks appended, config blocks processed, submissions sent)
//! behind a cloneable state struct, `Family`-keyed where a label applies.
//! Signature verification happens in `bridge-cli`, a one-shot process
//! with no metrics registry of its own — see `DESIGN.md` — so it has no
//! counters here.

use bridge_chain::ChainMetrics;
use parking_lot::RwLock;
use prometheus_client::encoding::EncodeLabelSet;
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::metrics::gauge::Gauge;
use prometheus_client::registry::Registry;
use std::sync::Arc;

/// Label set keyed by channel, for the per-channel counters.
#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct ChannelLabel {
    /// The channel identifier.
    pub channel_id: String,
}

/// The bridge node's metrics state.
#[derive(Clone)]
pub struct MetricsState {
    /// Prometheus registry.
    pub registry: Arc<RwLock<Registry>>,
    /// Blocks successfully appended to the ledger, by channel.
    pub blocks_appended: Family<ChannelLabel, Counter>,
    /// Configuration blocks processed (before append), by channel.
    pub config_blocks_processed: Family<ChannelLabel, Counter>,
    /// Envelopes submitted to the external engine's send pool, by
    /// channel.
    pub submissions_sent: Family<ChannelLabel, Counter>,
    /// The configured send-pool size, set once at bootstrap.
    pub send_pool_size: Gauge,
}

impl Default for MetricsState {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsState {
    /// Creates a metrics state with every metric registered.
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Registry::default();

        let blocks_appended = Family::<ChannelLabel, Counter>::default();
        registry.register(
            "bridge_blocks_appended",
            "Total blocks appended to the ledger",
            blocks_appended.clone(),
        );

        let config_blocks_processed = Family::<ChannelLabel, Counter>::default();
        registry.register(
            "bridge_config_blocks_processed",
            "Total configuration blocks processed",
            config_blocks_processed.clone(),
        );

        let submissions_sent = Family::<ChannelLabel, Counter>::default();
        registry.register(
            "bridge_submissions_sent",
            "Total envelopes submitted to the external engine",
            submissions_sent.clone(),
        );

        let send_pool_size = Gauge::default();
        registry.register(
            "bridge_send_pool_size",
            "Configured send pool size",
            send_pool_size.clone(),
        );

        Self {
            registry: Arc::new(RwLock::new(registry)),
            blocks_appended,
            config_blocks_processed,
            submissions_sent,
            send_pool_size,
        }
    }

    /// Encodes the registry in Prometheus text exposition format.
    pub fn encode(&self) -> String {
        let mut buffer = String::new();
        let registry = self.registry.read();
        prometheus_client::encoding::text::encode(&mut buffer, &registry)
            .expect("metrics encoding is infallible");
        buffer
    }
}

impl ChainMetrics for MetricsState {
    fn record_submission(&self, channel_id: &str) {
        self.submissions_sent
            .get_or_create(&ChannelLabel {
                channel_id: channel_id.to_string(),
            })
            .inc();
    }
}

//! An in-memory stand-in for the out-of-scope ledger-append API.
//!
//! The ledger-append API (`AppendBlock`/`ProcessConfigBlock`) is
//! specified only by the [`bridge_chain::LedgerAppender`] interface the
//! append loop drives. `bridge-node` still needs a concrete, buildable
//! default so the binary runs end to end: a `parking_lot::RwLock`-guarded
//! in-memory map, content keyed by block number.

use async_trait::async_trait;
use bridge_chain::{LedgerAppender, LedgerError};
use bridge_types::{Block, ChannelId};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use tracing::info;

use crate::observability::MetricsState;

/// Per-channel ledger height plus the last config block number, kept in
/// memory for the lifetime of the process.
#[derive(Debug, Default)]
struct ChannelLedger {
    blocks: BTreeMap<u64, Block>,
    last_config: Option<u64>,
}

/// An in-memory ledger appender, scoped to one channel.
///
/// Appends are logged and reflected in the process's metrics registry;
/// there is no persistence across restarts — persistent state on the
/// bridge side beyond what the ledger component already stores is out
/// of scope, so this stand-in deliberately keeps none.
pub struct InMemoryLedger {
    channel_id: ChannelId,
    state: RwLock<ChannelLedger>,
    metrics: MetricsState,
}

impl InMemoryLedger {
    /// Creates an empty ledger for `channel_id`.
    #[must_use]
    pub fn new(channel_id: ChannelId, metrics: MetricsState) -> Self {
        Self {
            channel_id,
            state: RwLock::new(ChannelLedger::default()),
            metrics,
        }
    }

    /// The highest block number appended so far, if any.
    #[must_use]
    pub fn height(&self) -> Option<u64> {
        self.state.read().blocks.keys().next_back().copied()
    }

    /// The last config block number processed, if any.
    #[must_use]
    pub fn last_config(&self) -> Option<u64> {
        self.state.read().last_config
    }
}

#[async_trait]
impl LedgerAppender for InMemoryLedger {
    async fn append_block(&self, block: &Block) -> Result<(), LedgerError> {
        self.state.write().blocks.insert(block.number, block.clone());
        self.metrics.blocks_appended.get_or_create(&crate::observability::ChannelLabel {
            channel_id: self.channel_id.to_string(),
        }).inc();
        info!(channel_id = %self.channel_id, number = block.number, "block appended");
        Ok(())
    }

    async fn process_config_block(&self, block: &Block) -> Result<(), LedgerError> {
        self.state.write().last_config = Some(block.number);
        self.metrics.config_blocks_processed.get_or_create(&crate::observability::ChannelLabel {
            channel_id: self.channel_id.to_string(),
        }).inc();
        info!(channel_id = %self.channel_id, number = block.number, "config block processed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use std::collections::HashMap;

    fn sample_block(number: u64) -> Block {
        Block {
            number,
            header_bytes: Bytes::from_static(b"header"),
            metadata: HashMap::new(),
        }
    }

    #[tokio::test]
    async fn append_tracks_height() {
        let ledger = InMemoryLedger::new(ChannelId::new("c"), MetricsState::new());
        assert_eq!(ledger.height(), None);

        ledger.append_block(&sample_block(1)).await.unwrap();
        ledger.append_block(&sample_block(2)).await.unwrap();
        assert_eq!(ledger.height(), Some(2));
    }

    #[tokio::test]
    async fn config_processing_tracks_last_config() {
        let ledger = InMemoryLedger::new(ChannelId::new("c"), MetricsState::new());
        assert_eq!(ledger.last_config(), None);

        ledger.process_config_block(&sample_block(5)).await.unwrap();
        assert_eq!(ledger.last_config(), Some(5));
    }
}

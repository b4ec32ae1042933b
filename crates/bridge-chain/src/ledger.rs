//! The out-of-scope ledger-append API (`AppendBlock`, `ProcessConfigBlock`),
//! specified here only by the interface the append loop calls.

use async_trait::async_trait;
use bridge_types::Block;
use thiserror::Error;

/// An error from the ledger-append machinery. Treated as fatal by the
/// append loop: ledger divergence is unrecoverable.
#[derive(Debug, Error)]
#[error("ledger append failed: {0}")]
pub struct LedgerError(pub String);

/// The ledger-append surface a chain's append loop drives.
#[async_trait]
pub trait LedgerAppender: Send + Sync {
    /// Appends a regular or already-processed config block to the
    /// ledger.
    async fn append_block(&self, block: &Block) -> Result<(), LedgerError>;

    /// Processes a configuration block's effect on channel configuration.
    /// Called before `append_block` for config blocks.
    async fn process_config_block(&self, block: &Block) -> Result<(), LedgerError>;
}

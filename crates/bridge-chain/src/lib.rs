//! # Bridge Chain
//!
//! The per-channel chain pipeline: submit path (`Order`/`Configure`),
//! receive path (framed block stream → regular/config dispatch → ledger
//! append), and the config-envelope extractor `Configure` depends on.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod chain;
mod error;
mod extract;
mod ledger;
mod metrics;

pub use chain::{Chain, ChainState};
pub use error::{ChainError, Result};
pub use extract::{extract_last_update, ExtractError};
pub use ledger::{LedgerAppender, LedgerError};
pub use metrics::ChainMetrics;

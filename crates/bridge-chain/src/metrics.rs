//! The submit-path metrics hook.
//!
//! `bridge-chain` has no opinion on how submissions are counted or where
//! they're exposed (Prometheus, logs, nothing at all) — it only needs
//! somewhere to report that a submission actually went out. A concrete
//! binary (`bridge-node`) implements this trait against its own metrics
//! registry and hands it to [`crate::Chain::new`]; tests and callers that
//! don't care can skip it, since `Chain` treats it as optional.

/// Observes successful submissions on a chain's submit path.
///
/// Implementations must be cheap: this is called on every successful
/// `Order`/`Configure`, inline with the submit path.
pub trait ChainMetrics: Send + Sync {
    /// Records one envelope submitted to the external engine on behalf
    /// of `channel_id`.
    fn record_submission(&self, channel_id: &str);
}

//! Observability for `bridge-node`: structured logging and the process's
//! Prometheus metrics registry, scaled down to what the chain pipeline
//! naturally produces.

mod logging;
mod metrics;

pub use logging::{init_logging, LogFormat};
pub use metrics::{ChannelLabel, MetricsState};

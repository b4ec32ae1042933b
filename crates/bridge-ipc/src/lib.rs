//! # Bridge IPC
//!
//! The framed wire codec, the round-robin send pool, and the bootstrap
//! coordinator that establishes both against the external consensus
//! engine.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod codec;
mod connection;
mod context;
mod error;
mod pool;

pub use connection::IpcConnection;
pub use context::{BridgeContext, READY_MARKER_POLL_INTERVAL};
pub use error::{IpcError, Result};
pub use pool::SendPool;

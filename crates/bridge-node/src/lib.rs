//! # Bridge Node
//!
//! The binary that hosts the per-channel chain pipelines, wired against
//! the bootstrap coordinator and send pool in `bridge-ipc`. Library
//! surface for the `bridge-node` binary: node
//! configuration loading, the in-memory ledger-appender stand-in, and
//! observability (structured logging + Prometheus metrics).
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                        bridge-node                         │
//! ├────────────────────────────────────────────────────────────┤
//! │  system channel's Chain                                    │
//! │    └─ BridgeContext::bootstrap (ready marker, control+pool) │
//! │  every channel's Chain                                      │
//! │    ├─ receive loop  (framed TCP → block/config split)       │
//! │    ├─ append loop   (→ LedgerAppender)                      │
//! │    └─ submit path   (Order/Configure → send pool)           │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`config`] — node configuration (channel list, pool size, ports,
//!   logging) loaded from YAML with environment-variable overrides
//! - [`ledger`] — the in-memory `LedgerAppender` stand-in `bridge-chain`
//!   appends to
//! - [`observability`] — structured logging initialization and the
//!   Prometheus metrics registry

pub mod config;
pub mod ledger;
pub mod observability;

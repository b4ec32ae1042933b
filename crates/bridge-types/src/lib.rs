//! # Bridge Types
//!
//! Opaque envelope and block data model shared by the consensus bridge
//! crates (`bridge-ipc`, `bridge-chain`, `bridge-verify`, `bridge-deliver`).
//!
//! The envelope/block wire schema is an external collaborator — this
//! crate models only the structure the bridge core actually inspects:
//! the channel-header discriminant needed to extract a configuration
//! update (see `bridge-chain::extract`), and the block metadata needed
//! to verify ordering-node signatures (see `bridge-verify`).

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod block;
mod channel;
mod envelope;

pub use block::{Block, BlockType, Metadata, MetadataKind, MetadataSignature};
pub use channel::ChannelId;
pub use envelope::{
    ChannelHeader, ConfigEnvelope, DecodeError, Envelope, EnvelopeType, Header,
    OrdererTransactionPayload, Payload, SignatureHeader,
};

//! Delivery client: seeks, then consumes the `Deliver` stream.

use crate::error::{DeliverError, Result};
use crate::proto::seek_position::Position;
use crate::proto::{
    deliver_response, DeliverResponse, Oldest, Newest, SeekBehavior, SeekEnvelope, SeekInfo,
    SeekPosition,
};
use crate::proto::deliver_service_client::DeliverServiceClient;
use bridge_types::{Block as CoreBlock, Metadata as CoreMetadata, MetadataSignature as CoreMetadataSignature};
use bytes::Bytes;
use prost::Message;
use std::collections::HashMap;
use tonic::transport::Channel;
use tonic::Streaming;
use tracing::{error, info};

/// The metadata map key the bridge uses for ordering-node block
/// signatures.
pub const SIGNATURES_KEY: u32 = 0;
/// The metadata map key the bridge uses for the last-config pointer
/// signatures.
pub const LAST_CONFIG_KEY: u32 = 1;

/// Where the delivery client should start reading.
#[derive(Debug, Clone, Copy)]
pub enum SeekTarget {
    /// `seekOldest`: start at the oldest block, stop at `u64::MAX`.
    Oldest,
    /// `seekNewest`: start at the newest block, stop at `u64::MAX`.
    Newest,
    /// `seekSingle(n)`: start and stop at block `n`.
    Single(u64),
}

impl SeekTarget {
    /// Builds the `SeekInfo` this target corresponds to, with behavior
    /// fixed to `BLOCK_UNTIL_READY`.
    #[must_use]
    pub fn to_seek_info(self) -> SeekInfo {
        let (start, stop) = match self {
            SeekTarget::Oldest => (
                Position::Oldest(Oldest {}),
                Position::Specified(u64::MAX),
            ),
            SeekTarget::Newest => (
                Position::Newest(Newest {}),
                Position::Specified(u64::MAX),
            ),
            SeekTarget::Single(n) => (Position::Specified(n), Position::Specified(n)),
        };
        SeekInfo {
            start: Some(SeekPosition {
                position: Some(start),
            }),
            stop: Some(SeekPosition {
                position: Some(stop),
            }),
            behavior: SeekBehavior::BlockUntilReady as i32,
        }
    }
}

/// A gRPC bidirectional-stream consumer for the ordering service's
/// `Deliver` RPC.
pub struct DeliveryClient {
    inner: DeliverServiceClient<Channel>,
}

impl DeliveryClient {
    /// Connects to `server_addr` (e.g. `http://host:port`).
    ///
    /// # Errors
    ///
    /// Returns [`DeliverError::Connect`] if the channel cannot be
    /// established.
    pub async fn connect(server_addr: String) -> Result<Self> {
        let inner = DeliverServiceClient::connect(server_addr)
            .await
            .map_err(DeliverError::Connect)?;
        Ok(Self { inner })
    }

    /// Issues exactly one seek request for `target` and returns the
    /// resulting response stream.
    ///
    /// # Errors
    ///
    /// Returns [`DeliverError::Rpc`] if the RPC could not be opened.
    pub async fn seek(&mut self, target: SeekTarget) -> Result<Streaming<DeliverResponse>> {
        let seek_info = target.to_seek_info();
        let envelope = SeekEnvelope {
            payload: seek_info.encode_to_vec(),
            signature: Vec::new(),
        };
        let request = tonic::Request::new(tokio_stream::once(envelope));
        let response = self
            .inner
            .deliver(request)
            .await
            .map_err(DeliverError::Rpc)?;
        Ok(response.into_inner())
    }
}

/// One item yielded by [`consume`]: either a delivered block (with its
/// number) or a terminal status that ends the stream.
pub enum DeliveredItem {
    /// A delivered block.
    Block(CoreBlock),
    /// A terminal status response; the stream ends after this.
    Status(i32),
}

/// Reads the next response off `stream`, converting a `block` variant
/// into the core [`CoreBlock`] representation the verifier operates on.
/// Each response is either a status, logged and terminating the client,
/// or a block.
///
/// # Errors
///
/// Returns [`DeliverError::Stream`] on a transport-level stream error,
/// logged by the caller and ending the client task.
pub async fn next_item(stream: &mut Streaming<DeliverResponse>) -> Result<Option<DeliveredItem>> {
    let response = match stream.message().await {
        Ok(Some(r)) => r,
        Ok(None) => return Ok(None),
        Err(status) => {
            error!(error = %status, "delivery stream error");
            return Err(DeliverError::Stream(status));
        }
    };

    match response.result {
        Some(deliver_response::Result::Status(code)) => {
            info!(status = code, "delivery stream terminated with status");
            Ok(Some(DeliveredItem::Status(code)))
        }
        Some(deliver_response::Result::Block(block)) => Ok(Some(DeliveredItem::Block(from_proto_block(&block)))),
        None => Ok(None),
    }
}

fn from_proto_block(block: &crate::proto::Block) -> CoreBlock {
    let mut metadata = HashMap::new();
    for (key, value) in &block.metadata {
        let kind = match *key {
            SIGNATURES_KEY => bridge_types::MetadataKind::Signatures,
            LAST_CONFIG_KEY => bridge_types::MetadataKind::LastConfig,
            _ => continue,
        };
        metadata.insert(
            kind,
            CoreMetadata {
                value: Bytes::from(value.value.clone()),
                signatures: value
                    .signatures
                    .iter()
                    .map(|s| CoreMetadataSignature {
                        signature_header: Bytes::from(s.signature_header.clone()),
                        signature: Bytes::from(s.signature.clone()),
                    })
                    .collect(),
            },
        );
    }
    CoreBlock {
        number: block.number,
        header_bytes: Bytes::from(block.header_bytes.clone()),
        metadata,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oldest_seeks_with_max_stop() {
        let info = SeekTarget::Oldest.to_seek_info();
        assert!(matches!(
            info.start.unwrap().position,
            Some(Position::Oldest(_))
        ));
        assert!(matches!(
            info.stop.unwrap().position,
            Some(Position::Specified(u64::MAX))
        ));
        assert_eq!(info.behavior, SeekBehavior::BlockUntilReady as i32);
    }

    #[test]
    fn single_seeks_start_equals_stop() {
        let info = SeekTarget::Single(7).to_seek_info();
        assert!(matches!(info.start.unwrap().position, Some(Position::Specified(7))));
        assert!(matches!(info.stop.unwrap().position, Some(Position::Specified(7))));
    }
}

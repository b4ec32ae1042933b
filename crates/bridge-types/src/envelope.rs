//! Envelope wire types.
//!
//! The bridge treats envelopes as opaque byte strings, except that a
//! configuration-update envelope exposes a header discriminating `CONFIG`
//! from `ORDERER_TRANSACTION` and carries a nested `LastUpdate` envelope
//! that must be forwarded in place of the outer envelope (see
//! `bridge-chain`'s extractor).

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors decoding an envelope or one of its nested payloads.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The byte string is not a well-formed encoding of the expected type.
    #[error("malformed {0}: {1}")]
    Malformed(&'static str, String),
}

/// A signed payload unit of the ordering service.
///
/// Forwarded to the external consensus engine as opaque bytes; only
/// [`Envelope::decode_payload`] peeks inside, and only for configuration
/// envelopes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// The serialized [`Payload`].
    pub payload: Bytes,
    /// The envelope signature (opaque; not inspected by the bridge).
    pub signature: Bytes,
}

impl Envelope {
    /// Creates an envelope from an already-serialized payload.
    #[must_use]
    pub fn new(payload: Bytes, signature: Bytes) -> Self {
        Self { payload, signature }
    }

    /// Encodes this envelope to the bytes forwarded over IPC.
    #[must_use]
    pub fn encode(&self) -> Bytes {
        Bytes::from(bincode::serialize(self).expect("envelope serialization is infallible"))
    }

    /// Decodes an envelope from bytes received off the wire.
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        bincode::deserialize(bytes)
            .map_err(|e| DecodeError::Malformed("envelope", e.to_string()))
    }

    /// Decodes this envelope's payload.
    pub fn decode_payload(&self) -> Result<Payload, DecodeError> {
        bincode::deserialize(&self.payload)
            .map_err(|e| DecodeError::Malformed("payload", e.to_string()))
    }
}

/// The payload carried inside an [`Envelope`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    /// The channel header, absent only for malformed payloads.
    pub header: Option<Header>,
    /// The payload-type-specific data (a `ConfigEnvelope` or an
    /// `OrdererTransactionPayload`, depending on `header.channel_header.kind`).
    pub data: Bytes,
}

/// A payload header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// The channel header.
    pub channel_header: ChannelHeader,
    /// The signature header (opaque; not inspected here).
    pub signature_header: Bytes,
}

/// The channel header embedded in a [`Payload`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelHeader {
    /// The envelope's type.
    pub kind: EnvelopeType,
    /// The channel this envelope targets.
    pub channel_id: String,
}

/// The envelope type carried in a [`ChannelHeader`].
///
/// Mirrors a protobuf enum: known discriminants plus a numeric fallback
/// for anything else, so decoding never fails on an unrecognized type —
/// only the config extractor rejects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnvelopeType {
    /// A configuration envelope.
    Config,
    /// A wrapper carrying a config update as an ordering transaction.
    OrdererTransaction,
    /// Any other envelope type, keyed by its raw discriminant.
    Other(i32),
}

/// The payload data of a `CONFIG`-typed envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigEnvelope {
    /// The current channel configuration (opaque).
    pub config: Bytes,
    /// The envelope that produced this configuration, forwarded by
    /// `Configure` in place of the outer envelope.
    pub last_update: Envelope,
}

impl ConfigEnvelope {
    /// Decodes a `ConfigEnvelope` from a payload's `data` field.
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        bincode::deserialize(bytes)
            .map_err(|e| DecodeError::Malformed("config envelope", e.to_string()))
    }
}

/// The payload data of an `ORDERER_TRANSACTION`-typed envelope: wraps an
/// inner envelope that is itself expected to be a `CONFIG` envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrdererTransactionPayload {
    /// The inner, wrapped envelope.
    pub inner: Envelope,
}

impl OrdererTransactionPayload {
    /// Decodes an `OrdererTransactionPayload` from a payload's `data` field.
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        bincode::deserialize(bytes)
            .map_err(|e| DecodeError::Malformed("orderer transaction payload", e.to_string()))
    }
}

/// A decoded signature header, carrying the signer's identity bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureHeader {
    /// The signer's serialized identity ("Creator" in the original ordering
    /// service's terminology).
    pub creator: Bytes,
    /// An anti-replay nonce (opaque; not inspected by the bridge).
    pub nonce: Bytes,
}

impl SignatureHeader {
    /// Decodes a signature header from its on-wire bytes.
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        bincode::deserialize(bytes)
            .map_err(|e| DecodeError::Malformed("signature header", e.to_string()))
    }

    /// Encodes this signature header.
    #[must_use]
    pub fn encode(&self) -> Bytes {
        Bytes::from(bincode::serialize(self).expect("signature header serialization is infallible"))
    }
}

//! Block wire types.

use crate::envelope::DecodeError;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A totally-ordered unit produced by the external consensus engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Monotonically increasing height.
    pub number: u64,
    /// The canonical serialized header.
    pub header_bytes: Bytes,
    /// Per-kind metadata (signatures, last-config pointer, ...).
    pub metadata: HashMap<MetadataKind, Metadata>,
}

impl Block {
    /// Decodes a block from the bytes read off the receive stream.
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        bincode::deserialize(bytes).map_err(|e| DecodeError::Malformed("block", e.to_string()))
    }

    /// Encodes this block to bytes (used by tests and by the engine side
    /// of the receive stream fixture).
    #[must_use]
    pub fn encode(&self) -> Bytes {
        Bytes::from(bincode::serialize(self).expect("block serialization is infallible"))
    }

    /// Returns the requested metadata entry, if present.
    #[must_use]
    pub fn metadata(&self, kind: MetadataKind) -> Option<&Metadata> {
        self.metadata.get(&kind)
    }
}

/// The kind of a block metadata entry the bridge cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetadataKind {
    /// Ordering-node signatures over the block.
    Signatures,
    /// Signatures over the last-config pointer.
    LastConfig,
}

/// A metadata entry: a value plus the signatures collected over it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// The metadata value signed by each signature below.
    pub value: Bytes,
    /// The signatures collected over `value ∥ signature_header ∥ header_bytes`.
    pub signatures: Vec<MetadataSignature>,
}

/// One signature within a [`Metadata`] entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataSignature {
    /// The serialized signature header (carries the signer's identity).
    pub signature_header: Bytes,
    /// The signature bytes.
    pub signature: Bytes,
}

/// Whether a delivered block is a regular or a configuration block.
///
/// Decoded from the type-tag byte that accompanies every block on the
/// receive stream: `0x01` is config, anything else is regular.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockType {
    /// A regular (non-configuration) block.
    Regular,
    /// A configuration block.
    Config,
}

impl BlockType {
    /// The type tag for a configuration block.
    pub const CONFIG_TAG: u8 = 0x01;

    /// Classifies a type-tag byte.
    #[must_use]
    pub fn from_tag_byte(tag: u8) -> Self {
        if tag == Self::CONFIG_TAG {
            Self::Config
        } else {
            Self::Regular
        }
    }

    /// Returns the wire tag byte for this type.
    #[must_use]
    pub fn to_tag_byte(self) -> u8 {
        match self {
            Self::Config => Self::CONFIG_TAG,
            Self::Regular => 0x00,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_block(number: u64) -> Block {
        let mut metadata = HashMap::new();
        metadata.insert(
            MetadataKind::Signatures,
            Metadata {
                value: Bytes::from_static(b"value"),
                signatures: vec![MetadataSignature {
                    signature_header: Bytes::from_static(b"hdr"),
                    signature: Bytes::from_static(b"sig"),
                }],
            },
        );
        Block {
            number,
            header_bytes: Bytes::from_static(b"header"),
            metadata,
        }
    }

    #[test]
    fn block_roundtrips_through_wire_bytes() {
        let block = sample_block(42);
        let wire = block.encode();
        let decoded = Block::decode(&wire).unwrap();
        assert_eq!(decoded, block);
    }

    #[test]
    fn block_type_from_tag_byte() {
        assert_eq!(BlockType::from_tag_byte(0x01), BlockType::Config);
        assert_eq!(BlockType::from_tag_byte(0x00), BlockType::Regular);
        assert_eq!(BlockType::from_tag_byte(0xFF), BlockType::Regular);
    }

    #[test]
    fn block_type_tag_roundtrip() {
        assert_eq!(
            BlockType::from_tag_byte(BlockType::Config.to_tag_byte()),
            BlockType::Config
        );
        assert_eq!(
            BlockType::from_tag_byte(BlockType::Regular.to_tag_byte()),
            BlockType::Regular
        );
    }
}

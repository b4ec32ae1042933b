//! Config-envelope extractor.
//!
//! Extracts the `LastUpdate` sub-envelope from a configuration-update
//! envelope, handling both the direct `CONFIG` form and the wrapped
//! `ORDERER_TRANSACTION` form.

use bridge_types::{ConfigEnvelope, DecodeError, Envelope, EnvelopeType, OrdererTransactionPayload};
use thiserror::Error;

/// Errors extracting the inner update envelope from an outer envelope.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The envelope's payload could not be decoded.
    #[error("malformed payload: {0}")]
    Payload(#[source] DecodeError),

    /// The payload has no channel header.
    #[error("missing channel header")]
    MissingHeader,

    /// The payload's type-specific data could not be decoded.
    #[error("malformed envelope data: {0}")]
    Data(#[source] DecodeError),

    /// The channel header names a type this extractor does not accept.
    #[error("unexpected envelope type")]
    UnexpectedType,
}

/// Extracts the inner `LastUpdate` envelope from `outer`.
///
/// Dispatches on the decoded channel-header type:
/// - `CONFIG` — decodes the payload as a [`ConfigEnvelope`] and returns
///   its `last_update` field directly.
/// - `OrdererTransaction` — decodes the payload as an
///   [`OrdererTransactionPayload`], then recurses on its inner envelope
///   (which is itself expected to be a `CONFIG` envelope).
/// - anything else — fails with [`ExtractError::UnexpectedType`].
///
/// # Errors
///
/// Returns an error for a missing header or any decoding failure; there
/// is no default fallback.
pub fn extract_last_update(outer: &Envelope) -> Result<Envelope, ExtractError> {
    let payload = outer.decode_payload().map_err(ExtractError::Payload)?;
    let header = payload.header.ok_or(ExtractError::MissingHeader)?;

    match header.channel_header.kind {
        EnvelopeType::Config => {
            let config = ConfigEnvelope::decode(&payload.data).map_err(ExtractError::Data)?;
            Ok(config.last_update)
        }
        EnvelopeType::OrdererTransaction => {
            let wrapper =
                OrdererTransactionPayload::decode(&payload.data).map_err(ExtractError::Data)?;
            extract_last_update(&wrapper.inner)
        }
        EnvelopeType::Other(_) => Err(ExtractError::UnexpectedType),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_types::{ChannelHeader, Header, Payload};
    use bytes::Bytes;

    fn envelope_with(data: Bytes, kind: EnvelopeType) -> Envelope {
        let header = Header {
            channel_header: ChannelHeader {
                kind,
                channel_id: "test-channel".to_string(),
            },
            signature_header: Bytes::from_static(b"sig-header"),
        };
        let payload = Payload {
            header: Some(header),
            data,
        };
        let payload_bytes = bincode::serialize(&payload).unwrap();
        Envelope::new(Bytes::from(payload_bytes), Bytes::from_static(b"sig"))
    }

    fn last_update_envelope(payload_bytes: Bytes) -> Envelope {
        Envelope::new(payload_bytes, Bytes::from_static(b"last-update-sig"))
    }

    #[test]
    fn direct_config_envelope_returns_last_update() {
        let last_update = last_update_envelope(Bytes::from_static(b"\xca\xfe"));
        let config = ConfigEnvelope {
            config: Bytes::from_static(b"config-bytes"),
            last_update: last_update.clone(),
        };
        let data = Bytes::from(bincode::serialize(&config).unwrap());
        let outer = envelope_with(data, EnvelopeType::Config);

        let extracted = extract_last_update(&outer).unwrap();
        assert_eq!(extracted, last_update);
    }

    #[test]
    fn wrapped_orderer_transaction_returns_same_last_update() {
        let last_update = last_update_envelope(Bytes::from_static(b"\xca\xfe"));
        let config = ConfigEnvelope {
            config: Bytes::from_static(b"config-bytes"),
            last_update: last_update.clone(),
        };
        let inner_payload = Payload {
            header: Some(Header {
                channel_header: ChannelHeader {
                    kind: EnvelopeType::Config,
                    channel_id: "test-channel".to_string(),
                },
                signature_header: Bytes::from_static(b"sig-header"),
            }),
            data: Bytes::from(bincode::serialize(&config).unwrap()),
        };
        let inner = Envelope::new(
            Bytes::from(bincode::serialize(&inner_payload).unwrap()),
            Bytes::from_static(b"inner-sig"),
        );
        let wrapper = OrdererTransactionPayload { inner };
        let data = Bytes::from(bincode::serialize(&wrapper).unwrap());
        let outer = envelope_with(data, EnvelopeType::OrdererTransaction);

        let extracted = extract_last_update(&outer).unwrap();
        assert_eq!(extracted, last_update);
    }

    #[test]
    fn unexpected_type_fails() {
        let outer = envelope_with(Bytes::from_static(b"irrelevant"), EnvelopeType::Other(7));
        assert!(matches!(
            extract_last_update(&outer),
            Err(ExtractError::UnexpectedType)
        ));
    }

    #[test]
    fn missing_header_fails() {
        let payload = Payload {
            header: None,
            data: Bytes::from_static(b"irrelevant"),
        };
        let payload_bytes = bincode::serialize(&payload).unwrap();
        let outer = Envelope::new(Bytes::from(payload_bytes), Bytes::from_static(b"sig"));
        assert!(matches!(
            extract_last_update(&outer),
            Err(ExtractError::MissingHeader)
        ));
    }
}

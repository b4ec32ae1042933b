//! BFT signature verifier.

use crate::error::SignatureCheckError;
use bridge_identity::IdentityProvider;
use bridge_types::{Metadata, SignatureHeader};
use std::sync::Arc;
use tracing::debug;

/// Verifies ordering-node signatures over a block metadata entry.
///
/// Wraps an [`IdentityProvider`] standing in for the out-of-scope
/// membership service; `msp_id` is always passed as the empty string at
/// call sites, selecting the provider's local/default MSP.
pub struct SignatureVerifier {
    identity_provider: Arc<dyn IdentityProvider>,
}

impl SignatureVerifier {
    /// Creates a verifier backed by `identity_provider`.
    #[must_use]
    pub fn new(identity_provider: Arc<dyn IdentityProvider>) -> Self {
        Self { identity_provider }
    }

    /// Counts the signatures in `metadata` that verify against
    /// `header_bytes` (the block's canonical header bytes).
    ///
    /// Per signature: reconstructs the signed bytes as
    /// `metadata.value ∥ signature_header ∥ header_bytes` (order is
    /// significant), decodes the signature header to
    /// recover the creator, deserializes the identity, and verifies. A
    /// malformed header, undeserializable identity, or failed
    /// verification is logged at debug and the signature is skipped —
    /// it neither counts nor aborts checking the rest.
    #[must_use]
    pub fn count_valid(&self, metadata: &Metadata, header_bytes: &[u8]) -> usize {
        metadata
            .signatures
            .iter()
            .filter(|sig| {
                match self.check_one(&metadata.value, &sig.signature_header, &sig.signature, header_bytes) {
                    Ok(()) => true,
                    Err(e) => {
                        debug!(error = %e, "signature excluded from quorum count");
                        false
                    }
                }
            })
            .count()
    }

    fn check_one(
        &self,
        value: &[u8],
        signature_header_bytes: &[u8],
        signature: &[u8],
        header_bytes: &[u8],
    ) -> Result<(), SignatureCheckError> {
        let mut signed_bytes = Vec::with_capacity(value.len() + signature_header_bytes.len() + header_bytes.len());
        signed_bytes.extend_from_slice(value);
        signed_bytes.extend_from_slice(signature_header_bytes);
        signed_bytes.extend_from_slice(header_bytes);

        let header = SignatureHeader::decode(signature_header_bytes)
            .map_err(SignatureCheckError::MalformedHeader)?;

        let identity = self
            .identity_provider
            .deserialize_identity("", &header.creator)
            .map_err(SignatureCheckError::UndeserializableIdentity)?;

        identity
            .verify(&signed_bytes, signature)
            .map_err(SignatureCheckError::VerificationFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_identity::{Ed25519IdentityProvider, Keypair, SerializedIdentity};
    use bridge_types::MetadataSignature;
    use bytes::Bytes;

    fn metadata_with_signers(keypairs: &[Keypair], value: Bytes, header_bytes: &[u8]) -> Metadata {
        let signatures = keypairs
            .iter()
            .map(|kp| {
                let creator = SerializedIdentity {
                    msp_id: "DefaultMSP".to_string(),
                    public_key: *kp.public_key().as_bytes(),
                }
                .encode();
                let signature_header = SignatureHeader {
                    creator: Bytes::from(creator),
                    nonce: Bytes::from_static(b"nonce"),
                };
                let signature_header_bytes = signature_header.encode();

                let mut signed_bytes = Vec::new();
                signed_bytes.extend_from_slice(&value);
                signed_bytes.extend_from_slice(&signature_header_bytes);
                signed_bytes.extend_from_slice(header_bytes);
                let signature = kp.sign(&signed_bytes);

                MetadataSignature {
                    signature_header: signature_header_bytes,
                    signature: Bytes::copy_from_slice(signature.as_bytes()),
                }
            })
            .collect();
        Metadata { value, signatures }
    }

    #[test]
    fn counts_only_genuinely_valid_signatures() {
        let provider = Arc::new(Ed25519IdentityProvider::new("DefaultMSP"));
        let verifier = SignatureVerifier::new(provider);

        let good_kp = Keypair::generate();
        let bad_kp = Keypair::generate();
        let value = Bytes::from_static(b"metadata-value");
        let header_bytes = b"block-header-bytes";

        let mut metadata = metadata_with_signers(&[good_kp], value.clone(), header_bytes);
        // Append a signature whose bytes were signed over different header bytes.
        let tampered = metadata_with_signers(&[bad_kp], value, b"different-header");
        metadata.signatures.extend(tampered.signatures);

        assert_eq!(verifier.count_valid(&metadata, header_bytes), 1);
    }

    #[test]
    fn malformed_signature_header_is_skipped_not_fatal() {
        let provider = Arc::new(Ed25519IdentityProvider::new("DefaultMSP"));
        let verifier = SignatureVerifier::new(provider);

        let metadata = Metadata {
            value: Bytes::from_static(b"value"),
            signatures: vec![MetadataSignature {
                signature_header: Bytes::from_static(b"not a signature header"),
                signature: Bytes::from_static(b"irrelevant"),
            }],
        };

        assert_eq!(verifier.count_valid(&metadata, b"header"), 0);
    }
}

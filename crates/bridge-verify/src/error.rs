//! Verifier error types.

use thiserror::Error;

/// Per-signature verification failures: logged by the caller and the
/// signature is skipped, never propagated as a hard error.
#[derive(Debug, Error)]
pub enum SignatureCheckError {
    /// The signature header bytes did not decode.
    #[error("malformed signature header: {0}")]
    MalformedHeader(#[source] bridge_types::DecodeError),

    /// The creator bytes did not deserialize into an identity.
    #[error("undeserializable identity: {0}")]
    UndeserializableIdentity(#[source] bridge_identity::IdentityError),

    /// The signature did not verify.
    #[error("signature verification failed: {0}")]
    VerificationFailed(#[source] bridge_identity::IdentityError),
}

//! Identity deserialization and verification, standing in for the external
//! membership service (MSP) the bridge itself never implements.
//!
//! The bridge only ever needs two things from an MSP: turn the opaque
//! "creator" bytes carried in a signature header into something that can
//! verify a signature, and do it per named MSP (empty string selects the
//! bridge's own default). [`Ed25519IdentityProvider`] is the single
//! concrete backend; a deployment with a real MSP would implement
//! [`IdentityProvider`] against it instead.

use crate::{IdentityError, PublicKey, Result, Signature};
use serde::{Deserialize, Serialize};

/// A deserialized identity capable of verifying its own signatures.
pub trait Identity: Send + Sync {
    /// Verifies `signature` over `message` as having been produced by this
    /// identity.
    ///
    /// # Errors
    ///
    /// Returns an error if the signature does not verify.
    fn verify(&self, message: &[u8], signature: &[u8]) -> Result<()>;
}

/// Deserializes creator bytes into a verifiable [`Identity`].
///
/// `msp_id` names which membership service should interpret the bytes; an
/// empty string selects the provider's own default MSP.
pub trait IdentityProvider: Send + Sync {
    /// Deserializes `creator` bytes under the named MSP.
    ///
    /// # Errors
    ///
    /// Returns an error if `msp_id` is not served by this provider or the
    /// bytes do not deserialize into a valid identity.
    fn deserialize_identity(&self, msp_id: &str, creator: &[u8]) -> Result<Box<dyn Identity>>;
}

/// The wire form of a creator: an MSP identifier plus a raw Ed25519 public
/// key, bincode-encoded into the signature header's `creator` field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializedIdentity {
    /// The MSP that issued this identity.
    pub msp_id: String,
    /// The raw 32-byte Ed25519 public key.
    pub public_key: [u8; 32],
}

impl SerializedIdentity {
    /// Encodes this identity to the bytes carried as a signature header's
    /// creator field.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        bincode::serialize(self).expect("serialized identity encoding is infallible")
    }

    /// Decodes a creator byte string into a [`SerializedIdentity`].
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a well-formed encoding.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        bincode::deserialize(bytes)
            .map_err(|e| IdentityError::UndeserializableIdentity(e.to_string()))
    }
}

struct Ed25519Identity {
    public_key: PublicKey,
}

impl Identity for Ed25519Identity {
    fn verify(&self, message: &[u8], signature: &[u8]) -> Result<()> {
        if signature.len() != Signature::LEN {
            return Err(IdentityError::InvalidSignature);
        }
        let sig = Signature::from_slice(signature);
        self.public_key.verify(message, &sig)
    }
}

/// The bridge's default local MSP stand-in: creators are bincode-encoded
/// [`SerializedIdentity`] values naming this provider's own MSP ID.
#[derive(Debug, Clone)]
pub struct Ed25519IdentityProvider {
    msp_id: String,
}

impl Ed25519IdentityProvider {
    /// Creates a provider that serves the given MSP ID, plus the empty
    /// string (the "local MSP" alias used throughout the bridge).
    #[must_use]
    pub fn new(msp_id: impl Into<String>) -> Self {
        Self {
            msp_id: msp_id.into(),
        }
    }
}

impl IdentityProvider for Ed25519IdentityProvider {
    fn deserialize_identity(&self, msp_id: &str, creator: &[u8]) -> Result<Box<dyn Identity>> {
        if !msp_id.is_empty() && msp_id != self.msp_id {
            return Err(IdentityError::UnknownMspId(msp_id.to_string()));
        }
        let serialized = SerializedIdentity::decode(creator)?;
        if serialized.msp_id != self.msp_id {
            return Err(IdentityError::UnknownMspId(serialized.msp_id));
        }
        let public_key = PublicKey::from_bytes(&serialized.public_key)?;
        Ok(Box::new(Ed25519Identity { public_key }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Keypair;

    fn provider() -> Ed25519IdentityProvider {
        Ed25519IdentityProvider::new("DefaultMSP")
    }

    fn creator_for(keypair: &Keypair) -> Vec<u8> {
        SerializedIdentity {
            msp_id: "DefaultMSP".to_string(),
            public_key: *keypair.public_key().as_bytes(),
        }
        .encode()
    }

    #[test]
    fn verifies_a_genuine_signature() {
        let provider = provider();
        let kp = Keypair::generate();
        let creator = creator_for(&kp);
        let message = b"block header bytes";
        let signature = kp.sign(message);

        let identity = provider.deserialize_identity("", &creator).unwrap();
        assert!(identity.verify(message, signature.as_bytes()).is_ok());
    }

    #[test]
    fn rejects_a_tampered_message() {
        let provider = provider();
        let kp = Keypair::generate();
        let creator = creator_for(&kp);
        let signature = kp.sign(b"original");

        let identity = provider.deserialize_identity("", &creator).unwrap();
        assert!(identity.verify(b"tampered", signature.as_bytes()).is_err());
    }

    #[test]
    fn rejects_unknown_msp_id() {
        let provider = provider();
        let kp = Keypair::generate();
        let creator = creator_for(&kp);
        assert!(matches!(
            provider.deserialize_identity("OtherMSP", &creator),
            Err(IdentityError::UnknownMspId(_))
        ));
    }

    #[test]
    fn rejects_undeserializable_creator() {
        let provider = provider();
        assert!(matches!(
            provider.deserialize_identity("", b"not a serialized identity"),
            Err(IdentityError::UndeserializableIdentity(_))
        ));
    }
}

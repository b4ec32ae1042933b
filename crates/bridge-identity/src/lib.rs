//! # Bridge Identity
//!
//! Ed25519 signature primitives plus the [`IdentityProvider`] abstraction
//! the bridge uses in place of a real membership service (MSP): turning
//! the opaque "creator" bytes in a signature header into something that
//! can verify a signature.
//!
//! ## Example
//!
//! ```rust
//! use bridge_identity::{Ed25519IdentityProvider, IdentityProvider, Keypair, SerializedIdentity};
//!
//! let provider = Ed25519IdentityProvider::new("DefaultMSP");
//! let keypair = Keypair::generate();
//! let creator = SerializedIdentity {
//!     msp_id: "DefaultMSP".to_string(),
//!     public_key: *keypair.public_key().as_bytes(),
//! }
//! .encode();
//!
//! let message = b"Hello, Bridge!";
//! let signature = keypair.sign(message);
//!
//! let identity = provider.deserialize_identity("", &creator).unwrap();
//! assert!(identity.verify(message, signature.as_bytes()).is_ok());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod keypair;
mod provider;
mod public_key;
mod signature;

pub use error::{IdentityError, Result};
pub use keypair::Keypair;
pub use provider::{Ed25519IdentityProvider, Identity, IdentityProvider, SerializedIdentity};
pub use public_key::PublicKey;
pub use signature::Signature;

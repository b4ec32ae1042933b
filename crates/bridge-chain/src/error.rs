//! Chain pipeline error types.

use crate::extract::ExtractError;
use thiserror::Error;

/// Errors returned by a chain's submit path or surfaced on its error
/// channel.
#[derive(Debug, Error)]
pub enum ChainError {
    /// The IPC write for a submission failed.
    #[error("submit failed: {0}")]
    Submit(#[from] bridge_ipc::IpcError),

    /// `Configure` could not extract the inner update envelope.
    #[error("config extraction failed: {0}")]
    ConfigExtract(#[from] ExtractError),

    /// The chain's exit signal has already fired.
    #[error("chain is exiting")]
    Exiting,
}

/// A specialized Result type for chain pipeline operations.
pub type Result<T> = std::result::Result<T, ChainError>;

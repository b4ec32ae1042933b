//! Delivery client error types.

use thiserror::Error;

/// Errors from connecting to or streaming from the ordering service.
#[derive(Debug, Error)]
pub enum DeliverError {
    /// The gRPC channel could not be established.
    #[error("connect failed: {0}")]
    Connect(#[source] tonic::transport::Error),

    /// The `Deliver` RPC could not be opened.
    #[error("deliver rpc failed: {0}")]
    Rpc(#[source] tonic::Status),

    /// The stream produced a transport-level error.
    #[error("stream error: {0}")]
    Stream(#[source] tonic::Status),
}

/// A specialized Result type for delivery client operations.
pub type Result<T> = std::result::Result<T, DeliverError>;

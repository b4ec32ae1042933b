//! Error types for IPC transport and bootstrap.

use thiserror::Error;

/// Errors from dialing, bootstrapping, or writing to the IPC transport.
#[derive(Debug, Error)]
pub enum IpcError {
    /// Dialing the control or a pool connection failed.
    #[error("dial failed for {0}: {1}")]
    Dial(String, #[source] std::io::Error),

    /// A read or write on an established connection failed.
    #[error("io error on {0}: {1}")]
    Io(&'static str, #[source] std::io::Error),
}

/// A specialized Result type for IPC operations.
pub type Result<T> = std::result::Result<T, IpcError>;

//! A dialed connection to the external consensus engine's Unix-domain
//! socket listener (control connection or one pool slot).

use crate::codec;
use crate::error::{IpcError, Result};
use std::path::Path;
use tokio::net::UnixStream;

/// One connection to the engine's IPC listener.
///
/// Wraps the raw stream so that submit-path callers go through the codec
/// rather than writing to the socket directly.
#[derive(Debug)]
pub struct IpcConnection {
    stream: UnixStream,
}

impl IpcConnection {
    /// Dials the engine's Unix-domain socket at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`IpcError::Dial`] if the connection cannot be established.
    pub async fn dial(path: &Path) -> Result<Self> {
        let stream = UnixStream::connect(path)
            .await
            .map_err(|e| IpcError::Dial(path.display().to_string(), e))?;
        Ok(Self { stream })
    }

    /// Writes a channel registration frame: `channelID` then `batchTimeout`
    /// nanoseconds.
    pub async fn write_registration(&mut self, channel_id: &str, batch_timeout_ns: u64) -> Result<()> {
        codec::write_string(&mut self.stream, channel_id)
            .await
            .map_err(|e| IpcError::Io("registration channel_id", e))?;
        codec::write_u64(&mut self.stream, batch_timeout_ns)
            .await
            .map_err(|e| IpcError::Io("registration batch_timeout", e))
    }

    /// Writes a submission frame: `channelID`, `isConfig`, `envelopeBytes`.
    pub async fn write_submission(
        &mut self,
        channel_id: &str,
        is_config: bool,
        envelope_bytes: &[u8],
    ) -> Result<()> {
        codec::write_string(&mut self.stream, channel_id)
            .await
            .map_err(|e| IpcError::Io("submission channel_id", e))?;
        codec::write_bool(&mut self.stream, is_config)
            .await
            .map_err(|e| IpcError::Io("submission is_config", e))?;
        codec::write_bytes(&mut self.stream, envelope_bytes)
            .await
            .map_err(|e| IpcError::Io("submission envelope_bytes", e))
    }
}

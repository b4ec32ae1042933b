//! Channel identity.

use std::fmt;

/// A channel identifier.
///
/// Exactly one chain pipeline exists per channel; exactly one channel is
/// the system channel responsible for the process-wide bootstrap.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct ChannelId(String);

impl ChannelId {
    /// Creates a channel ID from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the channel ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ChannelId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for ChannelId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_id_display_roundtrip() {
        let id = ChannelId::new("mychannel");
        assert_eq!(id.as_str(), "mychannel");
        assert_eq!(id.to_string(), "mychannel");
    }
}

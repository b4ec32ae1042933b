//! Send pool: a fixed set of connections to the external engine,
//! shared round-robin across submitters.
//!
//! This is deliberately narrower than a generic acquire/release
//! connection pool: slots are never "checked out" and returned to a free
//! list, they are perpetually shared, and the only thing serializing two
//! submissions on the same slot is that slot's own mutex.

use crate::connection::IpcConnection;
use crate::error::Result;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;

/// A fixed-size, round-robin-shared set of IPC connections.
///
/// The per-slot lock is a `tokio::sync::Mutex` rather than a plain one:
/// the lock is held across the three framed writes of a submission, all
/// of which are `.await` points.
#[derive(Debug)]
pub struct SendPool {
    slots: Vec<Mutex<IpcConnection>>,
    index: AtomicUsize,
}

impl SendPool {
    /// Builds a pool from already-dialed connections.
    #[must_use]
    pub fn new(connections: Vec<IpcConnection>) -> Self {
        Self {
            slots: connections.into_iter().map(Mutex::new).collect(),
            index: AtomicUsize::new(0),
        }
    }

    /// The number of slots in the pool.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the pool holds no slots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Advances the round-robin index and submits `(channel_id, is_config,
    /// envelope_bytes)` on the selected slot, under that slot's mutex.
    ///
    /// The index update is a plain, non-atomic-in-spirit `fetch_add`: a
    /// race between two submitters at worst picks the same slot, which
    /// then serializes the two writes on that slot's mutex.
    ///
    /// # Errors
    ///
    /// Returns an error if the write to the selected connection fails.
    pub async fn submit(
        &self,
        channel_id: &str,
        is_config: bool,
        envelope_bytes: &[u8],
    ) -> Result<()> {
        let i = self.index.fetch_add(1, Ordering::Relaxed) % self.slots.len();
        let mut conn = self.slots[i].lock().await;
        conn.write_submission(channel_id, is_config, envelope_bytes)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_robin_index_wraps() {
        let index = AtomicUsize::new(0);
        let picks: Vec<usize> = (0..5)
            .map(|_| index.fetch_add(1, Ordering::Relaxed) % 2)
            .collect();
        assert_eq!(picks, vec![0, 1, 0, 1, 0]);
    }
}

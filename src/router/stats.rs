//! Traffic statistics for a route
//!
//! Lock-free counter of bytes forwarded from serial to socket, read by
//! the listing facility while the relay thread is writing.

use std::sync::atomic::{AtomicU64, Ordering};

/// Forwarded-byte counter (lock-free)
pub struct RouteStats {
    forwarded_total: AtomicU64,
}

impl RouteStats {
    pub fn new() -> Self {
        Self {
            forwarded_total: AtomicU64::new(0),
        }
    }

    /// Add forwarded bytes (serial -> socket)
    #[inline]
    pub fn add_forwarded(&self, bytes: usize) {
        self.forwarded_total.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    /// Total bytes forwarded over the lifetime of the route
    #[inline]
    pub fn forwarded(&self) -> u64 {
        self.forwarded_total.load(Ordering::Relaxed)
    }
}

impl Default for RouteStats {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_accumulate() {
        let stats = RouteStats::new();
        assert_eq!(stats.forwarded(), 0);

        stats.add_forwarded(3);
        stats.add_forwarded(4096);
        assert_eq!(stats.forwarded(), 4099);
    }
}

//! Bounded pool of frame buffers.
//!
//! A best-effort cache: failing to reuse a buffer only costs an allocation.
//! Buffers are reused only on an exact size match and are never resized.

use std::fmt;

/// Pool counters (for diagnostics and leak checks)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Fresh allocations made by `acquire`
    pub allocated: u64,
    /// Acquisitions served from the pool
    pub reused: u64,
    /// Releases kept for reuse
    pub retained: u64,
    /// Releases dropped because the pool was full
    pub dropped_at_capacity: u64,
    /// Pooled buffers discarded because their size no longer matched
    pub discarded_mismatched: u64,
    /// Buffers currently held
    pub available: usize,
}

impl PoolStats {
    /// Total releases (retained or dropped)
    pub fn released(&self) -> u64 {
        self.retained + self.dropped_at_capacity
    }
}

/// Free-list of byte buffers with a fixed capacity
pub struct BufferPool {
    free: Vec<Vec<u8>>,
    capacity: usize,
    stats: PoolStats,
}

impl fmt::Debug for BufferPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufferPool")
            .field("available", &self.free.len())
            .field("capacity", &self.capacity)
            .finish()
    }
}

impl BufferPool {
    /// Create an empty pool that keeps at most `capacity` buffers
    pub fn new(capacity: usize) -> Self {
        Self {
            free: Vec::with_capacity(capacity),
            capacity,
            stats: PoolStats::default(),
        }
    }

    /// Take a buffer of exactly `size` bytes
    ///
    /// Reused buffers keep their previous contents; fresh ones are zeroed.
    pub fn acquire(&mut self, size: usize) -> Vec<u8> {
        if let Some(pos) = self.free.iter().position(|buf| buf.len() == size) {
            self.stats.reused += 1;
            return self.free.swap_remove(pos);
        }

        if !self.free.is_empty() {
            // Every held buffer has the wrong size for this request
            self.stats.discarded_mismatched += self.free.len() as u64;
            self.free.clear();
        }

        self.stats.allocated += 1;
        vec![0u8; size]
    }

    /// Return a buffer for reuse; dropped if the pool is full
    pub fn release(&mut self, buffer: Vec<u8>) {
        if self.free.len() < self.capacity {
            self.free.push(buffer);
            self.stats.retained += 1;
        } else {
            self.stats.dropped_at_capacity += 1;
        }
    }

    /// Drop every held buffer
    pub fn clear(&mut self) {
        self.free.clear();
    }

    /// Number of buffers currently held
    #[inline]
    pub fn len(&self) -> usize {
        self.free.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.free.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn stats(&self) -> PoolStats {
        PoolStats {
            available: self.free.len(),
            ..self.stats
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquire_empty_allocates_zeroed() {
        let mut pool = BufferPool::new(4);
        let buf = pool.acquire(16);
        assert_eq!(buf.len(), 16);
        assert!(buf.iter().all(|b| *b == 0));
        assert_eq!(pool.stats().allocated, 1);
    }

    #[test]
    fn test_release_then_acquire_reuses() {
        let mut pool = BufferPool::new(4);
        let mut buf = pool.acquire(16);
        buf[0] = 0xAB;
        let ptr = buf.as_ptr();
        pool.release(buf);

        let again = pool.acquire(16);
        assert_eq!(again.as_ptr(), ptr);
        assert_eq!(again[0], 0xAB);

        let stats = pool.stats();
        assert_eq!(stats.allocated, 1);
        assert_eq!(stats.reused, 1);
        assert_eq!(stats.available, 0);
    }

    #[test]
    fn test_capacity_bound() {
        let mut pool = BufferPool::new(2);
        for _ in 0..3 {
            pool.release(vec![0u8; 8]);
        }
        assert_eq!(pool.len(), 2);
        let stats = pool.stats();
        assert_eq!(stats.retained, 2);
        assert_eq!(stats.dropped_at_capacity, 1);
        assert_eq!(stats.released(), 3);
    }

    #[test]
    fn test_size_mismatch_discards_and_allocates() {
        let mut pool = BufferPool::new(4);
        pool.release(vec![0u8; 8]);
        pool.release(vec![0u8; 8]);

        let buf = pool.acquire(12);
        assert_eq!(buf.len(), 12);

        let stats = pool.stats();
        assert_eq!(stats.allocated, 1);
        assert_eq!(stats.reused, 0);
        assert_eq!(stats.discarded_mismatched, 2);
        assert!(pool.is_empty());
    }

    #[test]
    fn test_exact_match_preferred_over_mismatch() {
        let mut pool = BufferPool::new(4);
        pool.release(vec![0u8; 8]);
        pool.release(vec![0u8; 12]);

        let buf = pool.acquire(12);
        assert_eq!(buf.len(), 12);
        assert_eq!(pool.stats().reused, 1);
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn test_clear_empties_pool() {
        let mut pool = BufferPool::new(4);
        pool.release(vec![0u8; 8]);
        pool.clear();
        assert!(pool.is_empty());
        assert_eq!(pool.stats().available, 0);
    }

    #[test]
    fn test_zero_capacity_never_retains() {
        let mut pool = BufferPool::new(0);
        pool.release(vec![0u8; 8]);
        assert!(pool.is_empty());
        assert_eq!(pool.stats().dropped_at_capacity, 1);
    }
}

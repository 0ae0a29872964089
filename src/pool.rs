//! Bounded pool of caller-owned resource handles
//!
//! Pure bookkeeping over opaque handles (e.g. database connections):
//! the pool never creates, validates, or destroys them. `acquire`
//! returns the most recently released handle (LIFO), and a release
//! beyond capacity drops the handle for the caller to rebuild.

use parking_lot::Mutex;

/// Bounded LIFO handle pool
///
/// One lock per instance guarding the available handles; both
/// operations are O(1).
pub struct ResourcePool<T> {
    available: Mutex<Vec<T>>,
    capacity: usize,
}

impl<T> ResourcePool<T> {
    /// Create an empty pool retaining at most `capacity` handles
    pub fn new(capacity: usize) -> Self {
        Self {
            available: Mutex::new(Vec::with_capacity(capacity)),
            capacity,
        }
    }

    /// Take a handle if any are available
    ///
    /// Exhaustion is a valid outcome, not an error: the caller
    /// creates a fresh resource out-of-band and may release it here
    /// when done.
    pub fn acquire(&self) -> Option<T> {
        self.available.lock().pop()
    }

    /// Return a handle to the pool
    ///
    /// When the pool already holds `capacity` handles the returned
    /// handle is silently dropped.
    pub fn release(&self, handle: T) {
        let mut available = self.available.lock();
        if available.len() < self.capacity {
            available.push(handle);
        }
    }

    /// Number of handles currently available
    pub fn len(&self) -> usize {
        self.available.lock().len()
    }

    /// Check if no handles are available
    pub fn is_empty(&self) -> bool {
        self.available.lock().is_empty()
    }

    /// Maximum handles retained
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_pool() {
        let pool: ResourcePool<i32> = ResourcePool::new(2);
        assert!(pool.is_empty());
        assert_eq!(pool.acquire(), None);
    }

    #[test]
    fn test_exhaustion() {
        let pool = ResourcePool::new(2);
        pool.release(1);
        pool.release(2);

        assert!(pool.acquire().is_some());
        assert!(pool.acquire().is_some());
        assert_eq!(pool.acquire(), None);
    }

    #[test]
    fn test_release_beyond_capacity_drops() {
        let pool = ResourcePool::new(2);
        pool.release(1);
        pool.release(2);
        pool.release(3); // dropped, no panic

        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn test_lifo_order() {
        let pool = ResourcePool::new(3);
        pool.release("a");
        pool.release("b");

        assert_eq!(pool.acquire(), Some("b"));
        assert_eq!(pool.acquire(), Some("a"));
    }

    #[test]
    fn test_drop_runs_for_discarded_handle() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        struct Handle(Arc<AtomicUsize>);
        impl Drop for Handle {
            fn drop(&mut self) {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }

        let drops = Arc::new(AtomicUsize::new(0));
        let pool = ResourcePool::new(1);
        pool.release(Handle(Arc::clone(&drops)));
        pool.release(Handle(Arc::clone(&drops)));

        // Only the overflow handle was dropped
        assert_eq!(drops.load(Ordering::SeqCst), 1);
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn test_concurrent_access() {
        use std::sync::Arc;
        use std::thread;

        let pool = Arc::new(ResourcePool::new(100));
        for i in 0..100 {
            pool.release(i);
        }

        let handles: Vec<_> = (0..10)
            .map(|_| {
                let pool = Arc::clone(&pool);
                thread::spawn(move || {
                    for _ in 0..500 {
                        if let Some(handle) = pool.acquire() {
                            pool.release(handle);
                        }
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert!(pool.len() <= 100);
        assert!(!pool.is_empty());
    }

    #[test]
    fn test_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ResourcePool<Vec<u8>>>();
    }
}

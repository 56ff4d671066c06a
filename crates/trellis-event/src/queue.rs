//! Lock-Free Event Queue
//!
//! Multi-producer, single-consumer unbounded queue. Producers only touch the
//! producer end with a single atomic swap; the consumer end is owned by the
//! thread draining the queue.

use std::ptr;
use std::sync::Mutex;
use std::sync::atomic::{AtomicPtr, AtomicUsize, Ordering};

/// Node in the MPSC queue
struct MpscNode<T> {
    value: Option<T>,
    next: AtomicPtr<MpscNode<T>>,
}

impl<T> MpscNode<T> {
    fn empty() -> *mut Self {
        Self::alloc(None)
    }

    fn alloc(value: Option<T>) -> *mut Self {
        Box::into_raw(Box::new(Self {
            value,
            next: AtomicPtr::new(ptr::null_mut()),
        }))
    }
}

/// Multi-producer, single-consumer unbounded queue
///
/// `push` is lock-free for any number of producers. `pop` is meant for a
/// single draining thread; the consumer lock only serializes accidental
/// concurrent consumers and is never taken by producers.
pub struct MpscQueue<T> {
    /// Most recently pushed node (producer side)
    head: AtomicPtr<MpscNode<T>>,
    /// Stub node preceding the oldest value (consumer side)
    tail: Mutex<*mut MpscNode<T>>,
    /// Approximate length
    len: AtomicUsize,
}

impl<T> MpscQueue<T> {
    /// Create a new MPSC queue
    pub fn new() -> Self {
        let stub = MpscNode::empty();
        Self {
            head: AtomicPtr::new(stub),
            tail: Mutex::new(stub),
            len: AtomicUsize::new(0),
        }
    }

    /// Push an item (lock-free for multiple producers)
    pub fn push(&self, value: T) {
        let node = MpscNode::alloc(Some(value));
        // Counted before linking so `len` never underflows under a racing pop
        self.len.fetch_add(1, Ordering::AcqRel);

        let prev = self.head.swap(node, Ordering::AcqRel);
        // SAFETY: `prev` stays alive until its `next` is set: the consumer
        // only frees a node after moving past it, which needs `next`.
        unsafe { (*prev).next.store(node, Ordering::Release) };
    }

    /// Pop the oldest item.
    ///
    /// May return `None` while a producer is between its swap and its link;
    /// the item becomes visible to the next call.
    pub fn pop(&self) -> Option<T> {
        let mut tail = self.tail.lock().unwrap_or_else(|e| e.into_inner());
        let stub = *tail;

        // SAFETY: the consumer end is only accessed under the lock and the
        // stub is never freed while it is the consumer end.
        let next = unsafe { (*stub).next.load(Ordering::Acquire) };
        if next.is_null() {
            return None;
        }

        *tail = next;
        // SAFETY: `next` is fully linked and becomes the new stub; its value
        // is read exactly once. The old stub is unreachable for producers.
        let value = unsafe {
            let value = (*next).value.take();
            drop(Box::from_raw(stub));
            value
        };
        self.len.fetch_sub(1, Ordering::AcqRel);
        value
    }

    /// Check if empty (advisory under concurrent pushes)
    pub fn is_empty(&self) -> bool {
        self.len.load(Ordering::Acquire) == 0
    }

    /// Get approximate length
    pub fn len(&self) -> usize {
        self.len.load(Ordering::Acquire)
    }

    /// Pop everything currently visible, returning how many items were dropped
    pub fn clear(&self) -> usize {
        let mut dropped = 0;
        while self.pop().is_some() {
            dropped += 1;
        }
        dropped
    }
}

impl<T> Default for MpscQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for MpscQueue<T> {
    fn drop(&mut self) {
        // Drain and free all nodes
        while self.pop().is_some() {}

        // Free the stub node
        let stub = *self.tail.get_mut().unwrap_or_else(|e| e.into_inner());
        if !stub.is_null() {
            unsafe { drop(Box::from_raw(stub)) };
        }
    }
}

// SAFETY: values move between threads through the queue; nodes are only
// freed by the consumer end.
unsafe impl<T: Send> Send for MpscQueue<T> {}
unsafe impl<T: Send> Sync for MpscQueue<T> {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_mpsc_basic() {
        let queue: MpscQueue<i32> = MpscQueue::new();

        assert!(queue.is_empty());

        queue.push(1);
        queue.push(2);
        queue.push(3);

        assert!(!queue.is_empty());
        assert_eq!(queue.len(), 3);

        assert_eq!(queue.pop(), Some(1));
        assert_eq!(queue.pop(), Some(2));
        assert_eq!(queue.pop(), Some(3));
        assert_eq!(queue.pop(), None);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_mpsc_interleaved() {
        let queue = MpscQueue::new();
        queue.push("a");
        assert_eq!(queue.pop(), Some("a"));
        queue.push("b");
        queue.push("c");
        assert_eq!(queue.pop(), Some("b"));
        queue.push("d");
        assert_eq!(queue.pop(), Some("c"));
        assert_eq!(queue.pop(), Some("d"));
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn test_mpsc_clear() {
        let queue = MpscQueue::new();
        for i in 0..5 {
            queue.push(i);
        }
        assert_eq!(queue.clear(), 5);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_mpsc_drop_frees_pending_values() {
        let marker = Arc::new(());
        {
            let queue = MpscQueue::new();
            queue.push(Arc::clone(&marker));
            queue.push(Arc::clone(&marker));
            assert_eq!(Arc::strong_count(&marker), 3);
        }
        assert_eq!(Arc::strong_count(&marker), 1);
    }

    #[test]
    fn test_mpsc_concurrent() {
        let queue = Arc::new(MpscQueue::new());
        let mut handles = vec![];

        for t in 0..4 {
            let queue = Arc::clone(&queue);
            handles.push(thread::spawn(move || {
                for i in 0..100 {
                    queue.push(t * 100 + i);
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        let mut received = Vec::new();
        while let Some(v) = queue.pop() {
            received.push(v);
        }

        // Per-producer order is preserved
        for t in 0..4 {
            let own: Vec<_> = received.iter().filter(|v| **v / 100 == t).copied().collect();
            assert_eq!(own, (t * 100..t * 100 + 100).collect::<Vec<_>>());
        }
        assert_eq!(received.len(), 400);
    }
}

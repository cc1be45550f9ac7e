//! Bounded deque for the in-memory notice log
//!
//! Fixed capacity; the oldest item is evicted when a new one is pushed into a
//! full deque.

use std::collections::VecDeque;

/// A bounded deque with FIFO eviction
#[derive(Clone, Debug)]
pub struct BoundedDeque<T> {
    cap: usize,
    buf: VecDeque<T>,
}

impl<T> BoundedDeque<T> {
    /// # Arguments
    /// * `cap` - Maximum number of items to keep. If 0, pushes are no-ops.
    pub fn new(cap: usize) -> Self {
        Self {
            cap,
            buf: VecDeque::with_capacity(cap.min(1024)),
        }
    }

    /// Push a value, evicting the oldest if at capacity
    pub fn push(&mut self, value: T) {
        if self.cap == 0 {
            return;
        }
        if self.buf.len() == self.cap {
            self.buf.pop_front();
        }
        self.buf.push_back(value);
    }

    /// Oldest to newest
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> {
        self.buf.iter()
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Most recent item
    pub fn last(&self) -> Option<&T> {
        self.buf.back()
    }
}

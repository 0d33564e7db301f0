//! Thread-safe hand-off queue between the message pump and the poll loop.
//!
//! # Producer / consumer (for beginners)
//!
//! The window's message pump *produces* records: it runs the interceptor
//! every time Windows delivers a pointer message.  The host framework's poll
//! loop *consumes* them once per frame.  The two may run on different
//! threads, so the queue guards its `VecDeque` with a `Mutex`.
//!
//! New records are pushed at the front and taken from the back, which makes
//! the queue FIFO overall: the oldest record is always delivered first.
//!
//! The lock is held only for the duration of a single push or pop.  The
//! consumer never holds it while running host callbacks, so a slow frame can
//! not stall the message pump.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::domain::event::PointerEventRecord;

/// FIFO queue of decoded pointer events.
#[derive(Debug, Default)]
pub struct EventQueue {
    inner: Mutex<VecDeque<PointerEventRecord>>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record at the front (newest end).
    pub fn push(&self, record: PointerEventRecord) {
        self.lock().push_front(record);
    }

    /// Removes and returns the oldest record, or `None` when empty.
    pub fn pop_oldest(&self) -> Option<PointerEventRecord> {
        self.lock().pop_back()
    }

    /// Discards every queued record and returns how many were dropped.
    pub fn clear(&self) -> usize {
        let mut guard = self.lock();
        let dropped = guard.len();
        guard.clear();
        dropped
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // Records are plain `Copy` data, so a panic while the lock was held can
    // not leave a half-written entry behind; recover the guard.
    fn lock(&self) -> MutexGuard<'_, VecDeque<PointerEventRecord>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::event::EventKind;
    use std::sync::Arc;
    use std::thread;

    fn record(kind: EventKind, pressure: u32) -> PointerEventRecord {
        PointerEventRecord::new(kind, 0.0, 0.0, pressure)
    }

    #[test]
    fn test_queue_is_fifo() {
        // Arrange
        let queue = EventQueue::new();
        queue.push(record(EventKind::Begin, 1));
        queue.push(record(EventKind::Update, 2));
        queue.push(record(EventKind::End, 3));

        // Act
        let drained: Vec<u32> = std::iter::from_fn(|| queue.pop_oldest())
            .map(|r| r.pressure)
            .collect();

        // Assert
        assert_eq!(drained, vec![1, 2, 3]);
    }

    #[test]
    fn test_pop_on_empty_queue_returns_none() {
        let queue = EventQueue::new();
        assert!(queue.is_empty());
        assert_eq!(queue.pop_oldest(), None);
    }

    #[test]
    fn test_clear_reports_dropped_count() {
        let queue = EventQueue::new();
        queue.push(record(EventKind::Begin, 0));
        queue.push(record(EventKind::Update, 0));

        assert_eq!(queue.clear(), 2);
        assert_eq!(queue.len(), 0);
    }

    #[test]
    fn test_concurrent_producer_preserves_per_thread_order() {
        // Arrange
        let queue = Arc::new(EventQueue::new());
        let producer = {
            let q = Arc::clone(&queue);
            thread::spawn(move || {
                for i in 0..1000 {
                    q.push(record(EventKind::Update, i));
                }
            })
        };

        // Act – drain concurrently with the producer
        let mut seen = Vec::new();
        while seen.len() < 1000 {
            if let Some(r) = queue.pop_oldest() {
                seen.push(r.pressure);
            } else {
                thread::yield_now();
            }
        }
        producer.join().expect("producer panicked");

        // Assert
        let expected: Vec<u32> = (0..1000).collect();
        assert_eq!(seen, expected);
    }
}

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

/// FIFO handoff from workers to the driver.
///
/// The lock is held only while a result is pushed or while the whole queue
/// is swapped out, so workers never wait on driver-side callbacks.
#[derive(Debug)]
pub struct ResultQueue<T> {
    items: Mutex<VecDeque<T>>,
    delivered: AtomicU64,
}

impl<T> Default for ResultQueue<T> {
    fn default() -> Self {
        Self {
            items: Mutex::new(VecDeque::new()),
            delivered: AtomicU64::new(0),
        }
    }
}

impl<T> ResultQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, item: T) {
        self.items.lock().push_back(item);
    }

    /// Take everything queued so far, in arrival order
    pub fn drain_all(&self) -> VecDeque<T> {
        let drained = std::mem::take(&mut *self.items.lock());
        self.delivered
            .fetch_add(drained.len() as u64, Ordering::Relaxed);
        drained
    }

    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Results handed to the driver so far
    pub fn delivered(&self) -> u64 {
        self.delivered.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_drain_preserves_fifo_order() {
        let queue = ResultQueue::new();
        queue.push(1);
        queue.push(2);
        queue.push(3);
        assert_eq!(queue.drain_all().into_iter().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert!(queue.is_empty());
        assert_eq!(queue.delivered(), 3);
        assert!(queue.drain_all().is_empty());
    }

    #[test]
    fn test_concurrent_producers_lose_nothing() {
        let queue = Arc::new(ResultQueue::new());
        let handles: Vec<_> = (0..4)
            .map(|worker| {
                let queue = Arc::clone(&queue);
                thread::spawn(move || {
                    for i in 0..250 {
                        queue.push((worker, i));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let drained = queue.drain_all();
        assert_eq!(drained.len(), 1000);
        // Per-producer order survives
        for worker in 0..4 {
            let seen: Vec<_> = drained
                .iter()
                .filter(|(w, _)| *w == worker)
                .map(|(_, i)| *i)
                .collect();
            assert_eq!(seen, (0..250).collect::<Vec<_>>());
        }
    }
}

//! Pending Async Work
//!
//! Futures started by the game loop (score saves, score fetches, level
//! loads) are parked here and polled without blocking at the start of each
//! frame. Their outputs are applied at that tick boundary and nowhere else.

use std::fmt;
use std::task::{Context, Poll};

use futures_util::future::BoxFuture;
use futures_util::stream::{FuturesUnordered, StreamExt};
use futures_util::task::noop_waker_ref;

/// Set of in-flight futures producing `T`.
pub struct PendingTasks<T> {
    futures: FuturesUnordered<BoxFuture<'static, T>>,
}

impl<T> Default for PendingTasks<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for PendingTasks<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingTasks").field("in_flight", &self.futures.len()).finish()
    }
}

impl<T> PendingTasks<T> {
    /// Empty set.
    pub fn new() -> Self {
        Self {
            futures: FuturesUnordered::new(),
        }
    }

    /// Start tracking a future.
    pub fn push(&mut self, future: BoxFuture<'static, T>) {
        self.futures.push(future);
    }

    /// Number of futures still in flight.
    pub fn len(&self) -> usize {
        self.futures.len()
    }

    /// Check if nothing is in flight.
    pub fn is_empty(&self) -> bool {
        self.futures.is_empty()
    }

    /// Poll every future once and return the outputs of those that finished.
    ///
    /// Never blocks. Futures still pending stay in the set for the next call.
    pub fn drain_ready(&mut self) -> Vec<T> {
        let mut ready = Vec::new();
        let mut cx = Context::from_waker(noop_waker_ref());

        while let Poll::Ready(Some(output)) = self.futures.poll_next_unpin(&mut cx) {
            ready.push(output);
        }

        ready
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::future::FutureExt;
    use tokio::sync::oneshot;

    #[test]
    fn test_ready_futures_drain_immediately() {
        let mut tasks: PendingTasks<u32> = PendingTasks::new();
        tasks.push(async { 1 }.boxed());
        tasks.push(async { 2 }.boxed());

        let mut done = tasks.drain_ready();
        done.sort();
        assert_eq!(done, vec![1, 2]);
        assert!(tasks.is_empty());
    }

    #[test]
    fn test_pending_futures_stay_parked() {
        let mut tasks: PendingTasks<u32> = PendingTasks::new();
        let (tx, rx) = oneshot::channel::<u32>();
        tasks.push(async move { rx.await.unwrap_or(0) }.boxed());

        assert!(tasks.drain_ready().is_empty());
        assert_eq!(tasks.len(), 1);

        tx.send(7).unwrap();
        assert_eq!(tasks.drain_ready(), vec![7]);
        assert!(tasks.is_empty());
    }

    #[test]
    fn test_empty_drain() {
        let mut tasks: PendingTasks<()> = PendingTasks::default();
        assert!(tasks.drain_ready().is_empty());
    }
}

//! Cancellable one-shot deferred callbacks.
//!
//! A deferred task never touches component state directly. It sends a
//! `SessionEvent` tagged with its `Ticket`, and the owning component only
//! applies the event while it still holds the matching `Deferred`.
//! Dropping the `Deferred` aborts the task, so a torn-down component
//! cannot receive a late completion.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::task::JoinHandle;

static NEXT_TICKET: AtomicU64 = AtomicU64::new(1);

/// Identifies one scheduled completion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

impl Ticket {
    fn next() -> Self {
        Self(NEXT_TICKET.fetch_add(1, Ordering::Relaxed))
    }
}

/// Handle to a pending deferred completion
#[derive(Debug)]
pub struct Deferred {
    ticket: Ticket,
    handle: JoinHandle<()>,
}

impl Deferred {
    /// Spawn `make(ticket)` on the current tokio runtime.
    ///
    /// Panics if called outside a runtime, like `tokio::spawn`.
    pub fn spawn<F, Fut>(make: F) -> Self
    where
        F: FnOnce(Ticket) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let ticket = Ticket::next();
        let handle = tokio::spawn(make(ticket));
        Self { ticket, handle }
    }

    pub fn ticket(&self) -> Ticket {
        self.ticket
    }
}

impl Drop for Deferred {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::sync::mpsc;

    #[tokio::test(start_paused = true)]
    async fn test_dropped_deferred_never_fires() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let deferred = Deferred::spawn(|ticket| async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            let _ = tx.send(ticket);
        });
        drop(deferred);

        tokio::time::sleep(Duration::from_secs(1)).await;
        // Sender was owned by the aborted task, so the channel is closed and empty
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_deferred_fires_with_its_ticket() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let deferred = Deferred::spawn(|ticket| async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            let _ = tx.send(ticket);
        });

        assert_eq!(rx.recv().await, Some(deferred.ticket()));
    }

    #[test]
    fn test_tickets_are_unique() {
        let a = Ticket::next();
        let b = Ticket::next();
        assert_ne!(a, b);
    }
}

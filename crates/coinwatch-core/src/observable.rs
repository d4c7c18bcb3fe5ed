//! Publish/subscribe cell shared by the stores.
//!
//! A [`StateChannel`] owns one value and offers two read-only views of it:
//!
//! - [`StateChannel::watch`] hands out a `watch::Receiver` that always holds
//!   the latest value. Renderers use this; intermediate values may be skipped.
//! - [`StateChannel::transitions`] hands out a [`Transitions`] stream that
//!   yields every published value in order, starting after the value current
//!   at subscription time.
//!
//! Publication is synchronous: when [`StateChannel::publish`] returns, both
//! views already carry the new value.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::{broadcast, watch};
use tracing::warn;

/// Buffered transitions per subscriber before the oldest are dropped.
const TRANSITION_CAPACITY: usize = 64;

#[derive(Debug)]
pub struct StateChannel<T> {
    latest: watch::Sender<T>,
    transitions: broadcast::Sender<T>,
    gate: Mutex<()>,
}

impl<T> StateChannel<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(initial: T) -> Self {
        let (latest, _) = watch::channel(initial);
        let (transitions, _) = broadcast::channel(TRANSITION_CAPACITY);
        Self {
            latest,
            transitions,
            gate: Mutex::new(()),
        }
    }

    pub fn current(&self) -> T {
        self.latest.borrow().clone()
    }

    pub fn watch(&self) -> watch::Receiver<T> {
        self.latest.subscribe()
    }

    /// Current value plus a stream of everything published after it.
    pub fn transitions(&self) -> (T, Transitions<T>) {
        let _gate = self.lock_gate();
        (self.current(), Transitions::new(self.transitions.subscribe()))
    }

    /// Mutate the value in place and notify every subscriber.
    pub fn publish(&self, mutate: impl FnOnce(&mut T)) -> T {
        let _gate = self.lock_gate();
        self.latest.send_modify(mutate);
        let value = self.current();
        // No transition subscribers is not an error.
        let _ = self.transitions.send(value.clone());
        value
    }

    /// Replace the value and notify every subscriber.
    pub fn replace(&self, value: T) -> T {
        self.publish(|slot| *slot = value)
    }

    fn lock_gate(&self) -> MutexGuard<'_, ()> {
        self.gate.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Ordered stream of published values.
#[derive(Debug)]
pub struct Transitions<T> {
    receiver: broadcast::Receiver<T>,
}

impl<T> Transitions<T>
where
    T: Clone,
{
    fn new(receiver: broadcast::Receiver<T>) -> Self {
        Self { receiver }
    }

    /// Wait for the next value. `None` once the owning store is gone.
    pub async fn next(&mut self) -> Option<T> {
        loop {
            match self.receiver.recv().await {
                Ok(value) => return Some(value),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "transition subscriber lagged; oldest values dropped");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Next value if one is already buffered.
    pub fn try_next(&mut self) -> Option<T> {
        loop {
            match self.receiver.try_recv() {
                Ok(value) => return Some(value),
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    warn!(skipped, "transition subscriber lagged; oldest values dropped");
                }
                Err(_) => return None,
            }
        }
    }

    /// Everything buffered right now, oldest first.
    pub fn drain(&mut self) -> Vec<T> {
        std::iter::from_fn(|| self.try_next()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publish_is_visible_to_both_views_immediately() {
        let channel = StateChannel::new(0_u32);
        let watcher = channel.watch();
        let (initial, mut transitions) = channel.transitions();

        channel.publish(|value| *value += 1);
        channel.replace(7);

        assert_eq!(initial, 0);
        assert_eq!(*watcher.borrow(), 7);
        assert_eq!(channel.current(), 7);
        assert_eq!(transitions.drain(), vec![1, 7]);
    }

    #[test]
    fn late_subscribers_start_after_current_value() {
        let channel = StateChannel::new(String::from("a"));
        channel.replace(String::from("b"));

        let (current, mut transitions) = channel.transitions();
        channel.replace(String::from("c"));

        assert_eq!(current, "b");
        assert_eq!(transitions.drain(), vec![String::from("c")]);
    }

    #[tokio::test]
    async fn next_waits_for_publication() {
        let channel = std::sync::Arc::new(StateChannel::new(false));
        let (_, mut transitions) = channel.transitions();

        let publisher = std::sync::Arc::clone(&channel);
        tokio::spawn(async move {
            publisher.replace(true);
        });

        assert_eq!(transitions.next().await, Some(true));
    }
}

//! A small observable state holder.

use std::fmt;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use async_channel::{Receiver, Sender, unbounded};
use futures::Stream;

/// A shared value whose updates can be observed.
///
/// Cloning the cell clones a handle to the same value. [`set`] stores the
/// new value and then delivers it to every live watcher in subscription
/// order.
///
/// [`set`]: StateCell::set
pub struct StateCell<T> {
    inner: Arc<Inner<T>>,
}

struct Inner<T> {
    value: Mutex<T>,
    watchers: Mutex<Vec<Sender<T>>>,
}

impl<T: Clone> StateCell<T> {
    /// A cell holding `value`.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(Inner {
                value: Mutex::new(value),
                watchers: Mutex::new(Vec::new()),
            }),
        }
    }

    /// The current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.inner
            .value
            .lock()
            .expect("state value mutex poisoned")
            .clone()
    }

    /// Store `value` and notify watchers.
    ///
    /// Watchers whose receiving end has been dropped are pruned here.
    pub fn set(&self, value: T) {
        {
            let mut guard = self.inner.value.lock().expect("state value mutex poisoned");
            *guard = value.clone();
        }

        let mut watchers = self
            .inner
            .watchers
            .lock()
            .expect("state watchers mutex poisoned");
        watchers.retain(|sender| sender.try_send(value.clone()).is_ok());
    }

    /// Subscribe to values stored after this call.
    ///
    /// The watcher does not see the current value; pair it with [`get`]
    /// when the starting point matters.
    ///
    /// [`get`]: StateCell::get
    #[must_use]
    pub fn subscribe(&self) -> StateWatcher<T> {
        let (sender, receiver) = unbounded();
        self.inner
            .watchers
            .lock()
            .expect("state watchers mutex poisoned")
            .push(sender);
        StateWatcher {
            receiver: Box::pin(receiver),
        }
    }
}

impl<T: Clone + Default> Default for StateCell<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> Clone for StateCell<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Clone + fmt::Debug> fmt::Debug for StateCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateCell").field("value", &self.get()).finish()
    }
}

/// Receives the values a [`StateCell`] is set to.
#[derive(Debug)]
pub struct StateWatcher<T> {
    // Boxed because `Receiver` is `!Unpin` and `poll_next` needs a pinned
    // handle to it.
    receiver: Pin<Box<Receiver<T>>>,
}

impl<T> StateWatcher<T> {
    /// Wait for the next stored value.
    ///
    /// Returns `None` once every handle of the cell has been dropped.
    pub async fn changed(&mut self) -> Option<T> {
        self.receiver.recv().await.ok()
    }
}

impl<T> Stream for StateWatcher<T> {
    type Item = T;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<T>> {
        self.get_mut().receiver.as_mut().poll_next(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_returns_latest_set() {
        let cell = StateCell::new(1);
        assert_eq!(cell.get(), 1);
        cell.set(2);
        assert_eq!(cell.get(), 2);
    }

    #[test]
    fn clones_share_the_value() {
        let cell = StateCell::new("a".to_string());
        let handle = cell.clone();
        handle.set("b".to_string());
        assert_eq!(cell.get(), "b");
    }

    #[tokio::test]
    async fn watcher_sees_updates_in_order() {
        let cell = StateCell::new(0);
        let mut watcher = cell.subscribe();

        cell.set(1);
        cell.set(2);

        assert_eq!(watcher.changed().await, Some(1));
        assert_eq!(watcher.changed().await, Some(2));
    }

    #[tokio::test]
    async fn watcher_misses_values_stored_before_subscribing() {
        let cell = StateCell::new(0);
        cell.set(1);

        let mut watcher = cell.subscribe();
        cell.set(2);
        assert_eq!(watcher.changed().await, Some(2));
    }

    #[test]
    fn dropped_watchers_are_pruned_on_set() {
        let cell = StateCell::new(0);
        let watcher = cell.subscribe();
        drop(watcher);

        cell.set(1);
        assert_eq!(cell.inner.watchers.lock().expect("watchers").len(), 0);
    }

    #[tokio::test]
    async fn watcher_ends_when_cell_is_dropped() {
        let cell = StateCell::new(0);
        let mut watcher = cell.subscribe();
        drop(cell);
        assert_eq!(watcher.changed().await, None);
    }
}

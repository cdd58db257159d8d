//! Synchronous publish/subscribe primitive.
//!
//! A [`Signal`] holds a list of callbacks. [`Signal::emit`] invokes every
//! callback in subscription order before returning, so subscribers observe a
//! change within the same scheduling turn as the mutation that caused it.
//! Subscribing returns a [`Subscription`] handle; dropping the handle (or
//! calling [`Subscription::unsubscribe`]) removes the callback.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Subscribers<T> {
    next_id: u64,
    entries: Vec<(u64, Callback<T>)>,
}

/// A multi-subscriber notification channel.
///
/// Cloning a `Signal` yields another handle to the same subscriber list.
pub struct Signal<T> {
    inner: Arc<Mutex<Subscribers<T>>>,
}

impl<T: 'static> Signal<T> {
    /// Creates a signal with no subscribers.
    pub fn new() -> Self {
        Signal {
            inner: Arc::new(Mutex::new(Subscribers {
                next_id: 0,
                entries: Vec::new(),
            })),
        }
    }

    /// Registers `callback`, returning the handle that keeps it registered.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = {
            let mut subscribers = lock(&self.inner);
            let id = subscribers.next_id;
            subscribers.next_id += 1;
            subscribers.entries.push((id, Arc::new(callback)));
            id
        };

        let weak: Weak<Mutex<Subscribers<T>>> = Arc::downgrade(&self.inner);
        Subscription {
            detach: Some(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    lock(&inner).entries.retain(|(entry_id, _)| *entry_id != id);
                }
            })),
        }
    }

    /// Invokes every current subscriber with `value`.
    ///
    /// The subscriber list is copied before the calls, so a callback may
    /// subscribe or unsubscribe without deadlocking.
    pub fn emit(&self, value: &T) {
        let callbacks: Vec<Callback<T>> = lock(&self.inner)
            .entries
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();
        for callback in callbacks {
            callback(value);
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        lock(&self.inner).entries.len()
    }
}

impl<T: 'static> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Signal {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> std::fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("subscribers", &lock(&self.inner).entries.len())
            .finish()
    }
}

/// Handle returned by [`Signal::subscribe`].
///
/// The callback stays registered for as long as the handle lives.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    detach: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    /// Removes the callback from its signal.
    pub fn unsubscribe(mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }

    /// Leaves the callback registered for the lifetime of the signal.
    pub fn forget(mut self) {
        self.detach = None;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.detach.is_some())
            .finish()
    }
}

fn lock<T>(inner: &Mutex<Subscribers<T>>) -> MutexGuard<'_, Subscribers<T>> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_emit_reaches_all_subscribers_in_order() {
        let signal = Signal::<u32>::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let a = {
            let seen = Arc::clone(&seen);
            signal.subscribe(move |v| seen.lock().unwrap().push(("a", *v)))
        };
        let b = {
            let seen = Arc::clone(&seen);
            signal.subscribe(move |v| seen.lock().unwrap().push(("b", *v)))
        };

        signal.emit(&7);
        assert_eq!(*seen.lock().unwrap(), vec![("a", 7), ("b", 7)]);
        drop((a, b));
    }

    #[test]
    fn test_drop_unsubscribes() {
        let signal = Signal::<()>::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let sub = {
            let hits = Arc::clone(&hits);
            signal.subscribe(move |_| {
                hits.fetch_add(1, Ordering::SeqCst);
            })
        };

        signal.emit(&());
        drop(sub);
        signal.emit(&());

        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(signal.subscriber_count(), 0);
    }

    #[test]
    fn test_explicit_unsubscribe_only_removes_own_callback() {
        let signal = Signal::<()>::new();
        let first = signal.subscribe(|_| {});
        let second = signal.subscribe(|_| {});
        assert_eq!(signal.subscriber_count(), 2);

        first.unsubscribe();
        assert_eq!(signal.subscriber_count(), 1);
        drop(second);
        assert_eq!(signal.subscriber_count(), 0);
    }

    #[test]
    fn test_forget_keeps_callback() {
        let signal = Signal::<()>::new();
        signal.subscribe(|_| {}).forget();
        assert_eq!(signal.subscriber_count(), 1);
    }

    #[test]
    fn test_callback_may_subscribe_during_emit() {
        let signal = Signal::<()>::new();
        let inner = signal.clone();
        let _sub = signal.subscribe(move |_| inner.subscribe(|_| {}).forget());
        signal.emit(&());
        assert_eq!(signal.subscriber_count(), 2);
    }

    #[test]
    fn test_subscription_outliving_signal_is_harmless() {
        let signal = Signal::<()>::new();
        let sub = signal.subscribe(|_| {});
        drop(signal);
        sub.unsubscribe();
    }
}

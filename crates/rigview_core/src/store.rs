//! Single-value reactive stores
//!
//! A [`Store<T>`] holds one current value and a list of subscribers. It is
//! the only shared mutable state in the viewer: components never talk to
//! each other directly, they write stores they own and subscribe to stores
//! owned by others.
//!
//! Delivery rules:
//!
//! - `subscribe` hands the current value to the new callback synchronously,
//!   exactly once, before any later update.
//! - `set` notifies every subscriber synchronously, in subscription order.
//! - No coalescing: setting a value equal to the current one still produces
//!   a full notification round.
//! - A `set` issued from inside a notification round is queued and drained
//!   after the active round completes, each queued value getting its own
//!   round. Subscribing or unsubscribing during a round takes effect from
//!   the next round.
//! - A callback that panics ends its round early; the panic propagates to
//!   the `set` caller and the store keeps delivering on later `set`s.
//!
//! # Example
//!
//! ```ignore
//! use rigview_core::store::Store;
//!
//! let playing = Store::new("playing", false);
//!
//! let sub = playing.subscribe(|value: &bool| {
//!     println!("playing changed: {value}");
//! });
//!
//! playing.set(true);
//! drop(sub); // unsubscribes
//! ```

use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use smallvec::SmallVec;

type SubscriberFn<T> = dyn Fn(&T) + Send + Sync;

struct Entry<T> {
    id: u64,
    callback: Arc<SubscriberFn<T>>,
}

impl<T> Clone for Entry<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            callback: self.callback.clone(),
        }
    }
}

struct Inner<T> {
    value: T,
    subscribers: SmallVec<[Entry<T>; 4]>,
    next_id: u64,
}

/// A named single-value reactive container
pub struct Store<T: Clone + Send + 'static> {
    name: &'static str,
    inner: Arc<Mutex<Inner<T>>>,
    /// Values waiting for their notification round
    pending: Mutex<VecDeque<T>>,
    /// Whether some caller is currently draining `pending`
    draining: AtomicBool,
}

impl<T: Clone + Send + 'static> Store<T> {
    /// Create a store holding `initial`
    pub fn new(name: &'static str, initial: T) -> Self {
        Self {
            name,
            inner: Arc::new(Mutex::new(Inner {
                value: initial,
                subscribers: SmallVec::new(),
                next_id: 0,
            })),
            pending: Mutex::new(VecDeque::new()),
            draining: AtomicBool::new(false),
        }
    }

    /// The store's diagnostic name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Clone of the current value, no side effects
    pub fn get(&self) -> T {
        self.inner.lock().unwrap().value.clone()
    }

    /// Replace the value and notify every subscriber with it.
    ///
    /// When called from inside a notification round (a subscriber callback,
    /// on this or another store's round touching this store), the value is
    /// queued and drained after the active round, in queue order.
    pub fn set(&self, value: T) {
        self.pending.lock().unwrap().push_back(value);
        if self.draining.swap(true, Ordering::AcqRel) {
            // A round is already running on this store; the active drainer
            // picks this value up.
            return;
        }
        self.drain();
    }

    fn drain(&self) {
        loop {
            {
                // The guard hands the drainer role back on every exit,
                // a panicking callback included; otherwise one bad
                // subscriber would silence the store for good.
                let _role = DrainRole(&self.draining);
                loop {
                    let next = self.pending.lock().unwrap().pop_front();
                    let Some(value) = next else { break };
                    // Store first, then notify against a snapshot so
                    // callbacks can subscribe/unsubscribe freely.
                    let subscribers = {
                        let mut inner = self.inner.lock().unwrap();
                        inner.value = value.clone();
                        inner.subscribers.clone()
                    };
                    for entry in &subscribers {
                        (entry.callback)(&value);
                    }
                }
            }
            // A set may have slipped in between the empty pop and the role
            // release; reclaim the drainer role if so.
            if self.pending.lock().unwrap().is_empty()
                || self.draining.swap(true, Ordering::AcqRel)
            {
                return;
            }
        }
    }

    /// Register `callback` and hand it the current value once, synchronously.
    ///
    /// Returns the token that removes the callback when unsubscribed or
    /// dropped.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let callback: Arc<SubscriberFn<T>> = Arc::new(callback);
        let (id, current) = {
            let mut inner = self.inner.lock().unwrap();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.subscribers.push(Entry {
                id,
                callback: callback.clone(),
            });
            (id, inner.value.clone())
        };
        // The value current at subscribe time, before any later set.
        callback(&current);

        let weak = Arc::downgrade(&self.inner);
        Subscription::new(self.name, move || {
            if let Some(inner) = weak.upgrade() {
                inner.lock().unwrap().subscribers.retain(|entry| entry.id != id);
            }
        })
    }

    /// Number of live subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.inner.lock().unwrap().subscribers.len()
    }
}

/// Releases a store's drainer flag when dropped, unwinding included
struct DrainRole<'a>(&'a AtomicBool);

impl Drop for DrainRole<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<T: Clone + Send + 'static> fmt::Debug for Store<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("name", &self.name)
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// RAII token for an active store subscription
///
/// Dropping the token unsubscribes. Explicit [`unsubscribe`] followed by
/// drop, or two explicit calls, is a no-op the second time.
///
/// [`unsubscribe`]: Subscription::unsubscribe
#[must_use = "dropping the token unsubscribes immediately"]
pub struct Subscription {
    store: &'static str,
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    fn new<F>(store: &'static str, cancel: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            store,
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Remove the callback from the store. Idempotent.
    pub fn unsubscribe(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }

    /// Whether the callback is still registered
    pub fn is_active(&self) -> bool {
        self.cancel.is_some()
    }

    /// Name of the store this subscription belongs to
    pub fn store_name(&self) -> &'static str {
        self.store
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("store", &self.store)
            .field("active", &self.is_active())
            .finish()
    }
}

/// Disposal group for a component's subscriptions
///
/// Components re-establish their subscription set on certain state entries
/// (typically empty or clear). Tracking every token here and calling
/// [`dispose_all`] first keeps repeated machine cycles from accumulating
/// duplicate callbacks. The group is reusable after disposal.
///
/// [`dispose_all`]: Subscriptions::dispose_all
#[derive(Default)]
pub struct Subscriptions {
    tracked: Mutex<Vec<Subscription>>,
}

impl Subscriptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a subscription to the group
    pub fn track(&self, subscription: Subscription) {
        self.tracked.lock().unwrap().push(subscription);
    }

    /// Unsubscribe and forget everything tracked so far
    pub fn dispose_all(&self) {
        let mut tracked = self.tracked.lock().unwrap();
        for subscription in tracked.iter_mut() {
            subscription.unsubscribe();
        }
        tracked.clear();
    }

    /// Number of tracked subscriptions
    pub fn len(&self) -> usize {
        self.tracked.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for Subscriptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscriptions")
            .field("tracked", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recording_store() -> (Arc<Store<i32>>, Arc<Mutex<Vec<i32>>>, Subscription) {
        let store = Arc::new(Store::new("test", 0));
        let log = Arc::new(Mutex::new(Vec::new()));
        let log_clone = log.clone();
        let sub = store.subscribe(move |value: &i32| {
            log_clone.lock().unwrap().push(*value);
        });
        (store, log, sub)
    }

    #[test]
    fn subscribe_delivers_current_value_once() {
        let (_store, log, _sub) = recording_store();
        assert_eq!(*log.lock().unwrap(), vec![0]);
    }

    #[test]
    fn set_notifies_in_subscription_order() {
        let store = Store::new("order", 0);
        let log = Arc::new(Mutex::new(Vec::new()));

        let log_a = log.clone();
        let _a = store.subscribe(move |value: &i32| {
            log_a.lock().unwrap().push(("a", *value));
        });
        let log_b = log.clone();
        let _b = store.subscribe(move |value: &i32| {
            log_b.lock().unwrap().push(("b", *value));
        });

        store.set(7);

        assert_eq!(
            *log.lock().unwrap(),
            vec![("a", 0), ("b", 0), ("a", 7), ("b", 7)]
        );
    }

    #[test]
    fn equal_values_are_not_coalesced() {
        let store = Store::new("flag", false);
        let log = Arc::new(Mutex::new(Vec::new()));
        let log_clone = log.clone();
        let _sub = store.subscribe(move |value: &bool| {
            log_clone.lock().unwrap().push(*value);
        });

        store.set(true);
        store.set(true);

        assert_eq!(*log.lock().unwrap(), vec![false, true, true]);
    }

    #[test]
    fn get_reflects_latest_value() {
        let store = Store::new("latest", 1);
        assert_eq!(store.get(), 1);
        store.set(2);
        store.set(3);
        assert_eq!(store.get(), 3);
    }

    #[test]
    fn unsubscribe_stops_delivery_and_is_idempotent() {
        let (store, log, mut sub) = recording_store();

        let other_log = Arc::new(Mutex::new(Vec::new()));
        let other_clone = other_log.clone();
        let _other = store.subscribe(move |value: &i32| {
            other_clone.lock().unwrap().push(*value);
        });

        sub.unsubscribe();
        assert!(!sub.is_active());
        sub.unsubscribe(); // second call is a no-op
        store.set(5);

        assert_eq!(*log.lock().unwrap(), vec![0]);
        assert_eq!(*other_log.lock().unwrap(), vec![0, 5]);
        assert_eq!(store.subscriber_count(), 1);
    }

    #[test]
    fn drop_unsubscribes() {
        let (store, log, sub) = recording_store();
        drop(sub);
        store.set(9);
        assert_eq!(*log.lock().unwrap(), vec![0]);
        assert_eq!(store.subscriber_count(), 0);
    }

    #[test]
    fn reentrant_set_is_queued_after_active_round() {
        let store = Arc::new(Store::new("reentrant", 0));
        let log = Arc::new(Mutex::new(Vec::new()));

        let log_a = log.clone();
        let _a = store.subscribe(move |value: &i32| {
            log_a.lock().unwrap().push(("a", *value));
        });

        let store_clone = store.clone();
        let log_b = log.clone();
        let _b = store.subscribe(move |value: &i32| {
            log_b.lock().unwrap().push(("b", *value));
            if *value == 1 {
                // Queued, not delivered until the round for 1 finishes.
                store_clone.set(2);
            }
        });

        store.set(1);

        assert_eq!(
            *log.lock().unwrap(),
            vec![("a", 0), ("b", 0), ("a", 1), ("b", 1), ("a", 2), ("b", 2)]
        );
        assert_eq!(store.get(), 2);
    }

    #[test]
    fn subscribe_during_round_takes_effect_next_round() {
        let store = Arc::new(Store::new("late", 0));
        let log = Arc::new(Mutex::new(Vec::new()));
        let late_subs = Arc::new(Mutex::new(Vec::new()));

        let store_clone = store.clone();
        let log_clone = log.clone();
        let late_clone = late_subs.clone();
        let _a = store.subscribe(move |value: &i32| {
            log_clone.lock().unwrap().push(("a", *value));
            if *value == 1 {
                let log_late = log_clone.clone();
                let sub = store_clone.subscribe(move |value: &i32| {
                    log_late.lock().unwrap().push(("late", *value));
                });
                late_clone.lock().unwrap().push(sub);
            }
        });

        store.set(1);
        store.set(2);

        // The late subscriber got the immediate delivery of 1 at subscribe
        // time and then normal delivery of 2; it was not part of the
        // snapshot for the round that triggered it.
        assert_eq!(
            *log.lock().unwrap(),
            vec![("a", 0), ("a", 1), ("late", 1), ("a", 2), ("late", 2)]
        );
    }

    #[test]
    fn disposal_group_clears_and_stays_usable() {
        let store_a = Store::new("a", 0);
        let store_b = Store::new("b", false);
        let group = Subscriptions::new();

        group.track(store_a.subscribe(|_| {}));
        group.track(store_b.subscribe(|_| {}));
        assert_eq!(group.len(), 2);
        assert_eq!(store_a.subscriber_count(), 1);
        assert_eq!(store_b.subscriber_count(), 1);

        group.dispose_all();
        assert!(group.is_empty());
        assert_eq!(store_a.subscriber_count(), 0);
        assert_eq!(store_b.subscriber_count(), 0);

        group.track(store_a.subscribe(|_| {}));
        assert_eq!(group.len(), 1);
        assert_eq!(store_a.subscriber_count(), 1);
    }

    #[test]
    fn delivery_survives_a_panicking_callback() {
        let store = Store::new("fragile", 0);
        let log = Arc::new(Mutex::new(Vec::new()));

        let tripped = Arc::new(AtomicBool::new(false));
        let trip = tripped.clone();
        let log_a = log.clone();
        let _a = store.subscribe(move |value: &i32| {
            if *value == 1 && !trip.swap(true, Ordering::SeqCst) {
                panic!("subscriber rejected the value");
            }
            log_a.lock().unwrap().push(("a", *value));
        });
        let log_b = log.clone();
        let _b = store.subscribe(move |value: &i32| {
            log_b.lock().unwrap().push(("b", *value));
        });

        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| store.set(1)));
        assert!(outcome.is_err());
        // The value was stored before its round started.
        assert_eq!(store.get(), 1);

        // The aborted round skipped "b"; later sets still reach everyone.
        store.set(2);
        assert_eq!(
            *log.lock().unwrap(),
            vec![("a", 0), ("b", 0), ("a", 2), ("b", 2)]
        );
    }

    #[test]
    fn concurrent_sets_keep_rounds_whole() {
        use std::thread;

        let store = Arc::new(Store::new("concurrent", 0));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        let _sub = store.subscribe(move |value: &i32| {
            seen_clone.lock().unwrap().push(*value);
        });

        let handles: Vec<_> = (1..=4)
            .map(|i| {
                let store = store.clone();
                thread::spawn(move || {
                    for j in 0..25 {
                        store.set(i * 100 + j);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        // Every set produced exactly one round, whichever thread drained it.
        assert_eq!(seen.lock().unwrap().len(), 1 + 4 * 25);
    }
}

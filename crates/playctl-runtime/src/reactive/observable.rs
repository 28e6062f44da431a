#![forbid(unsafe_code)]

//! Shared state with change notification.
//!
//! [`Observable<T>`] holds a value in `Rc<RefCell<..>>` storage. When the
//! value changes (by `PartialEq`), live subscribers are called in
//! registration order with the new value. Hosts use it for level state such
//! as overlay visibility: they can read the current value at any time and
//! also react to changes.
//!
//! # Failure Modes
//!
//! - **Re-entrant set**: a subscriber may call `set()` on the same
//!   observable; the nested change notifies after the outer borrow ends.
//! - **Subscriber leak**: callbacks whose [`Subscription`] is kept forever
//!   stay registered. Dropped guards are pruned lazily on the next change.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::trace_span;
use web_time::Instant;

type CallbackRc<T> = Rc<dyn Fn(&T)>;
type CallbackWeak<T> = Weak<dyn Fn(&T)>;

struct ObservableInner<T> {
    value: T,
    version: u64,
    subscribers: Vec<CallbackWeak<T>>,
}

/// A shared, version-tracked value with change notification.
///
/// Cloning hands out another handle to the same value and subscriber list.
///
/// # Invariants
///
/// 1. `version` increments by exactly 1 on each value-changing mutation.
/// 2. `set(v)` where `v == current` is a no-op.
/// 3. Subscribers are notified in registration order.
pub struct Observable<T> {
    inner: Rc<RefCell<ObservableInner<T>>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Observable")
            .field("value", &inner.value)
            .field("version", &inner.version)
            .field("subscriber_count", &inner.subscribers.len())
            .finish()
    }
}

impl<T: Clone + PartialEq + 'static> Observable<T> {
    /// Create an observable at version 0 with no subscribers.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ObservableInner {
                value,
                version: 0,
                subscribers: Vec::new(),
            })),
        }
    }

    /// Clone of the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.inner.borrow().value.clone()
    }

    /// Borrow the current value for the duration of `f`.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.borrow().value)
    }

    /// Replace the value, notifying subscribers if it changed.
    pub fn set(&self, value: T) {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.value == value {
                return;
            }
            inner.value = value;
            inner.version += 1;
        }
        self.notify();
    }

    /// Mutate in place, notifying subscribers if the value changed.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let changed = {
            let mut inner = self.inner.borrow_mut();
            let old = inner.value.clone();
            f(&mut inner.value);
            if inner.value != old {
                inner.version += 1;
                true
            } else {
                false
            }
        };
        if changed {
            self.notify();
        }
    }

    /// Register `callback` for future changes.
    ///
    /// The callback stays registered while the returned guard lives.
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        let strong: CallbackRc<T> = Rc::new(callback);
        self.inner
            .borrow_mut()
            .subscribers
            .push(Rc::downgrade(&strong));
        Subscription::from_guard(Box::new(strong))
    }

    /// Number of value-changing mutations so far.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    /// Registered subscribers, including dropped ones not yet pruned.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }

    fn notify(&self) {
        let callbacks: Vec<CallbackRc<T>> = {
            let mut inner = self.inner.borrow_mut();
            inner.subscribers.retain(|w| w.strong_count() > 0);
            inner
                .subscribers
                .iter()
                .filter_map(Weak::upgrade)
                .collect()
        };
        if callbacks.is_empty() {
            return;
        }

        let value = self.inner.borrow().value.clone();
        let start = Instant::now();
        let _span = trace_span!(
            "observable.notify",
            subscribers = callbacks.len() as u64,
            duration_us = tracing::field::Empty
        )
        .entered();

        for cb in &callbacks {
            cb(&value);
        }

        let duration_us = start.elapsed().as_micros() as u64;
        tracing::Span::current().record("duration_us", duration_us);
        tracing::trace!(duration_us, "observable subscribers notified");
    }
}

/// RAII guard for a subscriber callback.
///
/// Dropping it makes the callback unreachable; the observable forgets it on
/// the next change.
pub struct Subscription {
    _guard: Box<dyn std::any::Any>,
}

impl Subscription {
    pub(crate) fn from_guard(guard: Box<dyn std::any::Any>) -> Self {
        Self { _guard: guard }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn get_set_basic() {
        let visible = Observable::new(false);
        assert!(!visible.get());
        assert_eq!(visible.version(), 0);

        visible.set(true);
        assert!(visible.get());
        assert_eq!(visible.version(), 1);
    }

    #[test]
    fn same_value_is_a_no_op() {
        let visible = Observable::new(true);
        visible.set(true);
        assert_eq!(visible.version(), 0);
    }

    #[test]
    fn update_in_place() {
        let tracks = Observable::new(vec![1, 2]);
        tracks.update(|v| v.push(3));
        assert_eq!(tracks.get(), vec![1, 2, 3]);
        assert_eq!(tracks.version(), 1);

        tracks.update(|v| v.sort());
        assert_eq!(tracks.version(), 1, "sorting a sorted list changes nothing");
        assert_eq!(tracks.with(|v| v.len()), 3);
    }

    #[test]
    fn subscribers_see_each_change_once() {
        let visible = Observable::new(false);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = Rc::clone(&seen);
        let _sub = visible.subscribe(move |v| seen_clone.borrow_mut().push(*v));

        visible.set(true);
        visible.set(true);
        visible.set(false);
        assert_eq!(*seen.borrow(), vec![true, false]);
    }

    #[test]
    fn dropping_subscription_unsubscribes() {
        let level = Observable::new(0u32);
        let hits = Rc::new(Cell::new(0u32));
        let hits_clone = Rc::clone(&hits);
        let sub = level.subscribe(move |_| hits_clone.set(hits_clone.get() + 1));

        level.set(1);
        drop(sub);
        level.set(2);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn dead_subscribers_pruned_on_change() {
        let level = Observable::new(0u32);
        let _a = level.subscribe(|_| {});
        let b = level.subscribe(|_| {});
        assert_eq!(level.subscriber_count(), 2);

        drop(b);
        assert_eq!(level.subscriber_count(), 2);
        level.set(1);
        assert_eq!(level.subscriber_count(), 1);
    }

    #[test]
    fn clones_share_value_and_subscribers() {
        let a = Observable::new(0u32);
        let hits = Rc::new(Cell::new(0u32));
        let hits_clone = Rc::clone(&hits);
        let _sub = a.subscribe(move |_| hits_clone.set(hits_clone.get() + 1));

        let b = a.clone();
        b.set(5);
        assert_eq!(a.get(), 5);
        assert_eq!(a.version(), 1);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn registration_order() {
        let level = Observable::new(0u32);
        let log = Rc::new(RefCell::new(Vec::new()));
        let l1 = Rc::clone(&log);
        let _s1 = level.subscribe(move |_| l1.borrow_mut().push('A'));
        let l2 = Rc::clone(&log);
        let _s2 = level.subscribe(move |_| l2.borrow_mut().push('B'));

        level.set(1);
        assert_eq!(*log.borrow(), vec!['A', 'B']);
    }

    #[test]
    fn reentrant_set_from_subscriber() {
        let level = Observable::new(0u32);
        let inner = level.clone();
        let _sub = level.subscribe(move |v| {
            if *v == 1 {
                inner.set(2);
            }
        });

        level.set(1);
        assert_eq!(level.get(), 2);
        assert_eq!(level.version(), 2);
    }

    #[test]
    fn debug_format() {
        let dbg = format!("{:?}", Observable::new(42));
        assert!(dbg.contains("Observable"));
        assert!(dbg.contains("42"));
        assert!(dbg.contains("version"));
    }
}

#![forbid(unsafe_code)]

//! Edge-triggered event channel.
//!
//! Unlike [`Observable`](super::Observable), a [`Signal<T>`] stores no
//! value: every [`emit`](Signal::emit) reaches the live subscribers once,
//! even when the payload equals the previous one. It carries events such as
//! "rebuild required" or "show this notice", where each occurrence matters.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use super::observable::Subscription;

type Listener<T> = Rc<dyn Fn(&T)>;

struct SignalInner<T> {
    listeners: RefCell<Vec<Weak<dyn Fn(&T)>>>,
    emitted: Cell<u64>,
}

/// Shared event emitter. Clones share listeners.
pub struct Signal<T> {
    inner: Rc<SignalInner<T>>,
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> Default for Signal<T> {
    fn default() -> Self {
        Self {
            inner: Rc::new(SignalInner {
                listeners: RefCell::new(Vec::new()),
                emitted: Cell::new(0),
            }),
        }
    }
}

impl<T> std::fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("emitted", &self.inner.emitted.get())
            .field("listeners", &self.inner.listeners.borrow().len())
            .finish()
    }
}

impl<T: 'static> Signal<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Listen for future events while the guard lives.
    pub fn subscribe(&self, listener: impl Fn(&T) + 'static) -> Subscription {
        let strong: Listener<T> = Rc::new(listener);
        self.inner
            .listeners
            .borrow_mut()
            .push(Rc::downgrade(&strong));
        Subscription::from_guard(Box::new(strong))
    }

    /// Deliver `event` to every live listener in registration order.
    pub fn emit(&self, event: &T) {
        self.inner.emitted.set(self.inner.emitted.get() + 1);
        let live: Vec<Listener<T>> = {
            let mut listeners = self.inner.listeners.borrow_mut();
            listeners.retain(|w| w.strong_count() > 0);
            listeners.iter().filter_map(Weak::upgrade).collect()
        };
        for listener in &live {
            listener(event);
        }
    }

    /// Total number of `emit` calls, listened to or not.
    #[must_use]
    pub fn emit_count(&self) -> u64 {
        self.inner.emitted.get()
    }

    /// Registered listeners, including dropped ones not yet pruned.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_emit_is_delivered() {
        let signal = Signal::<u8>::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = Rc::clone(&seen);
        let _sub = signal.subscribe(move |v| seen_clone.borrow_mut().push(*v));

        signal.emit(&1);
        signal.emit(&1);
        assert_eq!(*seen.borrow(), vec![1, 1]);
        assert_eq!(signal.emit_count(), 2);
    }

    #[test]
    fn emit_without_listeners_is_counted() {
        let signal = Signal::<()>::new();
        signal.emit(&());
        assert_eq!(signal.emit_count(), 1);
        assert_eq!(signal.listener_count(), 0);
    }

    #[test]
    fn dropped_listener_stops_receiving() {
        let signal = Signal::<u8>::new();
        let hits = Rc::new(Cell::new(0u32));
        let hits_clone = Rc::clone(&hits);
        let sub = signal.subscribe(move |_| hits_clone.set(hits_clone.get() + 1));

        signal.emit(&0);
        drop(sub);
        signal.emit(&0);
        assert_eq!(hits.get(), 1);
        assert_eq!(signal.listener_count(), 0);
    }

    #[test]
    fn listener_may_emit_again() {
        let signal = Signal::<u8>::new();
        let echo = signal.clone();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = Rc::clone(&seen);
        let _sub = signal.subscribe(move |v| {
            seen_clone.borrow_mut().push(*v);
            if *v == 0 {
                echo.emit(&1);
            }
        });

        signal.emit(&0);
        assert_eq!(*seen.borrow(), vec![0, 1]);
    }
}

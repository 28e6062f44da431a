#![forbid(unsafe_code)]

//! Reactive primitives for host bindings.
//!
//! - [`Observable`]: level state with change notification.
//! - [`Signal`]: edge-triggered events.
//!
//! Both are single-threaded (`Rc`) and hand out a [`Subscription`] guard
//! per listener.

pub mod observable;
pub mod signal;

pub use observable::{Observable, Subscription};
pub use signal::Signal;

#![forbid(unsafe_code)]

//! Single-slot deferred action with generation tickets.
//!
//! [`Deferred<A>`] holds at most one pending action with a due time.
//! Scheduling replaces (and so cancels) whatever was pending. Each schedule
//! hands out a [`Ticket`]; a host that drives its own delayed callbacks
//! passes the ticket back, and only the ticket of the latest schedule can
//! fire. Hosts without their own timers call [`Deferred::poll`] with the
//! current time instead.
//!
//! # Invariants
//!
//! 1. At most one action is pending.
//! 2. An action fires at most once.
//! 3. A ticket from an earlier schedule, or one that already fired or was
//!    cancelled, never fires.

use web_time::{Duration, Instant};

/// Identity of one scheduling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ticket(u64);

impl Ticket {
    /// Monotonic generation number.
    #[must_use]
    pub const fn generation(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone)]
struct Pending<A> {
    ticket: Ticket,
    due: Instant,
    action: A,
}

/// Why a ticket did not fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejected {
    /// Nothing is pending.
    Idle,
    /// A newer schedule replaced the ticket.
    Stale,
}

/// A cancellable single-slot timer.
#[derive(Debug, Clone)]
pub struct Deferred<A> {
    generation: u64,
    pending: Option<Pending<A>>,
}

impl<A> Default for Deferred<A> {
    fn default() -> Self {
        Self {
            generation: 0,
            pending: None,
        }
    }
}

impl<A> Deferred<A> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `action` to run `delay` after `now`, replacing any pending
    /// action.
    pub fn schedule(&mut self, action: A, delay: Duration, now: Instant) -> Ticket {
        self.generation += 1;
        let ticket = Ticket(self.generation);
        self.pending = Some(Pending {
            ticket,
            due: now + delay,
            action,
        });
        ticket
    }

    /// Drop the pending action. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Whether an action is waiting.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Ticket of the pending action.
    #[must_use]
    pub fn ticket(&self) -> Option<Ticket> {
        self.pending.as_ref().map(|p| p.ticket)
    }

    /// When the pending action is due.
    #[must_use]
    pub fn due(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.due)
    }

    /// Take the pending action if it is due at `now`.
    pub fn poll(&mut self, now: Instant) -> Option<A> {
        if self.pending.as_ref().is_some_and(|p| now >= p.due) {
            self.pending.take().map(|p| p.action)
        } else {
            None
        }
    }

    /// Take the pending action if `ticket` is the one that scheduled it.
    ///
    /// Used by hosts whose own timer fired; the due time is not checked.
    pub fn fire(&mut self, ticket: Ticket) -> Result<A, Rejected> {
        match &self.pending {
            None => Err(Rejected::Idle),
            Some(p) if p.ticket != ticket => Err(Rejected::Stale),
            Some(_) => self.pending.take().map(|p| p.action).ok_or(Rejected::Idle),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS_100: Duration = Duration::from_millis(100);
    const MS_300: Duration = Duration::from_millis(300);

    #[test]
    fn fires_once_when_due() {
        let mut d = Deferred::new();
        let t = Instant::now();
        d.schedule("hide", MS_300, t);
        assert_eq!(d.poll(t + MS_100), None);
        assert_eq!(d.poll(t + MS_300), Some("hide"));
        assert_eq!(d.poll(t + MS_300 * 2), None);
    }

    #[test]
    fn reschedule_replaces_pending() {
        let mut d = Deferred::new();
        let t = Instant::now();
        let first = d.schedule(1, MS_300, t);
        let second = d.schedule(2, MS_300, t + MS_100);
        assert!(second > first);
        assert_eq!(d.poll(t + MS_300), None, "deadline moved");
        assert_eq!(d.poll(t + MS_100 + MS_300), Some(2));
    }

    #[test]
    fn stale_ticket_rejected() {
        let mut d = Deferred::new();
        let t = Instant::now();
        let old = d.schedule(1, MS_300, t);
        let new = d.schedule(2, MS_300, t);
        assert_eq!(d.fire(old), Err(Rejected::Stale));
        assert_eq!(d.fire(new), Ok(2));
        assert_eq!(d.fire(new), Err(Rejected::Idle));
    }

    #[test]
    fn cancel_clears() {
        let mut d = Deferred::new();
        let t = Instant::now();
        let ticket = d.schedule((), MS_100, t);
        assert!(d.cancel());
        assert!(!d.cancel());
        assert!(!d.is_pending());
        assert_eq!(d.fire(ticket), Err(Rejected::Idle));
        assert_eq!(d.poll(t + MS_300), None);
    }

    #[test]
    fn accessors_follow_schedule() {
        let mut d = Deferred::new();
        let t = Instant::now();
        assert_eq!(d.ticket(), None);
        let ticket = d.schedule('x', MS_100, t);
        assert_eq!(d.ticket(), Some(ticket));
        assert_eq!(d.due(), Some(t + MS_100));
        assert_eq!(ticket.generation(), 1);
    }
}

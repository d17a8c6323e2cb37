// Debounced dispatch: coalesce rapid input into one delayed call

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

/// Handle for one armed timer. Only the most recent ticket can fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceState {
    Idle,
    Pending,
}

#[derive(Debug)]
struct Pending<T> {
    value: T,
    deadline: DateTime<Utc>,
    ticket: Ticket,
}

/// Holds at most one scheduled value.
///
/// Scheduling while a value is pending replaces it and re-arms the
/// deadline, so a superseded value can never be dispatched.
#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<Pending<T>>,
    next_ticket: u64,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
            next_ticket: 0,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn state(&self) -> DebounceState {
        if self.pending.is_some() {
            DebounceState::Pending
        } else {
            DebounceState::Idle
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending value becomes due, if any
    pub fn deadline(&self) -> Option<DateTime<Utc>> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    /// Arm (or re-arm) the timer with `value`, cancelling anything pending
    pub fn schedule(&mut self, value: T, now: DateTime<Utc>) -> Ticket {
        self.next_ticket += 1;
        let ticket = Ticket(self.next_ticket);
        let deadline = now + self.delay;
        if self.pending.is_some() {
            debug!(ticket = ticket.0, "debounce: superseding pending dispatch");
        }
        self.pending = Some(Pending {
            value,
            deadline,
            ticket,
        });
        ticket
    }

    /// Drop the pending value without dispatching it
    pub fn cancel(&mut self) -> Option<T> {
        let cancelled = self.pending.take().map(|p| p.value);
        if cancelled.is_some() {
            debug!("debounce: pending dispatch cancelled");
        }
        cancelled
    }

    /// Take the pending value if its deadline has passed
    pub fn poll(&mut self, now: DateTime<Utc>) -> Option<T> {
        if self.pending.as_ref().is_some_and(|p| now >= p.deadline) {
            return self.pending.take().map(|p| p.value);
        }
        None
    }

    /// Timer callback entry point. A stale ticket fires nothing.
    ///
    /// The deadline is not checked here: the caller's timer decides when the
    /// ticket is due. Use `poll` to dispatch against a clock instead.
    pub fn fire(&mut self, ticket: Ticket) -> Option<T> {
        if self.pending.as_ref().is_some_and(|p| p.ticket == ticket) {
            return self.pending.take().map(|p| p.value);
        }
        debug!(ticket = ticket.0, "debounce: ignoring stale timer");
        None
    }
}

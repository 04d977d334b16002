//! One-shot timers owned by the gameplay object that scheduled them.
//!
//! Timers are keyed by a caller-defined tag; scheduling a tag that is already pending
//! replaces it. Dropping or clearing the manager cancels everything it holds, so no
//! callback can outlive its owner.

/// A pending one-shot timer.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PendingTimer<T> {
    tag: T,
    deadline: f64,
}

/// Schedules one-shot timers against an internal clock advanced by the owner.
#[derive(Debug, Clone)]
pub struct TimerManager<T> {
    /// Current time in seconds.
    now: f64,
    pending: Vec<PendingTimer<T>>,
}

impl<T> Default for TimerManager<T> {
    fn default() -> Self {
        Self {
            now: 0.0,
            pending: Vec::new(),
        }
    }
}

impl<T: Copy + PartialEq + std::fmt::Debug> TimerManager<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current time of the manager's clock in seconds.
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Schedule `tag` to fire `delay` seconds from now, replacing any pending timer with
    /// the same tag.
    pub fn set(&mut self, tag: T, delay: f32) {
        self.cancel(tag);
        let deadline = self.now + delay.max(0.0) as f64;
        log::trace!("timer {:?} set for t={:.4}", tag, deadline);
        self.pending.push(PendingTimer { tag, deadline });
    }

    /// Cancel the pending timer for `tag`. Returns true if one was pending.
    pub fn cancel(&mut self, tag: T) -> bool {
        let before = self.pending.len();
        self.pending.retain(|t| t.tag != tag);
        before != self.pending.len()
    }

    /// Cancel every pending timer.
    pub fn clear(&mut self) {
        if !self.pending.is_empty() {
            log::debug!("cancelling {} pending timer(s)", self.pending.len());
        }
        self.pending.clear();
    }

    /// Whether a timer for `tag` is pending.
    pub fn is_active(&self, tag: T) -> bool {
        self.pending.iter().any(|t| t.tag == tag)
    }

    /// Seconds left before `tag` fires, if pending.
    pub fn remaining(&self, tag: T) -> Option<f32> {
        self.pending
            .iter()
            .find(|t| t.tag == tag)
            .map(|t| (t.deadline - self.now).max(0.0) as f32)
    }

    /// Number of pending timers.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Remove and return the earliest timer due at or before `until`.
    ///
    /// The clock moves to that timer's deadline, so anything the caller schedules while
    /// handling it is measured from the exact expiry rather than from the end of the
    /// frame. Ties fire in scheduling order.
    pub fn pop_due(&mut self, until: f64) -> Option<T> {
        let mut best: Option<usize> = None;
        for (i, timer) in self.pending.iter().enumerate() {
            if timer.deadline > until {
                continue;
            }
            match best {
                Some(b) if self.pending[b].deadline <= timer.deadline => {}
                _ => best = Some(i),
            }
        }
        let timer = self.pending.remove(best?);
        self.now = self.now.max(timer.deadline);
        Some(timer.tag)
    }

    /// Move the clock to `until` once all due timers have been handled.
    pub fn settle(&mut self, until: f64) {
        self.now = self.now.max(until);
    }

    /// Advance by `dt` seconds and return every tag that fired, in deadline order.
    ///
    /// Use `pop_due` directly when handlers need to reschedule within the same frame.
    pub fn advance(&mut self, dt: f32) -> Vec<T> {
        let until = self.now + dt.max(0.0) as f64;
        let mut fired = Vec::new();
        while let Some(tag) = self.pop_due(until) {
            fired.push(tag);
        }
        self.settle(until);
        fired
    }
}

//! Hover settle timer for submenu cascading.
//!
//! There is no background thread: the host advances the timer from its
//! frame or tick handler and the manager acts on whatever fires.

use std::time::Duration;

/// The row a pending cascade belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CascadeTarget {
    /// Depth of the popup containing the row
    pub depth: usize,
    /// Row index within that popup
    pub row: usize,
}

/// A single cancellable scheduled cascade.
#[derive(Debug, Default)]
pub struct SettleTimer {
    pending: Option<(CascadeTarget, Duration)>,
}

impl SettleTimer {
    /// Create an idle timer.
    #[must_use]
    pub const fn new() -> Self {
        Self { pending: None }
    }

    /// Schedule `target` to fire after `delay`, replacing anything pending.
    pub fn schedule(&mut self, target: CascadeTarget, delay: Duration) {
        self.pending = Some((target, delay));
    }

    /// Drop the pending cascade, if any.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Drop the pending cascade unless it targets `target`.
    pub fn cancel_unless(&mut self, target: CascadeTarget) {
        if self.pending_target() != Some(target) {
            self.cancel();
        }
    }

    /// Drop the pending cascade if it belongs to a popup deeper than `depth`.
    pub fn cancel_deeper_than(&mut self, depth: usize) {
        if self.pending_target().is_some_and(|t| t.depth > depth) {
            self.cancel();
        }
    }

    /// Target currently waiting to fire.
    #[must_use]
    pub fn pending_target(&self) -> Option<CascadeTarget> {
        self.pending.map(|(target, _)| target)
    }

    /// Time left before the pending cascade fires.
    #[must_use]
    pub fn remaining(&self) -> Option<Duration> {
        self.pending.map(|(_, left)| left)
    }

    /// Advance time; returns the target if it fired.
    pub fn advance(&mut self, elapsed: Duration) -> Option<CascadeTarget> {
        let (target, left) = self.pending?;
        if elapsed >= left {
            self.pending = None;
            Some(target)
        } else {
            self.pending = Some((target, left - elapsed));
            None
        }
    }
}

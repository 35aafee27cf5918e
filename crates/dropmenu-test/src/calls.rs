//! Callback recording.

use std::cell::RefCell;
use std::rc::Rc;

/// Shared log of callback invocations, in order.
///
/// Clones share the same log, so a recorder can be moved into a menu
/// callback while the test keeps a handle for assertions.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Rc<RefCell<Vec<String>>>,
}

impl CallLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A callback that appends `name` to this log.
    pub fn recorder(&self, name: impl Into<String>) -> impl Fn() + 'static {
        let calls = Rc::clone(&self.calls);
        let name = name.into();
        move || calls.borrow_mut().push(name.clone())
    }

    /// Every recorded call, oldest first.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    /// Number of times `name` was recorded.
    #[must_use]
    pub fn count(&self, name: &str) -> usize {
        self.calls.borrow().iter().filter(|c| *c == name).count()
    }

    /// Total number of recorded calls.
    #[must_use]
    pub fn len(&self) -> usize {
        self.calls.borrow().len()
    }

    /// Whether nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.calls.borrow().is_empty()
    }

    /// Forget all recorded calls.
    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }

    /// Assert the exact call sequence.
    ///
    /// # Panics
    ///
    /// Panics if the recorded calls differ from `expected`.
    pub fn assert_calls(&self, expected: &[&str]) -> &Self {
        let actual = self.calls();
        assert_eq!(
            actual, expected,
            "Expected callbacks {expected:?} but got {actual:?}"
        );
        self
    }
}

//! In-flight marker for submit actions.
//!
//! The flag is shared: a renderer keeps a clone and reads it while the page
//! is awaiting the backend. It is cleared when the [`BusyGuard`] drops, so a
//! cancelled submit future releases it as well.

#[cfg(test)]
#[path = "busy_test.rs"]
mod busy_test;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Clone, Debug, Default)]
pub struct BusyFlag(Arc<AtomicBool>);

impl BusyFlag {
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Mark the action as in flight. `None` when it already is.
    #[must_use]
    pub fn try_begin(&self) -> Option<BusyGuard> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
            .then(|| BusyGuard(Arc::clone(&self.0)))
    }
}

/// Holds a [`BusyFlag`] set until dropped.
#[derive(Debug)]
pub struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#![forbid(unsafe_code)]

//! Reentrancy guard.
//!
//! [`ReentrancyGuard::enter`] increments a depth counter and returns a
//! [`GuardScope`]; dropping the scope decrements it. The counter is therefore
//! released on every exit path, including `?` and unwinding.

use std::cell::Cell;

/// Depth counter marking "a propagation is in progress".
#[derive(Debug, Default)]
pub struct ReentrancyGuard {
    depth: Cell<u32>,
}

impl ReentrancyGuard {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            depth: Cell::new(0),
        }
    }

    /// Acquire the guard for the lifetime of the returned scope.
    #[must_use = "the guard is released as soon as the scope is dropped"]
    pub fn enter(&self) -> GuardScope<'_> {
        self.depth.set(self.depth.get() + 1);
        GuardScope { guard: self }
    }

    /// Acquire the guard only if nobody holds it.
    #[must_use]
    pub fn try_enter(&self) -> Option<GuardScope<'_>> {
        if self.is_held() {
            None
        } else {
            Some(self.enter())
        }
    }

    #[must_use]
    pub fn is_held(&self) -> bool {
        self.depth.get() > 0
    }

    #[must_use]
    pub fn depth(&self) -> u32 {
        self.depth.get()
    }
}

/// Held acquisition of a [`ReentrancyGuard`].
#[derive(Debug)]
pub struct GuardScope<'a> {
    guard: &'a ReentrancyGuard,
}

impl Drop for GuardScope<'_> {
    fn drop(&mut self) {
        self.guard.depth.set(self.guard.depth.get().saturating_sub(1));
    }
}

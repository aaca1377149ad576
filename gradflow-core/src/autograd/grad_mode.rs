//! Thread-local switch controlling whether operations record graph history.
//!
//! Tracking is enabled by default. Every live guard pushes an entry on a
//! per-thread stack and removes exactly that entry when dropped; the current
//! mode is the newest entry still alive. Scopes therefore nest, early exits
//! (`?`, panics) restore the state the enclosing code expects, and guards
//! dropped out of order never leave a stale mode behind. The stack is per
//! thread: a no-grad scope on one thread never affects graph construction on
//! another.

use std::cell::{Cell, RefCell};
use std::marker::PhantomData;

thread_local! {
    /// `(guard id, enabled)` for every live guard, oldest first.
    static GRAD_MODES: RefCell<Vec<(u64, bool)>> = const { RefCell::new(Vec::new()) };
    static NEXT_GUARD_ID: Cell<u64> = const { Cell::new(0) };
}

/// Returns whether graph construction is enabled on the current thread.
pub fn is_grad_enabled() -> bool {
    GRAD_MODES.with(|modes| modes.borrow().last().map_or(true, |&(_, enabled)| enabled))
}

fn push_grad_mode(enabled: bool) -> u64 {
    let id = NEXT_GUARD_ID.with(|next| next.replace(next.get() + 1));
    GRAD_MODES.with(|modes| modes.borrow_mut().push((id, enabled)));
    id
}

fn remove_grad_mode(id: u64) {
    // The thread-local may already be gone while a thread shuts down.
    let _ = GRAD_MODES.try_with(|modes| {
        let mut modes = modes.borrow_mut();
        if let Some(position) = modes.iter().rposition(|&(entry, _)| entry == id) {
            modes.remove(position);
        }
    });
}

/// RAII guard that sets the grad mode for its lifetime.
///
/// Not `Send`: the guard must be dropped on the thread whose mode it changed.
#[must_use = "grad mode is restored as soon as the guard is dropped"]
#[derive(Debug)]
pub struct GradModeGuard {
    id: u64,
    _not_send: PhantomData<*const ()>,
}

impl GradModeGuard {
    /// Sets the grad mode to `enabled` until the guard is dropped.
    pub fn new(enabled: bool) -> Self {
        let previous = is_grad_enabled();
        let id = push_grad_mode(enabled);
        log::trace!("grad mode set to {} (previous: {})", enabled, previous);
        GradModeGuard {
            id,
            _not_send: PhantomData,
        }
    }
}

impl Drop for GradModeGuard {
    fn drop(&mut self) {
        remove_grad_mode(self.id);
    }
}

/// Guard disabling graph construction within its scope.
///
/// ```
/// use gradflow_core::{NoGradGuard, Tensor};
///
/// let x = Tensor::scalar_f64(2.0);
/// x.requires_grad_(true).unwrap();
/// {
///     let _guard = NoGradGuard::new();
///     let y = x.mul_scalar(3.0).unwrap();
///     assert!(!y.requires_grad());
///     assert!(y.grad_fn().is_none());
/// }
/// ```
#[must_use = "grad mode is restored as soon as the guard is dropped"]
#[derive(Debug)]
pub struct NoGradGuard {
    _guard: GradModeGuard,
}

impl NoGradGuard {
    pub fn new() -> Self {
        NoGradGuard {
            _guard: GradModeGuard::new(false),
        }
    }
}

impl Default for NoGradGuard {
    fn default() -> Self {
        Self::new()
    }
}

/// Guard re-enabling graph construction, e.g. inside a no-grad region.
#[must_use = "grad mode is restored as soon as the guard is dropped"]
#[derive(Debug)]
pub struct EnableGradGuard {
    _guard: GradModeGuard,
}

impl EnableGradGuard {
    pub fn new() -> Self {
        EnableGradGuard {
            _guard: GradModeGuard::new(true),
        }
    }
}

impl Default for EnableGradGuard {
    fn default() -> Self {
        Self::new()
    }
}

/// Sets the grad mode explicitly and returns the guard restoring the old one.
pub fn set_grad_enabled(enabled: bool) -> GradModeGuard {
    GradModeGuard::new(enabled)
}

/// Runs `f` with graph construction disabled.
pub fn no_grad<F, R>(f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = NoGradGuard::new();
    f()
}

/// Runs `f` with graph construction enabled.
pub fn enable_grad<F, R>(f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = EnableGradGuard::new();
    f()
}

#[cfg(test)]
#[path = "grad_mode_test.rs"]
mod tests;

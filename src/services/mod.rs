//! Managers: async operations over the state containers.
//!
//! DESIGN
//! ======
//! A manager owns one state container behind a `std::sync::Mutex` that is
//! only ever held between awaits, never across one. Every operation catches
//! its own failures and converts them into a sentinel return value (`false`
//! or `None`) plus, where the user should hear about it, a `Notice`.
//!
//! Overlapping calls are allowed. Two in-flight refreshes of the same list
//! race and the last response to arrive wins.

pub mod session;
pub mod videos;

pub use session::SessionManager;
pub use videos::VideoManager;

use std::sync::{Mutex, MutexGuard};

fn lock<S>(state: &Mutex<S>) -> MutexGuard<'_, S> {
    state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// Sets a loading flag on creation and clears it on drop, so the flag is
/// reset on every exit path, including a dropped (cancelled) future.
struct LoadingGuard<'a, S> {
    state: &'a Mutex<S>,
    flag: fn(&mut S) -> &mut bool,
}

impl<'a, S> LoadingGuard<'a, S> {
    fn begin(state: &'a Mutex<S>, flag: fn(&mut S) -> &mut bool) -> Self {
        *flag(&mut lock(state)) = true;
        Self { state, flag }
    }
}

impl<S> Drop for LoadingGuard<'_, S> {
    fn drop(&mut self) {
        *(self.flag)(&mut lock(self.state)) = false;
    }
}

#[cfg(test)]
pub(crate) mod test_helpers;

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

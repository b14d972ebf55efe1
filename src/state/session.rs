#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use crate::net::types::User;

/// How much the client knows about the current credential.
///
/// `Optimistic` is a deliberate weak state: a token was found in persisted
/// storage and nothing more. It counts as authenticated until an API call
/// proves otherwise.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AuthStatus {
    #[default]
    Anonymous,
    Optimistic,
    Verified,
}

/// Authentication state tracking the current user and loading status.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionState {
    pub user: Option<User>,
    pub status: AuthStatus,
    pub loading: bool,
}

impl SessionState {
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.status != AuthStatus::Anonymous
    }

    /// Server accepted credentials and returned a profile.
    pub fn logged_in(&mut self, user: User) {
        self.user = Some(user);
        self.status = AuthStatus::Verified;
    }

    /// Drop everything tied to the credential.
    pub fn logged_out(&mut self) {
        self.user = None;
        self.status = AuthStatus::Anonymous;
    }

    /// A persisted token exists. Never downgrades a verified session.
    pub fn token_found(&mut self) {
        if self.status == AuthStatus::Anonymous {
            self.status = AuthStatus::Optimistic;
        }
    }

    /// Profile refreshed from the server; auth status is left as is.
    pub fn profile_loaded(&mut self, user: User) {
        self.user = Some(user);
    }
}

//! Session manager: login, registration, logout and the optimistic check.
//!
//! DESIGN
//! ======
//! `login` is the only path to a `Verified` session. `check_auth` trusts the
//! persisted token without asking the server (`Optimistic`); a stale or forged
//! token is accepted until some later API call is rejected. `get_user` only
//! refreshes the profile and never changes the auth status.

use std::sync::{Arc, Mutex};

use super::{LoadingGuard, lock};
use crate::net::Api;
use crate::net::types::{Credentials, Registration, User};
use crate::notify::{Notice, Notifier, messages};
use crate::state::SessionState;
use crate::storage::TokenStore;

fn loading_flag(state: &mut SessionState) -> &mut bool {
    &mut state.loading
}

pub struct SessionManager {
    api: Arc<dyn Api>,
    tokens: Arc<dyn TokenStore>,
    notifier: Arc<dyn Notifier>,
    state: Mutex<SessionState>,
}

impl SessionManager {
    #[must_use]
    pub fn new(api: Arc<dyn Api>, tokens: Arc<dyn TokenStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self { api, tokens, notifier, state: Mutex::new(SessionState::default()) }
    }

    /// Copy of the current state for rendering.
    #[must_use]
    pub fn snapshot(&self) -> SessionState {
        lock(&self.state).clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        lock(&self.state).is_authenticated()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        lock(&self.state).loading
    }

    #[must_use]
    pub fn user(&self) -> Option<User> {
        lock(&self.state).user.clone()
    }

    /// Exchange credentials for a token. Returns `true` on success.
    ///
    /// On failure the auth status is left untouched and an error notice
    /// carries the server's message.
    pub async fn login(&self, credentials: &Credentials) -> bool {
        let _loading = LoadingGuard::begin(&self.state, loading_flag);

        let response = match self.api.login(credentials).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, "login failed");
                self.notifier
                    .notify(Notice::error(e.message_or(messages::LOGIN_FAILED)));
                return false;
            }
        };

        if let Err(e) = self.tokens.set_token(&response.access_token) {
            tracing::error!(error = %e, "login succeeded but token could not be persisted");
            self.notifier.notify(Notice::error(messages::LOGIN_FAILED));
            return false;
        }

        tracing::info!(user_id = response.user.id, "login succeeded");
        lock(&self.state).logged_in(response.user);
        self.notifier.notify(Notice::success(messages::LOGIN_OK));
        true
    }

    /// Create an account. The new user is not signed in.
    pub async fn register(&self, registration: &Registration) -> bool {
        let _loading = LoadingGuard::begin(&self.state, loading_flag);

        match self.api.register(registration).await {
            Ok(()) => {
                tracing::info!(username = %registration.username, "registration succeeded");
                self.notifier.notify(Notice::success(messages::REGISTER_OK));
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "registration failed");
                self.notifier
                    .notify(Notice::error(e.message_or(messages::REGISTER_FAILED)));
                false
            }
        }
    }

    /// Forget the credential locally. No server call; safe to repeat.
    pub fn logout(&self) {
        let erased = self.tokens.clear_token();
        lock(&self.state).logged_out();

        match erased {
            Ok(()) => self.notifier.notify(Notice::success(messages::LOGOUT_OK)),
            Err(e) => {
                tracing::error!(error = %e, "stored token could not be erased");
                self.notifier
                    .notify(Notice::error(messages::LOGOUT_TOKEN_KEPT));
            }
        }
    }

    /// Mark the session authenticated if a token is persisted.
    ///
    /// Neither validates the token nor loads the profile.
    pub fn check_auth(&self) {
        if self.tokens.has_token() {
            lock(&self.state).token_found();
        }
    }

    /// Fetch and store the current profile. Failures are logged only.
    pub async fn get_user(&self) -> Option<User> {
        match self.api.current_user().await {
            Ok(user) => {
                lock(&self.state).profile_loaded(user.clone());
                Some(user)
            }
            Err(e) => {
                tracing::warn!(error = %e, "fetching current user failed");
                None
            }
        }
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;

//! Explicit client context.
//!
//! DESIGN
//! ======
//! One `ClientContext` per running client replaces process-wide singleton
//! stores. It wires a single transport and a single token store into one
//! session manager, one video manager and one route guard, and is handed to
//! the UI layer by reference (or `Arc`). Neither manager knows the other.

use std::sync::Arc;

use crate::config::ClientConfig;
use crate::net::{Api, ApiError, HttpApi};
use crate::notify::Notifier;
use crate::router::{RouteGuard, RouteTable};
use crate::services::{SessionManager, VideoManager};
use crate::storage::{FileTokenStore, TokenStore};

pub struct ClientContext {
    pub session: SessionManager,
    pub videos: VideoManager,
    pub guard: RouteGuard,
    tokens: Arc<dyn TokenStore>,
}

impl ClientContext {
    /// Assemble a context from already-built collaborators.
    #[must_use]
    pub fn new(
        api: Arc<dyn Api>,
        tokens: Arc<dyn TokenStore>,
        notifier: Arc<dyn Notifier>,
        routes: RouteTable,
    ) -> Self {
        let session = SessionManager::new(api.clone(), tokens.clone(), notifier.clone());
        let videos = VideoManager::new(api, notifier);
        let guard = RouteGuard::new(routes, tokens.clone());
        Self { session, videos, guard, tokens }
    }

    /// HTTP transport plus file-backed token store from config, standard
    /// routes. The session is checked optimistically before returning.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &ClientConfig, notifier: Arc<dyn Notifier>) -> Result<Self, ApiError> {
        let tokens: Arc<dyn TokenStore> = Arc::new(FileTokenStore::new(&config.token_file));
        let api = Arc::new(HttpApi::new(config, tokens.clone())?);
        let ctx = Self::new(api, tokens, notifier, RouteTable::standard());
        ctx.session.check_auth();
        tracing::debug!(
            base_url = %config.base_url,
            authenticated = ctx.session.is_authenticated(),
            "client context ready"
        );
        Ok(ctx)
    }

    #[must_use]
    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }
}

#[cfg(test)]
#[path = "context_test.rs"]
mod tests;

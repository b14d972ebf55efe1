//! User-facing notices and the dispatch boundary for them.
//!
//! DESIGN
//! ======
//! State transitions never emit notices themselves. The managers in
//! `services` decide which notice an outcome deserves and hand it to a
//! `Notifier`. A UI drains a `NoticeQueue` (or installs its own notifier);
//! headless callers use `TracingNotifier`.

use std::sync::Mutex;

/// A fire-and-forget message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

impl Notice {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self::Success(message.into())
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error(message.into())
    }

    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Success(m) | Self::Error(m) => m,
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

/// Receives notices. Return values are never consumed by the core.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Logs every notice through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        match notice {
            Notice::Success(message) => tracing::info!(%message, "notice"),
            Notice::Error(message) => tracing::warn!(%message, "notice"),
        }
    }
}

/// Buffers notices until a consumer drains them.
#[derive(Debug, Default)]
pub struct NoticeQueue {
    pending: Mutex<Vec<Notice>>,
}

impl NoticeQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return every pending notice, oldest first.
    pub fn drain(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.pending.lock().unwrap_or_else(std::sync::PoisonError::into_inner))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Notifier for NoticeQueue {
    fn notify(&self, notice: Notice) {
        self.pending
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(notice);
    }
}

// =============================================================================
// MESSAGES
// =============================================================================

/// Default notice texts. Server-provided error messages take precedence
/// where an operation forwards them.
pub mod messages {
    pub const LOGIN_OK: &str = "Welcome!";
    pub const LOGIN_FAILED: &str = "Login failed";
    pub const REGISTER_OK: &str = "Account created";
    pub const REGISTER_FAILED: &str = "Registration failed";
    pub const LOGOUT_OK: &str = "Signed out";
    pub const LOGOUT_TOKEN_KEPT: &str = "Signed out, but the stored credential could not be erased";
    pub const VIDEOS_LOAD_FAILED: &str = "Could not load videos";
    pub const USER_VIDEOS_LOAD_FAILED: &str = "Could not load your videos";
    pub const UPLOAD_OK: &str = "Video uploaded";
    pub const UPLOAD_FAILED: &str = "Video upload failed";
    pub const EMBED_OK: &str = "Embed configuration created";
    pub const EMBED_FAILED: &str = "Could not create embed configuration";
    pub const DELETE_OK: &str = "Video deleted";
    pub const DELETE_FAILED: &str = "Could not delete video";
}

#[cfg(test)]
#[path = "notify_test.rs"]
mod tests;

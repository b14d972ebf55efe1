//! Wire types for the video hosting REST API and transport errors.
//!
//! Resource bodies are treated as pass-through data: the core reads `id` and
//! `slug` from a video and carries every other field untouched.

use serde::{Deserialize, Serialize};

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by API transport operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The server answered with a non-success status.
    #[error("request rejected: status {status}")]
    Rejected {
        status: u16,
        /// Server-provided `error` (or `msg`) text, when the body carried one.
        message: Option<String>,
    },

    /// No response was received (connect, timeout, TLS, body read).
    #[error("network failure: {0}")]
    Network(String),

    /// A success response body did not have the expected shape.
    #[error("response parse failed: {0}")]
    Parse(String),

    /// The request could not be assembled (bad header value, multipart part).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl ApiError {
    /// Server-provided message, if any.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Rejected { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Server-provided message, or `fallback` when the server sent none.
    #[must_use]
    pub fn message_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.server_message().unwrap_or(fallback)
    }

    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Extract the human-readable message from a failure body.
///
/// The API reports `{ "error": "..." }`; its JWT layer reports
/// `{ "msg": "..." }`. Anything else yields `None`.
#[must_use]
pub fn parse_error_message(body: &str) -> Option<String> {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: Option<String>,
        msg: Option<String>,
    }
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    parsed
        .error
        .or(parsed.msg)
        .filter(|m| !m.trim().is_empty())
}

// =============================================================================
// AUTH
// =============================================================================

/// Profile of an authenticated account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
}

/// Login payload. The backend keys accounts by username; some deployments
/// accept an email instead, so either may be sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub password: String,
}

impl Credentials {
    #[must_use]
    pub fn with_username(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self { username: Some(username.into()), email: None, password: password.into() }
    }

    #[must_use]
    pub fn with_email(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self { username: None, email: Some(email.into()), password: password.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// `POST /auth/login` success body.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub user: User,
}

// =============================================================================
// VIDEOS
// =============================================================================

pub type VideoId = i64;

/// A server-defined video resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub id: VideoId,
    pub slug: String,
    /// Every other field the server sent (title, urls, views, ...).
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

impl Video {
    /// Convenience accessor for a string field carried in `fields`.
    #[must_use]
    pub fn field_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(serde_json::Value::as_str)
    }
}

/// `POST /videos` success body. The API wraps the record as
/// `{ "message": ..., "video": {...} }`; a bare record is accepted too.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum UploadResponse {
    Wrapped { video: Video },
    Bare(Video),
}

impl UploadResponse {
    pub(crate) fn into_video(self) -> Video {
        match self {
            Self::Wrapped { video } | Self::Bare(video) => video,
        }
    }
}

pub const DEFAULT_VIDEO_TITLE: &str = "Untitled video";

/// Multipart upload payload for `POST /videos`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadForm {
    pub title: String,
    pub description: String,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl UploadForm {
    /// Build a form from an in-memory file. An empty title falls back to
    /// [`DEFAULT_VIDEO_TITLE`].
    #[must_use]
    pub fn new(title: &str, description: &str, file_name: &str, bytes: Vec<u8>) -> Self {
        let title = if title.trim().is_empty() { DEFAULT_VIDEO_TITLE } else { title };
        Self {
            title: title.to_owned(),
            description: description.to_owned(),
            file_name: file_name.to_owned(),
            content_type: guess_content_type(file_name).to_owned(),
            bytes,
        }
    }

    /// Read `path` from disk into a form.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub async fn from_path(
        path: &std::path::Path,
        title: &str,
        description: &str,
    ) -> Result<Self, std::io::Error> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map_or_else(|| "video.mp4".to_owned(), |n| n.to_string_lossy().into_owned());
        Ok(Self::new(title, description, &file_name, bytes))
    }
}

/// Map a file extension to the MIME type sent with the upload part.
#[must_use]
pub fn guess_content_type(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "mp4" | "m4v" => "video/mp4",
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        "mkv" => "video/x-matroska",
        "avi" => "video/x-msvideo",
        "ogv" => "video/ogg",
        _ => "application/octet-stream",
    }
}

// =============================================================================
// EMBED
// =============================================================================

/// Player configuration for an embed. Defaults match the server's.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbedConfig {
    pub width: u32,
    pub height: u32,
    pub theme: String,
    pub controls: bool,
    pub autoplay: bool,
    #[serde(rename = "loop")]
    pub loop_playback: bool,
    pub preload: String,
}

impl Default for EmbedConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 450,
            theme: "default".to_owned(),
            controls: true,
            autoplay: false,
            loop_playback: false,
            preload: "metadata".to_owned(),
        }
    }
}

/// `POST /videos/{id}/embed` success body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedCode {
    pub embed_code: String,
    pub embed_url: String,
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;

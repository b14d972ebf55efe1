//! REST transport for the video hosting API.
//!
//! `Api` is the seam the managers call through; `HttpApi` is the `reqwest`
//! implementation. Tests substitute a recording mock.
//!
//! ERROR HANDLING
//! ==============
//! The transport reports every failure as an `ApiError`. It never decides
//! what the user sees: converting failures into notices and sentinel return
//! values is the managers' job.
//!
//! AUTHORIZATION
//! =============
//! Every request reads the token store at send time and attaches
//! `Authorization: Bearer <token>` when a token exists. Nothing is cached, so
//! a login or logout is visible to the very next request.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;

use super::types::{
    ApiError, Credentials, EmbedCode, EmbedConfig, LoginResponse, Registration, UploadForm, UploadResponse, User,
    Video, VideoId, parse_error_message,
};
use crate::config::ClientConfig;
use crate::storage::TokenStore;

/// Provider-neutral async trait for the API. Enables mocking in tests.
#[async_trait::async_trait]
pub trait Api: Send + Sync {
    /// `POST /auth/login`
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError>;

    /// `POST /auth/register`
    async fn register(&self, registration: &Registration) -> Result<(), ApiError>;

    /// `GET /user`
    async fn current_user(&self) -> Result<User, ApiError>;

    /// `GET /videos`
    async fn list_videos(&self) -> Result<Vec<Video>, ApiError>;

    /// `GET /user/videos`
    async fn list_user_videos(&self) -> Result<Vec<Video>, ApiError>;

    /// `POST /videos` (multipart)
    async fn upload_video(&self, form: &UploadForm) -> Result<Video, ApiError>;

    /// `GET /videos/{slug}`
    async fn get_video(&self, slug: &str) -> Result<Video, ApiError>;

    /// `POST /videos/{id}/embed`
    async fn create_embed(&self, video_id: VideoId, config: &EmbedConfig) -> Result<EmbedCode, ApiError>;

    /// `DELETE /videos/{id}`
    async fn delete_video(&self, video_id: VideoId) -> Result<(), ApiError>;
}

// =============================================================================
// CLIENT
// =============================================================================

pub struct HttpApi {
    http: reqwest::Client,
    base_url: reqwest::Url,
    tokens: Arc<dyn TokenStore>,
}

impl HttpApi {
    /// Build a transport from typed config.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL does not parse or the HTTP client
    /// fails to build.
    pub fn new(config: &ClientConfig, tokens: Arc<dyn TokenStore>) -> Result<Self, ApiError> {
        let base_url = reqwest::Url::parse(&config.base_url)
            .map_err(|e| ApiError::HttpClientBuild(format!("invalid base URL '{}': {e}", config.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::HttpClientBuild(format!("base URL cannot hold a path: {base_url}")));
        }
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| ApiError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url, tokens })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Append path segments to the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<reqwest::Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidRequest(format!("base URL cannot hold a path: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: reqwest::Method, segments: &[&str]) -> Result<reqwest::RequestBuilder, ApiError> {
        let url = self.endpoint(segments)?;
        tracing::debug!(%method, %url, "api request");
        let builder = self.http.request(method, url);
        Ok(match self.tokens.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    async fn send_json<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T, ApiError> {
        let text = self.send(request).await?;
        serde_json::from_str(&text).map_err(|e| ApiError::Parse(e.to_string()))
    }

    /// Send and return the raw success body.
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<String, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), "api request rejected");
            return Err(ApiError::Rejected { status: status.as_u16(), message: parse_error_message(&text) });
        }
        Ok(text)
    }
}

#[async_trait::async_trait]
impl Api for HttpApi {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        let req = self.request(reqwest::Method::POST, &["auth", "login"])?.json(credentials);
        self.send_json(req).await
    }

    async fn register(&self, registration: &Registration) -> Result<(), ApiError> {
        let req = self.request(reqwest::Method::POST, &["auth", "register"])?.json(registration);
        self.send(req).await.map(|_| ())
    }

    async fn current_user(&self) -> Result<User, ApiError> {
        let req = self.request(reqwest::Method::GET, &["user"])?;
        self.send_json(req).await
    }

    async fn list_videos(&self) -> Result<Vec<Video>, ApiError> {
        let req = self.request(reqwest::Method::GET, &["videos"])?;
        self.send_json(req).await
    }

    async fn list_user_videos(&self) -> Result<Vec<Video>, ApiError> {
        let req = self.request(reqwest::Method::GET, &["user", "videos"])?;
        self.send_json(req).await
    }

    async fn upload_video(&self, form: &UploadForm) -> Result<Video, ApiError> {
        let part = reqwest::multipart::Part::bytes(form.bytes.clone())
            .file_name(form.file_name.clone())
            .mime_str(&form.content_type)
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
        let body = reqwest::multipart::Form::new()
            .text("title", form.title.clone())
            .text("description", form.description.clone())
            .part("video", part);

        let req = self.request(reqwest::Method::POST, &["videos"])?.multipart(body);
        let created: UploadResponse = self.send_json(req).await?;
        Ok(created.into_video())
    }

    async fn get_video(&self, slug: &str) -> Result<Video, ApiError> {
        let req = self.request(reqwest::Method::GET, &["videos", slug])?;
        self.send_json(req).await
    }

    async fn create_embed(&self, video_id: VideoId, config: &EmbedConfig) -> Result<EmbedCode, ApiError> {
        let id = video_id.to_string();
        let req = self.request(reqwest::Method::POST, &["videos", id.as_str(), "embed"])?.json(config);
        self.send_json(req).await
    }

    async fn delete_video(&self, video_id: VideoId) -> Result<(), ApiError> {
        let id = video_id.to_string();
        let req = self.request(reqwest::Method::DELETE, &["videos", id.as_str()])?;
        self.send(req).await.map(|_| ())
    }
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;

//! Scripted `Api` double shared by the manager tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::net::Api;
use crate::net::types::{
    ApiError, Credentials, EmbedCode, EmbedConfig, LoginResponse, Registration, UploadForm, User, Video, VideoId,
};

/// One scripted outcome for an endpoint.
pub enum Reply {
    Ok(Value),
    Reject(u16, Option<&'static str>),
    Network,
    /// Never resolves; lets a test observe in-flight state or cancel.
    Pending,
}

/// Records every call and answers from per-endpoint reply queues.
/// An endpoint with an empty queue fails with a network error.
#[derive(Default)]
pub struct MockApi {
    replies: Mutex<HashMap<&'static str, VecDeque<Reply>>>,
    calls: Mutex<Vec<String>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(&self, endpoint: &'static str, reply: Reply) -> &Self {
        self.replies
            .lock()
            .unwrap()
            .entry(endpoint)
            .or_default()
            .push_back(reply);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    async fn answer<T: DeserializeOwned>(&self, endpoint: &'static str, call: String) -> Result<T, ApiError> {
        self.calls.lock().unwrap().push(call);
        let reply = self
            .replies
            .lock()
            .unwrap()
            .get_mut(endpoint)
            .and_then(VecDeque::pop_front);
        match reply {
            Some(Reply::Ok(value)) => serde_json::from_value(value).map_err(|e| ApiError::Parse(e.to_string())),
            Some(Reply::Reject(status, message)) => {
                Err(ApiError::Rejected { status, message: message.map(ToOwned::to_owned) })
            }
            Some(Reply::Pending) => std::future::pending().await,
            Some(Reply::Network) | None => Err(ApiError::Network("connection refused".into())),
        }
    }
}

#[async_trait::async_trait]
impl Api for MockApi {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        let who = credentials
            .email
            .clone()
            .or_else(|| credentials.username.clone())
            .unwrap_or_default();
        self.answer("login", format!("login {who}")).await
    }

    async fn register(&self, registration: &Registration) -> Result<(), ApiError> {
        self.answer("register", format!("register {}", registration.username))
            .await
    }

    async fn current_user(&self) -> Result<User, ApiError> {
        self.answer("current_user", "current_user".into()).await
    }

    async fn list_videos(&self) -> Result<Vec<Video>, ApiError> {
        self.answer("list_videos", "list_videos".into()).await
    }

    async fn list_user_videos(&self) -> Result<Vec<Video>, ApiError> {
        self.answer("list_user_videos", "list_user_videos".into())
            .await
    }

    async fn upload_video(&self, form: &UploadForm) -> Result<Video, ApiError> {
        self.answer("upload_video", format!("upload_video {}", form.title))
            .await
    }

    async fn get_video(&self, slug: &str) -> Result<Video, ApiError> {
        self.answer("get_video", format!("get_video {slug}")).await
    }

    async fn create_embed(&self, video_id: VideoId, _config: &EmbedConfig) -> Result<EmbedCode, ApiError> {
        self.answer("create_embed", format!("create_embed {video_id}"))
            .await
    }

    async fn delete_video(&self, video_id: VideoId) -> Result<(), ApiError> {
        self.answer("delete_video", format!("delete_video {video_id}"))
            .await
    }
}

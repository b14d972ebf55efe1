//! Video manager: catalog and owner lists, uploads, lookup, embeds and deletes.
//!
//! CACHE CONSISTENCY
//! =================
//! Upload and delete refresh `user_videos` before returning, so the owner's
//! list reads its own writes. The public catalog (`videos`) is never
//! refreshed implicitly and may show a deleted record until the next
//! `get_all_videos`.

use std::sync::{Arc, Mutex};

use super::{LoadingGuard, lock};
use crate::net::Api;
use crate::net::types::{EmbedCode, EmbedConfig, UploadForm, Video, VideoId};
use crate::notify::{Notice, Notifier, messages};
use crate::state::VideoState;

fn loading_flag(state: &mut VideoState) -> &mut bool {
    &mut state.loading
}

pub struct VideoManager {
    api: Arc<dyn Api>,
    notifier: Arc<dyn Notifier>,
    state: Mutex<VideoState>,
}

impl VideoManager {
    #[must_use]
    pub fn new(api: Arc<dyn Api>, notifier: Arc<dyn Notifier>) -> Self {
        Self { api, notifier, state: Mutex::new(VideoState::default()) }
    }

    #[must_use]
    pub fn snapshot(&self) -> VideoState {
        lock(&self.state).clone()
    }

    #[must_use]
    pub fn videos(&self) -> Vec<Video> {
        lock(&self.state).videos.clone()
    }

    #[must_use]
    pub fn user_videos(&self) -> Vec<Video> {
        lock(&self.state).user_videos.clone()
    }

    #[must_use]
    pub fn current_video(&self) -> Option<Video> {
        lock(&self.state).current_video.clone()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        lock(&self.state).loading
    }

    /// Replace the catalog with the server's. Returns whether it succeeded.
    pub async fn get_all_videos(&self) -> bool {
        let _loading = LoadingGuard::begin(&self.state, loading_flag);

        match self.api.list_videos().await {
            Ok(videos) => {
                tracing::debug!(count = videos.len(), "catalog loaded");
                lock(&self.state).catalog_loaded(videos);
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "loading catalog failed");
                self.notifier
                    .notify(Notice::error(messages::VIDEOS_LOAD_FAILED));
                false
            }
        }
    }

    /// Replace the caller's own list. Returns whether it succeeded.
    pub async fn get_user_videos(&self) -> bool {
        let _loading = LoadingGuard::begin(&self.state, loading_flag);

        match self.api.list_user_videos().await {
            Ok(videos) => {
                tracing::debug!(count = videos.len(), "user videos loaded");
                lock(&self.state).user_videos_loaded(videos);
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "loading user videos failed");
                self.notifier
                    .notify(Notice::error(messages::USER_VIDEOS_LOAD_FAILED));
                false
            }
        }
    }

    /// Upload a file and refresh the owner's list. Returns the created record.
    pub async fn upload_video(&self, form: &UploadForm) -> Option<Video> {
        let _loading = LoadingGuard::begin(&self.state, loading_flag);

        match self.api.upload_video(form).await {
            Ok(video) => {
                tracing::info!(video_id = video.id, slug = %video.slug, bytes = form.bytes.len(), "video uploaded");
                self.notifier.notify(Notice::success(messages::UPLOAD_OK));
                self.get_user_videos().await;
                Some(video)
            }
            Err(e) => {
                tracing::warn!(error = %e, "video upload failed");
                self.notifier
                    .notify(Notice::error(e.message_or(messages::UPLOAD_FAILED)));
                None
            }
        }
    }

    /// Open a video by slug. On failure the previous `current_video` stays.
    pub async fn get_video(&self, slug: &str) -> Option<Video> {
        let _loading = LoadingGuard::begin(&self.state, loading_flag);

        match self.api.get_video(slug).await {
            Ok(video) => {
                lock(&self.state).video_opened(video.clone());
                Some(video)
            }
            Err(e) => {
                tracing::warn!(%slug, error = %e, "loading video failed");
                None
            }
        }
    }

    /// Create an embed configuration. Cached records are not modified.
    pub async fn create_embed_config(&self, video_id: VideoId, config: &EmbedConfig) -> Option<EmbedCode> {
        match self.api.create_embed(video_id, config).await {
            Ok(code) => {
                tracing::info!(video_id, embed_url = %code.embed_url, "embed configuration created");
                self.notifier.notify(Notice::success(messages::EMBED_OK));
                Some(code)
            }
            Err(e) => {
                tracing::warn!(video_id, error = %e, "embed configuration failed");
                self.notifier.notify(Notice::error(messages::EMBED_FAILED));
                None
            }
        }
    }

    /// Delete a video and refresh the owner's list. The catalog stays stale.
    pub async fn delete_video(&self, video_id: VideoId) -> bool {
        match self.api.delete_video(video_id).await {
            Ok(()) => {
                tracing::info!(video_id, "video deleted");
                self.notifier.notify(Notice::success(messages::DELETE_OK));
                self.get_user_videos().await;
                true
            }
            Err(e) => {
                tracing::warn!(video_id, error = %e, "video delete failed");
                self.notifier.notify(Notice::error(messages::DELETE_FAILED));
                false
            }
        }
    }
}

#[cfg(test)]
#[path = "videos_test.rs"]
mod tests;

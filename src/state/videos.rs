#[cfg(test)]
#[path = "videos_test.rs"]
mod videos_test;

use crate::net::types::Video;

/// Cached video collections.
///
/// `videos` (public catalog) and `user_videos` (the caller's own uploads) are
/// independent caches. Nothing keeps them consistent: refreshing one never
/// touches the other.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VideoState {
    pub videos: Vec<Video>,
    pub user_videos: Vec<Video>,
    pub current_video: Option<Video>,
    pub loading: bool,
}

impl VideoState {
    pub fn catalog_loaded(&mut self, videos: Vec<Video>) {
        self.videos = videos;
    }

    pub fn user_videos_loaded(&mut self, videos: Vec<Video>) {
        self.user_videos = videos;
    }

    pub fn video_opened(&mut self, video: Video) {
        self.current_video = Some(video);
    }
}

use super::{
    fetch_caption_tracks, locate_credential, resolve_video_id, select_track, HttpFetcher,
    Transcript, VideoId,
};
use crate::captions::fetch_caption_lines;
use crate::{ExtractionError, ExtractionResult};

/// YouTube transcript extractor built on the caption endpoints
pub struct YoutubeExtractor<H> {
    http: H,
}

impl<H: HttpFetcher> YoutubeExtractor<H> {
    pub fn new(http: H) -> Self {
        Self { http }
    }

    /// Load the watch page for a video URL (or bare ID) and extract its transcript
    pub async fn extract(&self, input: &str) -> ExtractionResult {
        let video_id = VideoId::from_input(input).ok_or(ExtractionError::IdentifierNotFound)?;
        let page = self.fetch_watch_page(&video_id).await?;
        self.extract_video(video_id, &page).await
    }

    /// Extract the transcript for `url` from an already loaded watch page
    pub async fn extract_from_page(&self, url: &str, page: &str) -> ExtractionResult {
        let video_id = resolve_video_id(url).ok_or(ExtractionError::IdentifierNotFound)?;
        self.extract_video(video_id, page).await
    }

    async fn fetch_watch_page(&self, video_id: &VideoId) -> Result<String, ExtractionError> {
        tracing::info!("Fetching watch page for video: {}", video_id);

        let response = self.http.get(&video_id.watch_url()).await?;
        if !response.is_success() {
            return Err(ExtractionError::PageRequestFailed(response.status));
        }

        Ok(response.body)
    }

    async fn extract_video(&self, video_id: VideoId, page: &str) -> ExtractionResult {
        let key = locate_credential(page)?;

        tracing::debug!("Requesting caption tracks for video: {}", video_id);
        let tracks = fetch_caption_tracks(&self.http, &video_id, &key).await?;
        let track = select_track(&tracks).ok_or(ExtractionError::NoCaptionsAvailable)?;

        tracing::info!(
            "Using caption track {} ({})",
            track.language_code,
            track.name.as_deref().unwrap_or("unnamed")
        );

        let lines = fetch_caption_lines(&self.http, track).await?;
        Transcript::new(video_id, track.language_code.clone(), lines)
    }
}

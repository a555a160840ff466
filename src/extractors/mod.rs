use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE, USER_AGENT};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub mod credential;
pub mod tracks;
pub mod video_id;
pub mod youtube;

pub use credential::{locate_credential, ApiKey};
pub use tracks::{fetch_caption_tracks, select_track};
pub use video_id::resolve_video_id;

use crate::config::HttpConfig;
use crate::ExtractionError;

/// Canonical identifier of a YouTube video
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct VideoId(String);

impl VideoId {
    pub(crate) fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Accept either a video URL or a bare 11-character video ID
    pub fn from_input(input: &str) -> Option<Self> {
        let input = input.trim();
        if let Some(id) = resolve_video_id(input) {
            return Some(id);
        }

        let is_bare_id = input.len() == 11
            && input
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        is_bare_id.then(|| Self::new(input))
    }

    /// Watch page URL for this video
    pub fn watch_url(&self) -> String {
        format!(
            "https://www.youtube.com/watch?v={}",
            urlencoding::encode(&self.0)
        )
    }
}

impl std::fmt::Display for VideoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One caption track offered by the player endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionTrack {
    /// Language code such as `en` or `en-US`
    pub language_code: String,

    /// Location of the raw caption payload
    pub base_url: String,

    /// Display name of the track, if the endpoint sent one
    #[serde(default, deserialize_with = "tracks::deserialize_track_name")]
    pub name: Option<String>,

    /// `asr` for auto-generated tracks
    #[serde(default)]
    pub kind: Option<String>,
}

/// Decoded transcript of a single caption track
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transcript {
    video_id: VideoId,
    language_code: String,
    fetched_at: DateTime<Utc>,
    lines: Vec<String>,
}

impl Transcript {
    /// Build a transcript, refusing an empty line sequence
    pub fn new(
        video_id: VideoId,
        language_code: impl Into<String>,
        lines: Vec<String>,
    ) -> Result<Self, ExtractionError> {
        if lines.is_empty() {
            return Err(ExtractionError::EmptyTranscript);
        }

        Ok(Self {
            video_id,
            language_code: language_code.into(),
            fetched_at: Utc::now(),
            lines,
        })
    }

    pub fn video_id(&self) -> &VideoId {
        &self.video_id
    }

    pub fn language_code(&self) -> &str {
        &self.language_code
    }

    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Newline-joined transcript text
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// Status and body of a completed HTTP request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Network access used by the pipeline
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpFetcher: Send + Sync {
    /// Issue a GET request and read the body as text
    async fn get(&self, url: &str) -> Result<HttpResponse, ExtractionError>;

    /// Issue a POST request with a JSON body and read the response as text
    async fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<HttpResponse, ExtractionError>;
}

/// `HttpFetcher` backed by a shared reqwest client
pub struct ReqwestFetcher {
    client: reqwest::Client,
}

impl ReqwestFetcher {
    pub fn new(config: &HttpConfig) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_str(&config.user_agent)?);
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_str(&config.accept_language)?,
        );

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
        })
    }

    async fn read(response: reqwest::Response) -> Result<HttpResponse, ExtractionError> {
        let status = response.status().as_u16();
        let body = response.text().await.map_err(transport_error)?;
        Ok(HttpResponse::new(status, body))
    }
}

#[async_trait]
impl HttpFetcher for ReqwestFetcher {
    async fn get(&self, url: &str) -> Result<HttpResponse, ExtractionError> {
        tracing::debug!("GET {}", url);
        let response = self.client.get(url).send().await.map_err(transport_error)?;
        Self::read(response).await
    }

    async fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<HttpResponse, ExtractionError> {
        tracing::debug!("POST {}", url);
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;
        Self::read(response).await
    }
}

fn transport_error(err: reqwest::Error) -> ExtractionError {
    ExtractionError::Transport(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_input_accepts_bare_id() {
        let id = VideoId::from_input("  dQw4w9WgXcQ ").unwrap();
        assert_eq!(id.as_str(), "dQw4w9WgXcQ");
    }

    #[test]
    fn test_from_input_prefers_url_forms() {
        let id = VideoId::from_input("https://youtu.be/dQw4w9WgXcQ?si=abc").unwrap();
        assert_eq!(id.as_str(), "dQw4w9WgXcQ");
    }

    #[test]
    fn test_from_input_accepts_any_eleven_char_token() {
        let id = VideoId::from_input("not-a-video").unwrap();
        assert_eq!(id.as_str(), "not-a-video");
        assert_eq!(VideoId::from_input("___________").unwrap().as_str(), "___________");
    }

    #[test]
    fn test_from_input_rejects_other_text() {
        assert!(VideoId::from_input("not a video").is_none());
        assert!(VideoId::from_input("dQw4w9WgXc").is_none());
        assert!(VideoId::from_input("dQw4w9WgXcQQ").is_none());
        assert!(VideoId::from_input("dQw4w9WgX.Q").is_none());
        assert!(VideoId::from_input("https://example.com/watch?v=dQw4w9WgXcQ").is_none());
    }

    #[test]
    fn test_watch_url() {
        let id = VideoId::new("dQw4w9WgXcQ");
        assert_eq!(id.watch_url(), "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
    }

    #[test]
    fn test_transcript_rejects_empty_lines() {
        let result = Transcript::new(VideoId::new("abc"), "en", Vec::new());
        assert_eq!(result.unwrap_err(), ExtractionError::EmptyTranscript);
    }

    #[test]
    fn test_transcript_text_joins_lines() {
        let transcript = Transcript::new(
            VideoId::new("abc"),
            "en",
            vec!["first".to_string(), "second".to_string()],
        )
        .unwrap();
        assert_eq!(transcript.text(), "first\nsecond");
        assert_eq!(transcript.language_code(), "en");
    }

    #[test]
    fn test_http_response_success_range() {
        let ok = HttpResponse::new(204, "");
        let bad = HttpResponse::new(403, "");
        assert!(ok.is_success());
        assert!(!bad.is_success());
    }
}

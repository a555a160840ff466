//! yt-transcript - A Rust CLI tool for pulling caption transcripts from YouTube
//!
//! This library locates the player API key embedded in a watch page, asks the player
//! endpoint for the video's caption tracks, and decodes the caption payload into clean
//! transcript lines. Transcripts can optionally be summarized with the Anthropic API.

pub mod captions;
pub mod cli;
pub mod config;
pub mod extractors;
pub mod output;
pub mod summarize;
pub mod utils;

pub use cli::{Cli, Commands, OutputFormat};
pub use config::Config;
pub use extractors::youtube::YoutubeExtractor;
pub use extractors::{CaptionTrack, HttpFetcher, ReqwestFetcher, Transcript, VideoId};
pub use summarize::Summarizer;

/// Result type used by the binary and the outer layers
pub type Result<T> = anyhow::Result<T>;

/// Outcome of one extraction request
pub type ExtractionResult = std::result::Result<Transcript, ExtractionError>;

/// Terminal failures of the transcript pipeline
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("Not a recognized YouTube video URL")]
    IdentifierNotFound,

    #[error("Watch page request failed: HTTP {0}")]
    PageRequestFailed(u16),

    #[error("Could not find the player API key in the video page")]
    CredentialNotFound,

    #[error("Player metadata request failed: HTTP {0}")]
    MetadataRequestFailed(u16),

    #[error("Player metadata response could not be read: {0}")]
    MetadataUnparsable(String),

    #[error("No captions available for this video")]
    NoCaptionsAvailable,

    #[error("Caption request failed: HTTP {0}")]
    CaptionRequestFailed(u16),

    #[error("Caption track returned an empty response")]
    EmptyCaptionPayload,

    #[error("Caption payload did not match any known caption format")]
    MalformedCaptionPayload,

    #[error("Transcript is empty after parsing")]
    EmptyTranscript,

    #[error("Network error: {0}")]
    Transport(String),
}

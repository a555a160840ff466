//! Caption payload decoding.
//!
//! The timedtext endpoint answers in one of two XML shapes:
//!
//! * flat cues, `<text start=".." dur="..">escaped text</text>`
//! * segmented paragraphs, `<p t=".." d=".."><s>word</s><s> word</s></p>`,
//!   where a paragraph may also hold plain escaped text with no `<s>` children
//!
//! Both are handled with tolerant pattern matching instead of a validating XML
//! parser, so a truncated or slightly broken document still yields its cues.

use once_cell::sync::Lazy;
use regex::Regex;

pub mod entities;

pub use entities::decode_entities;

use crate::extractors::{CaptionTrack, HttpFetcher};
use crate::ExtractionError;

/// Bodies shorter than this carry no cues
const MIN_PAYLOAD_CHARS: usize = 10;

static TEXT_CUE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<text\b[^>]*>(.*?)</text>").expect("valid cue pattern"));
static PARAGRAPH_CUE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<p\b[^>]*>(.*?)</p>").expect("valid cue pattern"));
static SEGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<s\b[^>]*>(.*?)</s>").expect("valid segment pattern"));
static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid tag pattern"));
static WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

/// The two known caption payload shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// `<text>` cue list
    FlatCues,
    /// `<p>` paragraphs with optional `<s>` segments
    Segmented,
}

impl Dialect {
    /// Classify a payload by probing for a `<text` tag
    pub fn detect(payload: &str) -> Self {
        if payload.contains("<text") {
            Dialect::FlatCues
        } else {
            Dialect::Segmented
        }
    }

    fn cue_pattern(self) -> &'static Regex {
        match self {
            Dialect::FlatCues => Lazy::force(&TEXT_CUE),
            Dialect::Segmented => Lazy::force(&PARAGRAPH_CUE),
        }
    }

    /// Raw (still escaped) text of one cue element's inner markup
    fn raw_cue_text(self, inner: &str) -> String {
        match self {
            Dialect::FlatCues => inner.to_string(),
            Dialect::Segmented => {
                let mut segments = SEGMENT.captures_iter(inner).peekable();
                if segments.peek().is_none() {
                    return inner.to_string();
                }
                segments.map(|caps| caps[1].to_string()).collect()
            }
        }
    }
}

/// Turn one cue's raw content into a display line.
///
/// Inline tags become word breaks, then any whitespace run collapses to one space.
fn clean_cue(raw: &str) -> String {
    let untagged = TAG.replace_all(raw, " ");
    let collapsed = WHITESPACE.replace_all(&untagged, " ");
    decode_entities(&collapsed).trim().to_string()
}

/// Parse a caption payload into ordered, non-empty transcript lines
pub fn parse_caption_payload(payload: &str) -> Result<Vec<String>, ExtractionError> {
    if payload.trim().chars().count() < MIN_PAYLOAD_CHARS {
        return Err(ExtractionError::EmptyCaptionPayload);
    }

    let dialect = Dialect::detect(payload);
    let mut cue_count = 0usize;
    let lines: Vec<String> = dialect
        .cue_pattern()
        .captures_iter(payload)
        .inspect(|_| cue_count += 1)
        .map(|caps| clean_cue(&dialect.raw_cue_text(&caps[1])))
        .filter(|line| !line.is_empty())
        .collect();

    tracing::debug!(
        "Parsed {:?} caption payload: {} cue(s), {} line(s)",
        dialect,
        cue_count,
        lines.len()
    );

    if cue_count == 0 {
        return Err(ExtractionError::MalformedCaptionPayload);
    }
    if lines.is_empty() {
        return Err(ExtractionError::EmptyTranscript);
    }

    Ok(lines)
}

/// Download a track's caption payload and parse it
pub async fn fetch_caption_lines<H>(
    http: &H,
    track: &CaptionTrack,
) -> Result<Vec<String>, ExtractionError>
where
    H: HttpFetcher + ?Sized,
{
    let response = http.get(&track.base_url).await?;
    if !response.is_success() {
        return Err(ExtractionError::CaptionRequestFailed(response.status));
    }

    parse_caption_payload(&response.body)
}

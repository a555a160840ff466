use serde::{Deserialize, Deserializer};
use serde_json::{json, Value};

use super::{ApiKey, CaptionTrack, HttpFetcher, VideoId};
use crate::ExtractionError;

const PLAYER_API_URL: &str = "https://www.youtube.com/youtubei/v1/player";

// The ANDROID client gets caption URLs without the WEB client's extra
// parameters, which break the timedtext payload.
const CLIENT_NAME: &str = "ANDROID";
const CLIENT_VERSION: &str = "20.10.38";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayerResponse {
    captions: Option<Captions>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Captions {
    player_captions_tracklist_renderer: Option<TracklistRenderer>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TracklistRenderer {
    #[serde(default)]
    caption_tracks: Vec<Value>,
}

fn player_request_body(video_id: &VideoId) -> Value {
    json!({
        "context": {
            "client": {
                "clientName": CLIENT_NAME,
                "clientVersion": CLIENT_VERSION
            }
        },
        "videoId": video_id.as_str()
    })
}

/// Ask the player endpoint for the caption tracks of a video
pub async fn fetch_caption_tracks<H>(
    http: &H,
    video_id: &VideoId,
    key: &ApiKey,
) -> Result<Vec<CaptionTrack>, ExtractionError>
where
    H: HttpFetcher + ?Sized,
{
    let url = format!("{}?key={}", PLAYER_API_URL, urlencoding::encode(key.as_str()));
    let response = http.post_json(&url, &player_request_body(video_id)).await?;

    if !response.is_success() {
        return Err(ExtractionError::MetadataRequestFailed(response.status));
    }

    parse_caption_tracks(&response.body)
}

/// Pull the caption track list out of a player response body
pub fn parse_caption_tracks(body: &str) -> Result<Vec<CaptionTrack>, ExtractionError> {
    let player: PlayerResponse = serde_json::from_str(body)
        .map_err(|e| ExtractionError::MetadataUnparsable(e.to_string()))?;

    let raw_tracks = player
        .captions
        .and_then(|c| c.player_captions_tracklist_renderer)
        .map(|r| r.caption_tracks)
        .unwrap_or_default();

    // Entries missing a language code or URL are unusable
    let tracks: Vec<CaptionTrack> = raw_tracks
        .into_iter()
        .filter_map(|raw| serde_json::from_value(raw).ok())
        .collect();

    if tracks.is_empty() {
        return Err(ExtractionError::NoCaptionsAvailable);
    }

    tracing::debug!("Player response lists {} caption track(s)", tracks.len());
    Ok(tracks)
}

/// Pick the first English track, or the first track when none is English
pub fn select_track(tracks: &[CaptionTrack]) -> Option<&CaptionTrack> {
    tracks
        .iter()
        .find(|track| track.language_code.starts_with("en"))
        .or_else(|| tracks.first())
}

/// Track names arrive either as `simpleText` or as a list of text runs
pub(crate) fn deserialize_track_name<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(track_name_text))
}

fn track_name_text(value: &Value) -> Option<String> {
    value
        .get("simpleText")
        .and_then(Value::as_str)
        .or_else(|| value.get("runs")?.as_array()?.first()?.get("text")?.as_str())
        .map(str::to_string)
}

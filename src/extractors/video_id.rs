use url::Url;

use super::VideoId;

const WATCH_HOSTS: &[&str] = &["youtube.com", "www.youtube.com", "m.youtube.com"];
const SHORT_LINK_HOST: &str = "youtu.be";

/// Path prefixes on the watch hosts that carry the ID as the next segment
const PATH_FORMS: &[&str] = &["shorts", "embed", "live"];

/// Resolve a YouTube URL into its video ID.
///
/// Returns `None` for URLs on other hosts or strings that don't parse as URLs.
pub fn resolve_video_id(url: &str) -> Option<VideoId> {
    let parsed = Url::parse(url.trim()).ok()?;
    let host = parsed.host_str()?.to_ascii_lowercase();

    if WATCH_HOSTS.contains(&host.as_str()) {
        if let Some((_, id)) = parsed.query_pairs().find(|(key, _)| key == "v") {
            return non_empty(&id);
        }

        let mut segments = parsed.path_segments()?;
        let prefix = segments.next()?;
        if PATH_FORMS.contains(&prefix) {
            return non_empty(segments.next()?);
        }
        return None;
    }

    if host == SHORT_LINK_HOST {
        return non_empty(parsed.path_segments()?.next()?);
    }

    None
}

fn non_empty(id: &str) -> Option<VideoId> {
    (!id.is_empty()).then(|| VideoId::new(id))
}

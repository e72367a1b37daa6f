/// Watch URL validation.
///
/// Accepts the URL shapes that identify exactly one YouTube video.
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

/// Hosts whose video id travels in the `v` query parameter.
const QUERY_HOSTS: &[&str] = &[
    "youtube.com",
    "www.youtube.com",
    "m.youtube.com",
    "music.youtube.com",
    "gaming.youtube.com",
];

/// Path prefixes on youtube.com hosts whose next segment is the video id.
const ID_PATH_PREFIXES: &[&str] = &["embed", "v", "shorts", "live"];

static VIDEO_ID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9_-]{11}$").unwrap()
});

/// Extract the video id from a single-video YouTube URL.
pub fn video_id(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return None;
    }
    let host = parsed.host_str()?;

    let is_short_host = host == "youtu.be";
    if !is_short_host && !QUERY_HOSTS.contains(&host) {
        return None;
    }

    // An explicit `v` wins on every host, matching the normalizer.
    let query_id = parsed
        .query_pairs()
        .find(|(key, value)| key == "v" && !value.is_empty())
        .map(|(_, value)| value.into_owned());

    let id = match query_id {
        Some(id) => id,
        None if is_short_host => parsed.path_segments()?.next()?.to_string(),
        None => {
            let mut segments = parsed.path_segments()?;
            match (segments.next(), segments.next()) {
                (Some(prefix), Some(id)) if ID_PATH_PREFIXES.contains(&prefix) => id.to_string(),
                _ => return None,
            }
        }
    };

    if VIDEO_ID_RE.is_match(&id) {
        Some(id)
    } else {
        None
    }
}

/// Whether `url` identifies a single YouTube video.
pub fn is_watch_url(url: &str) -> bool {
    video_id(url).is_some()
}

/// YouTube URL normalization.
///
/// Rewrites share links and tracking-laden URLs into the canonical
/// `https://www.youtube.com/watch?v=<id>` form before they reach a resolver.
/// Anything that cannot be canonicalized is passed through untouched so the
/// resolver's own validation decides what to do with it.
use url::Url;

/// Hosts (after dropping a leading `www.`) that are rewritten.
const YOUTUBE_HOSTS: &[&str] = &["youtube.com", "youtu.be", "m.youtube.com"];

const CANONICAL_WATCH_URL: &str = "https://www.youtube.com/watch";

/// Tracking parameter that makes YouTube answer with 410 Gone.
const TRACKING_PARAM: &str = "si";

/// Normalize a user-supplied URL, or return it unchanged.
pub fn normalize(raw: &str) -> String {
    canonical_watch_url(raw).unwrap_or_else(|| raw.to_string())
}

/// Build the canonical watch URL for `raw`, if it is a recognized YouTube link
/// carrying a video id.
pub fn canonical_watch_url(raw: &str) -> Option<String> {
    let parsed = Url::parse(raw).ok()?;
    let host = parsed.host_str()?;
    let host = host.strip_prefix("www.").unwrap_or(host);

    if !YOUTUBE_HOSTS.contains(&host) {
        return None;
    }

    let params: Vec<(String, String)> = parsed
        .query_pairs()
        .filter(|(key, _)| key != TRACKING_PARAM)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();
    let param = |name: &str| {
        params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    };

    // First non-empty `v`, the same lookup the watch-URL check uses.
    let query_id = params
        .iter()
        .find(|(key, value)| key == "v" && !value.is_empty())
        .map(|(_, value)| value.clone());

    let video_id = match query_id {
        Some(id) => id,
        None if host == "youtu.be" => parsed
            .path_segments()?
            .next()
            .filter(|segment| !segment.is_empty())?
            .to_string(),
        None => return None,
    };

    let mut canonical = Url::parse(CANONICAL_WATCH_URL).ok()?;
    {
        let mut query = canonical.query_pairs_mut();
        query.append_pair("v", &video_id);
        if let Some(timestamp) = param("t") {
            query.append_pair("t", timestamp);
        }
    }

    Some(canonical.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_link_with_tracking_param() {
        assert_eq!(
            normalize("https://youtu.be/abc123?si=XYZ"),
            "https://www.youtube.com/watch?v=abc123"
        );
    }

    #[test]
    fn test_preserves_timestamp() {
        assert_eq!(
            normalize("https://www.youtube.com/watch?v=abc123&t=42s"),
            "https://www.youtube.com/watch?v=abc123&t=42s"
        );
    }

    #[test]
    fn test_short_link_timestamp() {
        assert_eq!(
            normalize("https://youtu.be/dQw4w9WgXcQ?si=abc&t=10"),
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=10"
        );
    }

    #[test]
    fn test_not_a_url() {
        assert_eq!(normalize("not a url"), "not a url");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_mobile_host_drops_extra_params() {
        assert_eq!(
            normalize("https://m.youtube.com/watch?feature=share&v=dQw4w9WgXcQ&si=zzz"),
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ"
        );
    }

    #[test]
    fn test_other_hosts_unchanged() {
        let raw = "https://example.com/watch?v=abc123&si=XYZ";
        assert_eq!(normalize(raw), raw);

        let music = "https://music.youtube.com/watch?v=dQw4w9WgXcQ&si=XYZ";
        assert_eq!(normalize(music), music);
    }

    #[test]
    fn test_no_video_id_unchanged() {
        let shorts = "https://www.youtube.com/shorts/dQw4w9WgXcQ";
        assert_eq!(normalize(shorts), shorts);

        let bare = "https://youtu.be/";
        assert_eq!(normalize(bare), bare);

        let empty_v = "https://www.youtube.com/watch?v=";
        assert_eq!(normalize(empty_v), empty_v);
    }

    #[test]
    fn test_youtu_be_query_id_wins_over_path() {
        assert_eq!(
            normalize("https://youtu.be/pathid?v=queryid"),
            "https://www.youtube.com/watch?v=queryid"
        );
    }

    #[test]
    fn test_empty_v_skipped_for_later_v() {
        assert_eq!(
            normalize("https://youtu.be/xxx?v=&v=dQw4w9WgXcQ"),
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ"
        );
        assert_eq!(
            normalize("https://www.youtube.com/watch?v=&v=dQw4w9WgXcQ&si=abc"),
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ"
        );
    }

    #[test]
    fn test_youtu_be_first_segment_only() {
        assert_eq!(
            normalize("https://youtu.be/dQw4w9WgXcQ/extra"),
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ"
        );
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "https://www.youtube.com/watch?v=abc123",
            "https://www.youtube.com/watch?v=abc123&t=42s",
            "https://youtu.be/abc123?si=XYZ",
            "https://m.youtube.com/watch?v=a%20b&t=1m",
            "not a url",
            "https://example.com/",
        ];
        for input in inputs {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "input: {}", input);
        }
    }
}

//! Download filename sanitization.

/// Name used when a title sanitizes down to nothing.
pub const FALLBACK_NAME: &str = "video";

/// Characters Windows refuses in filenames; `"` and `\` would also break the
/// quoted `Content-Disposition` value.
const FORBIDDEN: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Turn a video title into a download filename stem.
///
/// Removes `< > : " / \ | ? *` and control characters (which cannot appear in
/// a header value), then trims surrounding whitespace.
pub fn sanitize_filename(title: &str) -> String {
    let cleaned: String = title
        .chars()
        .filter(|c| !FORBIDDEN.contains(c) && !c.is_control())
        .collect();
    let trimmed = cleaned.trim();

    if trimmed.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

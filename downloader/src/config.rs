/// Resolver configuration.
use std::time::Duration;

/// Browser identity presented to YouTube. Without it the player endpoints
/// answer 403 or 410 far more often.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

const DEFAULT_ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8";
const DEFAULT_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";
const DEFAULT_REFERER: &str = "https://www.youtube.com/";
const DEFAULT_ORIGIN: &str = "https://www.youtube.com";

/// Settings for [`crate::YtDlpResolver`], passed in explicitly so tests can
/// swap the extractor program and shorten the timeouts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Extractor executable, e.g. `yt-dlp` or `python3`.
    pub program: String,
    /// Arguments placed before everything else, e.g. `["-m", "yt_dlp"]`.
    pub program_args: Vec<String>,
    /// Request headers forwarded to the extractor.
    pub headers: Vec<(String, String)>,
    /// Upper bound for the metadata fetch.
    pub metadata_timeout: Duration,
    /// Upper bound for the wait on the first media chunk.
    pub open_timeout: Duration,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            program: "yt-dlp".to_string(),
            program_args: Vec::new(),
            headers: browser_headers(DEFAULT_USER_AGENT),
            metadata_timeout: Duration::from_secs(45),
            open_timeout: Duration::from_secs(30),
        }
    }
}

impl ResolverConfig {
    /// Split a command line such as `python3 -m yt_dlp` into program and
    /// leading arguments. Blank input keeps the current program.
    pub fn with_command(mut self, command: &str) -> Self {
        let mut parts = command.split_whitespace().map(str::to_string);
        if let Some(program) = parts.next() {
            self.program = program;
            self.program_args = parts.collect();
        }
        self
    }

    /// Replace the `User-Agent` header.
    pub fn with_user_agent(mut self, user_agent: &str) -> Self {
        self.headers.retain(|(name, _)| !name.eq_ignore_ascii_case("user-agent"));
        self.headers.insert(0, ("User-Agent".to_string(), user_agent.to_string()));
        self
    }

    pub fn with_timeouts(mut self, metadata: Duration, open: Duration) -> Self {
        self.metadata_timeout = metadata;
        self.open_timeout = open;
        self
    }
}

/// The header set a desktop Chrome sends when navigating on youtube.com.
pub fn browser_headers(user_agent: &str) -> Vec<(String, String)> {
    vec![
        ("User-Agent".to_string(), user_agent.to_string()),
        ("Accept".to_string(), DEFAULT_ACCEPT.to_string()),
        ("Accept-Language".to_string(), DEFAULT_ACCEPT_LANGUAGE.to_string()),
        ("Referer".to_string(), DEFAULT_REFERER.to_string()),
        ("Origin".to_string(), DEFAULT_ORIGIN.to_string()),
    ]
}

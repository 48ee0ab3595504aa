use std::path::PathBuf;
use std::time::Duration;

/// Public CORS proxies tried after the direct request fails, in priority order.
pub const DEFAULT_PROXY_URLS: &[&str] = &[
    "https://api.allorigins.win/raw?url=",
    "https://cors-anywhere.herokuapp.com/",
    "https://api.codetabs.com/v1/proxy?quest=",
];

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko)";

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Spreadsheet URL as shared by the editor; may be an edit link or a CSV export link.
    pub document_url: String,
    pub log_level: String,
    pub seed_path: Option<PathBuf>,
    pub sync_interval_secs: u64,
    /// Attempts per proxy strategy. The direct strategy always gets exactly one.
    pub retry_attempts: u32,
    /// Base backoff between attempts on the same proxy: `retry_delay_ms * attempt`.
    pub retry_delay_ms: u64,
    pub cache_duration_secs: u64,
    pub request_timeout_secs: u64,
    pub proxy_urls: Vec<String>,
    pub user_agent: String,
}

impl AppConfig {
    #[must_use]
    pub fn sync_interval(&self) -> Duration {
        Duration::from_secs(self.sync_interval_secs)
    }

    #[must_use]
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    #[must_use]
    pub fn cache_duration(&self) -> Duration {
        Duration::from_secs(self.cache_duration_secs)
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

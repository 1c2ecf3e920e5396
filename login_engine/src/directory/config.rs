use std::time::Duration;

pub const DEFAULT_DIRECTORY_URL: &str = "http://accounts";
pub const DEFAULT_DIRECTORY_TIMEOUT: Duration = Duration::from_secs(10);

/// Where the accounts service lives, and how long to wait for it. The base URL is fully resolved by the time it gets
/// here; it is up to the caller to decide between development and production hosts.
#[derive(Debug, Clone)]
pub struct DirectoryConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self { base_url: DEFAULT_DIRECTORY_URL.to_string(), timeout: DEFAULT_DIRECTORY_TIMEOUT }
    }
}

impl DirectoryConfig {
    pub fn new<S: Into<String>>(base_url: S, timeout: Duration) -> Self {
        Self { base_url: base_url.into(), timeout }
    }
}

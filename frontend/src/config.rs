//! Application configuration.
//!
//! The backend location is decided once, from the page host name, and then
//! carried around as a plain [`Config`] value. Nothing reads the host name
//! after start-up.

/// Backend used when the page is served from a loopback host.
pub const LOCAL_BACKEND_URL: &str = "http://localhost:3000";

/// Backend used for every other host.
pub const REMOTE_BACKEND_URL: &str = "https://cloudstore-backend.up.railway.app";

/// Multipart field carrying the file bytes.
pub const UPLOAD_FIELD: &str = "file";

/// Delay between the dispatch of two consecutive files of a selection (ms).
pub const STAGGER_MS: u32 = 100;

/// How long a success message stays visible (ms).
pub const SUCCESS_MESSAGE_MS: u32 = 3_000;

/// How long the progress bar lingers after an upload settles (ms).
pub const PROGRESS_HIDE_MS: u32 = 1_000;

/// Period of the simulated progress ticker (ms).
pub const PROGRESS_TICK_MS: u32 = 200;

/// Host names treated as local development.
const LOOPBACK_HOSTS: [&str; 4] = ["localhost", "127.0.0.1", "::1", "[::1]"];

/// Runtime configuration of the uploader.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the storage backend, without trailing slash.
    pub backend_url: String,
    /// Per-index dispatch delay. `0` sends every file immediately.
    pub stagger_ms: u32,
    pub success_message_ms: u32,
    pub progress_hide_ms: u32,
}

impl Config {
    /// Configuration pointing at an explicit backend.
    pub fn new(backend_url: impl Into<String>) -> Self {
        let backend_url = backend_url.into();
        Self {
            backend_url: backend_url.trim_end_matches('/').to_string(),
            stagger_ms: STAGGER_MS,
            success_message_ms: SUCCESS_MESSAGE_MS,
            progress_hide_ms: PROGRESS_HIDE_MS,
        }
    }

    /// Pick the backend from the host name the page is served from.
    pub fn for_hostname(hostname: &str) -> Self {
        if is_loopback(hostname) {
            Self::new(LOCAL_BACKEND_URL)
        } else {
            Self::new(REMOTE_BACKEND_URL)
        }
    }

    /// Read the host name from `window.location`.
    ///
    /// Falls back to the remote backend when the location is unavailable.
    pub fn from_window() -> Self {
        let hostname = gloo_utils::window()
            .location()
            .hostname()
            .unwrap_or_default();
        log::debug!("Resolving backend for host '{}'", hostname);
        Self::for_hostname(&hostname)
    }

    /// Disable dispatch staggering.
    pub fn without_stagger(mut self) -> Self {
        self.stagger_ms = 0;
        self
    }

    /// Full URL of the upload endpoint.
    pub fn upload_url(&self) -> String {
        format!("{}/upload", self.backend_url)
    }
}

fn is_loopback(hostname: &str) -> bool {
    LOOPBACK_HOSTS
        .iter()
        .any(|host| host.eq_ignore_ascii_case(hostname))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_localhost_uses_local_backend() {
        let config = Config::for_hostname("localhost");
        assert_eq!(config.backend_url, LOCAL_BACKEND_URL);
        assert_eq!(config.upload_url(), "http://localhost:3000/upload");

        assert_eq!(Config::for_hostname("127.0.0.1").backend_url, LOCAL_BACKEND_URL);
        assert_eq!(Config::for_hostname("[::1]").backend_url, LOCAL_BACKEND_URL);
    }

    #[test]
    fn test_other_hosts_use_remote_backend() {
        assert_eq!(Config::for_hostname("files.example.org").backend_url, REMOTE_BACKEND_URL);
        assert_eq!(Config::for_hostname("").backend_url, REMOTE_BACKEND_URL);
        // Only an exact loopback name counts
        assert_eq!(Config::for_hostname("localhost.example.org").backend_url, REMOTE_BACKEND_URL);
    }

    #[test]
    fn test_explicit_backend() {
        let config = Config::new("http://10.0.0.5:8080/");
        assert_eq!(config.upload_url(), "http://10.0.0.5:8080/upload");
        assert_eq!(config.stagger_ms, STAGGER_MS);
        assert_eq!(config.without_stagger().stagger_ms, 0);
    }
}

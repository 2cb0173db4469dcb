use std::path::PathBuf;

/// Client configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the REST API (default: `http://localhost:3000/api/v1`).
    pub api_base_url: String,
    /// Base URL for previously uploaded documents
    /// (default: `http://localhost:3000/uploads`).
    pub upload_base_url: String,
    /// Path of the persisted session file
    /// (default: `$HOME/.siteflow/session.json`).
    pub session_file: PathBuf,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
}

impl ClientConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                          |
    /// |------------------------|----------------------------------|
    /// | `API_BASE_URL`         | `http://localhost:3000/api/v1`   |
    /// | `UPLOAD_BASE_URL`      | `http://localhost:3000/uploads`  |
    /// | `SESSION_FILE`         | `$HOME/.siteflow/session.json`   |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                             |
    pub fn from_env() -> Self {
        let api_base_url = std::env::var("API_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:3000/api/v1".into());

        let upload_base_url = std::env::var("UPLOAD_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:3000/uploads".into());

        let session_file = std::env::var("SESSION_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_session_file());

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        Self {
            api_base_url,
            upload_base_url,
            session_file,
            request_timeout_secs,
        }
    }
}

/// `$HOME/.siteflow/session.json`, or a file in the working directory when
/// `HOME` is unset (containers, CI).
fn default_session_file() -> PathBuf {
    match std::env::var("HOME") {
        Ok(home) => PathBuf::from(home).join(".siteflow").join("session.json"),
        Err(_) => PathBuf::from("session.json"),
    }
}

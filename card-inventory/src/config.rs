use std::path::PathBuf;

use card_client::ClientConfig;

/// Inventory CLI configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | CARD_API_URL | http://localhost:8000/api/ | API base URL |
/// | CARD_REQUEST_TIMEOUT_SECS | 30 | Request timeout (seconds) |
/// | CARD_SESSION_FILE | .card-session.json | Where the login token is kept |
/// | LOG_LEVEL | info | Log filter when `RUST_LOG` is unset |
/// | LOG_JSON | false | JSON log lines |
/// | LOG_DIR | (unset) | Daily rolling log files instead of stderr |
///
/// # Example
///
/// ```ignore
/// CARD_API_URL=https://cards.example.com/api/ card-inventory list
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct InventoryConfig {
    pub api_url: String,
    pub request_timeout_secs: u64,
    pub session_file: PathBuf,
    pub log_level: String,
    pub log_json: bool,
    pub log_dir: Option<String>,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8000/api/".into(),
            request_timeout_secs: 30,
            session_file: PathBuf::from(".card-session.json"),
            log_level: "info".into(),
            log_json: false,
            log_dir: None,
        }
    }
}

impl InventoryConfig {
    /// Load from environment variables, defaults for anything unset
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            api_url: var("CARD_API_URL").unwrap_or(defaults.api_url),
            request_timeout_secs: var("CARD_REQUEST_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.request_timeout_secs),
            session_file: var("CARD_SESSION_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.session_file),
            log_level: var("LOG_LEVEL").unwrap_or(defaults.log_level),
            log_json: var("LOG_JSON")
                .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(defaults.log_json),
            log_dir: var("LOG_DIR").filter(|v| !v.is_empty()),
        }
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    pub fn with_session_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.session_file = path.into();
        self
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Transport settings
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(self.api_url.clone()).with_timeout(self.request_timeout_secs)
    }
}

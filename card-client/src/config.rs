//! Client configuration

use std::sync::Arc;

use crate::{ClientResult, HttpTransport, SessionProvider};

/// Client configuration for connecting to the card API
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL (e.g., "http://localhost:8000/api/")
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout: u64,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: 30,
        }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Create an HTTP transport from this configuration
    pub fn build_transport(&self, session: Arc<dyn SessionProvider>) -> ClientResult<HttpTransport> {
        HttpTransport::new(self, session)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:8000/api/")
    }
}

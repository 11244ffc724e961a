//! Client configuration

/// Configuration for connecting to the POS backend
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL (e.g., "http://localhost:8080/api")
    pub base_url: String,

    /// Bearer token supplied by the auth collaborator
    pub token: Option<String>,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Store freshness window in milliseconds. A refresh request inside this
    /// window of the store watermark is served from the current snapshot
    /// without a network call, unless forced.
    pub freshness_window_ms: i64,
}

impl ClientConfig {
    /// Create a new client configuration with defaults
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            token: None,
            timeout: 30,
            freshness_window_ms: 30_000,
        }
    }

    /// Set the bearer token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the request timeout in seconds
    pub fn with_timeout(mut self, timeout: u64) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the store freshness window
    pub fn with_freshness_window_ms(mut self, window: i64) -> Self {
        self.freshness_window_ms = window;
        self
    }
}

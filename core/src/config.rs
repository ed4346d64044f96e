//! Client configuration.

use serde::Deserialize;

/// Environment variable naming the checkout backend host.
pub const BASE_URL_ENV: &str = "CHECKOUT_BASE_URL";

const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Static settings fixed at client construction.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    /// Scheme and host placed in front of every route path.
    pub base_url: String,
    /// Default headers sent with every request, beneath the composed ones.
    #[serde(default)]
    pub headers: Vec<(String, String)>,
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            headers: Vec::new(),
        }
    }

    /// Read the base URL from `CHECKOUT_BASE_URL`, falling back to
    /// `http://localhost:3000`.
    pub fn from_env() -> Self {
        let base_url = std::env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(&base_url)
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.trim_end_matches('/'))
    }
}

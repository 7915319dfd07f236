//! Werstreamt.es HTTP client.
//!
//! Blocking reqwest client (no Tokio runtime required). Every request has
//! a bounded timeout so a hung connection can't stall a verification batch.

use std::time::Duration;

use streamgap_recon::config::{VerifyConfig, DEFAULT_BASE_URL, DEFAULT_QUERY_PARAM, DEFAULT_TIMEOUT_SECS};
use streamgap_recon::verify::SearchProbe;
use streamgap_recon::ReconError;

const USER_AGENT: &str = concat!("streamgap/", env!("CARGO_PKG_VERSION"));

/// Error type for search requests.
#[derive(Debug)]
pub enum ClientError {
    /// HTTP client could not be constructed
    Build(String),
    /// Request did not complete within the timeout
    Timeout(String),
    /// Connection / transport error
    Network(String),
    /// Non-success status code
    Http(u16),
    /// Body could not be read as text
    Body(String),
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::Build(msg) => write!(f, "Cannot build HTTP client: {}", msg),
            ClientError::Timeout(msg) => write!(f, "Timeout: {}", msg),
            ClientError::Network(msg) => write!(f, "Network error: {}", msg),
            ClientError::Http(code) => write!(f, "HTTP {}", code),
            ClientError::Body(msg) => write!(f, "Cannot read response body: {}", msg),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ClientError::Timeout(e.to_string())
        } else {
            ClientError::Network(e.to_string())
        }
    }
}

/// Search client for `https://www.werstreamt.es/filme-serien/?q=<id>`.
#[derive(Clone)]
pub struct WerstreamtClient {
    http: reqwest::blocking::Client,
    base_url: String,
    query_param: String,
}

impl WerstreamtClient {
    /// Client for the public site with the default timeout.
    pub fn new() -> Result<Self, ClientError> {
        Self::with_base_url(
            DEFAULT_BASE_URL,
            DEFAULT_QUERY_PARAM,
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        )
    }

    /// Client for any endpoint with the same query contract.
    pub fn with_base_url(
        base_url: &str,
        query_param: &str,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Build(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.to_string(),
            query_param: query_param.to_string(),
        })
    }

    pub fn from_config(config: &VerifyConfig) -> Result<Self, ClientError> {
        Self::with_base_url(&config.base_url, &config.query_param, config.timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the search page for `imdb_id` and return its body.
    pub fn search_page(&self, imdb_id: &str) -> Result<String, ClientError> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&[(self.query_param.as_str(), imdb_id)])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Http(status.as_u16()));
        }

        response.text().map_err(|e| {
            if e.is_timeout() {
                ClientError::Timeout(e.to_string())
            } else {
                ClientError::Body(e.to_string())
            }
        })
    }
}

impl SearchProbe for WerstreamtClient {
    fn search(&self, imdb_id: &str) -> Result<String, ReconError> {
        self.search_page(imdb_id).map_err(|e| ReconError::Network {
            imdb_id: imdb_id.to_string(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_public_site() {
        let client = WerstreamtClient::new().unwrap();
        assert_eq!(client.base_url(), "https://www.werstreamt.es/filme-serien/");
    }

    #[test]
    fn network_error_maps_to_recon_error() {
        // Port 9 (discard) on localhost: nothing listens there in CI.
        let client =
            WerstreamtClient::with_base_url("http://127.0.0.1:9/", "q", Duration::from_secs(2))
                .unwrap();
        let err = client.search("tt0001").unwrap_err();
        match err {
            ReconError::Network { imdb_id, .. } => assert_eq!(imdb_id, "tt0001"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn error_display() {
        assert_eq!(ClientError::Http(503).to_string(), "HTTP 503");
        assert_eq!(ClientError::Timeout("slow".into()).to_string(), "Timeout: slow");
    }
}

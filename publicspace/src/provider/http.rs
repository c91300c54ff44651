//! HTTP client abstraction for testability

use std::time::Duration;

use tracing::{debug, warn};

use super::types::ProviderError;

/// Trait for synchronous HTTP client operations.
///
/// This abstraction allows for dependency injection and easier testing
/// by enabling mock HTTP clients in tests.
pub trait HttpClient: Send + Sync {
    /// Performs an HTTP GET request.
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to request, including any query string
    ///
    /// # Returns
    ///
    /// The response body as bytes or an error.
    fn get(&self, url: &str) -> Result<Vec<u8>, ProviderError>;
}

/// Real HTTP client implementation using reqwest.
#[derive(Clone)]
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

/// User-Agent sent with every request.
const DEFAULT_USER_AGENT: &str = concat!("publicspace/", env!("CARGO_PKG_VERSION"));

/// Request timeout used by [`ReqwestClient::new`].
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

impl ReqwestClient {
    /// Creates a new ReqwestClient with default configuration.
    pub fn new() -> Result<Self, ProviderError> {
        Self::with_timeout(DEFAULT_TIMEOUT_SECS)
    }

    /// Creates a new ReqwestClient with custom timeout.
    pub fn with_timeout(timeout_secs: u64) -> Result<Self, ProviderError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(DEFAULT_USER_AGENT)
            .build()
            .map_err(|e| {
                ProviderError::HttpError(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { client })
    }
}

impl HttpClient for ReqwestClient {
    fn get(&self, url: &str) -> Result<Vec<u8>, ProviderError> {
        let response = match self.client.get(url).send() {
            Ok(resp) => {
                debug!(url = url, status = resp.status().as_u16(), "HTTP response received");
                resp
            }
            Err(e) => {
                warn!(
                    url = url,
                    error = %e,
                    is_connect = e.is_connect(),
                    is_timeout = e.is_timeout(),
                    "HTTP request failed"
                );
                return Err(ProviderError::HttpError(format!("Request failed: {}", e)));
            }
        };

        // Check HTTP status
        if !response.status().is_success() {
            return Err(ProviderError::HttpError(format!(
                "HTTP {} from {}",
                response.status(),
                url
            )));
        }

        response
            .bytes()
            .map(|b| b.to_vec())
            .map_err(|e| ProviderError::HttpError(format!("Failed to read response: {}", e)))
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Scripted HTTP client for testing.
    ///
    /// Each route is a URL substring with a queue of responses. The first
    /// route whose pattern occurs in the URL answers; its last response is
    /// repeated once the queue is down to one entry.
    #[derive(Default)]
    pub struct MockHttpClient {
        routes: Mutex<Vec<(String, VecDeque<Result<Vec<u8>, ProviderError>>)>>,
        requests: Mutex<Vec<String>>,
    }

    impl MockHttpClient {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn route(self, pattern: &str, responses: Vec<Result<Vec<u8>, ProviderError>>) -> Self {
            self.routes
                .lock()
                .unwrap()
                .push((pattern.to_string(), responses.into()));
            self
        }

        pub fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl HttpClient for MockHttpClient {
        fn get(&self, url: &str) -> Result<Vec<u8>, ProviderError> {
            self.requests.lock().unwrap().push(url.to_string());
            let mut routes = self.routes.lock().unwrap();
            for (pattern, responses) in routes.iter_mut() {
                if url.contains(pattern.as_str()) {
                    return if responses.len() > 1 {
                        responses.pop_front().unwrap()
                    } else {
                        responses
                            .front()
                            .cloned()
                            .unwrap_or_else(|| Err(ProviderError::HttpError("no response".into())))
                    };
                }
            }
            Err(ProviderError::HttpError(format!("HTTP 404 Not Found from {}", url)))
        }
    }

    #[test]
    fn test_mock_client_routes_by_substring() {
        let mock = MockHttpClient::new()
            .route("/collections?", vec![Ok(b"one".to_vec())])
            .route("/items", vec![Err(ProviderError::HttpError("down".into())), Ok(b"two".to_vec())]);

        assert_eq!(mock.get("http://x/collections?f=json").unwrap(), b"one".to_vec());
        assert!(mock.get("http://x/collections/a/items").is_err());
        assert_eq!(mock.get("http://x/collections/a/items").unwrap(), b"two".to_vec());
        assert_eq!(mock.get("http://x/collections/a/items").unwrap(), b"two".to_vec());
        assert!(mock.get("http://x/other").is_err());
        assert_eq!(mock.requests().len(), 5);
    }

    #[test]
    fn test_reqwest_client_builds() {
        assert!(ReqwestClient::with_timeout(5).is_ok());
    }
}

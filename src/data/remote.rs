//! HTTP access to the static dataset host.

use reqwest::blocking::Client;

use crate::error::FetchError;

/// Folder holding the per-country `suite-of-food-security-indicators_*.csv` files.
pub const DEFAULT_BASE_URL: &str =
    "https://raw.githubusercontent.com/Manny735/Project-1/refs/heads/main/path-to-datasets";

/// Flag images, addressed as `{base}/{iso2}.svg`.
pub const DEFAULT_FLAG_BASE_URL: &str = "https://flagcdn.com";

/// Something that can GET a URL and hand back the body as text.
///
/// The seam exists so the fetch cache can be exercised without a network.
pub trait Transport: Send + Sync {
    /// `resource` is only used to label errors.
    fn get_text(&self, url: &str, resource: &str) -> Result<String, FetchError>;
}

/// Blocking `reqwest` transport. No retries, default client timeouts.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self { client: Client::new() }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for HttpTransport {
    fn get_text(&self, url: &str, resource: &str) -> Result<String, FetchError> {
        let network = |message: String| FetchError::Network {
            resource: resource.to_string(),
            message,
        };

        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| network(format!("request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(network(format!("request failed with status {}", resp.status())));
        }

        resp.text()
            .map_err(|e| network(format!("failed to read response body: {e}")))
    }
}

/// `{base_url}/{resource}` with exactly one slash between the two.
pub fn resource_url(base_url: &str, resource: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        resource.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_url_joins_with_single_slash() {
        assert_eq!(resource_url("https://h/x/", "a.csv"), "https://h/x/a.csv");
        assert_eq!(resource_url("https://h/x", "/a.csv"), "https://h/x/a.csv");
        assert_eq!(
            resource_url(DEFAULT_BASE_URL, "suite-of-food-security-indicators_afg.csv"),
            "https://raw.githubusercontent.com/Manny735/Project-1/refs/heads/main/path-to-datasets/suite-of-food-security-indicators_afg.csv"
        );
    }
}

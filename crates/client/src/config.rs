//! Client configuration.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use url::Url;

use crate::credentials::{CredentialProvider, StaticToken};
use crate::error::{ClientError, Result};

/// Default per-call timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default server location.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000/api";

/// Where the client sends calls, how long it waits, and which credentials
/// it attaches.
///
/// Reads from environment variables in [`ClientConfig::from_env`]:
/// - `API_BASE_URL` — server base URL (default: `"http://localhost:3000/api"`)
/// - `API_TIMEOUT_MS` — per-call timeout in milliseconds (default: `10000`)
/// - `API_TOKEN` — static bearer token (default: none)
#[derive(Clone)]
pub struct ClientConfig {
    base_url: Url,
    timeout: Duration,
    credentials: Option<Arc<dyn CredentialProvider>>,
}

impl ClientConfig {
    /// Configuration for `base_url` with the default timeout and no
    /// credentials.
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            timeout: DEFAULT_TIMEOUT,
            credentials: None,
        })
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let base_url = lookup("API_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let mut config = Self::new(&base_url)?;

        if let Some(raw) = lookup("API_TIMEOUT_MS") {
            let millis = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|ms| *ms > 0)
                .ok_or_else(|| ClientError::InvalidTimeout(raw.clone()))?;
            config.timeout = Duration::from_millis(millis);
        }
        if let Some(token) = lookup("API_TOKEN").filter(|t| !t.trim().is_empty()) {
            config = config.with_credentials(StaticToken::new(token));
        }
        Ok(config)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_credentials(mut self, provider: impl CredentialProvider + 'static) -> Self {
        self.credentials = Some(Arc::new(provider));
        self
    }

    /// Base URL, always ending in `/`.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// File uploads wait twice as long as other calls, capped at
    /// [`Duration::MAX`].
    pub fn upload_timeout(&self) -> Duration {
        self.timeout.saturating_mul(2)
    }

    pub fn credentials(&self) -> Option<&dyn CredentialProvider> {
        self.credentials.as_deref()
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.timeout)
            .field("credentials", &self.credentials.is_some())
            .finish()
    }
}

/// Relative paths join under the base only when it ends in a slash.
fn parse_base_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw.trim()).map_err(|source| ClientError::InvalidBaseUrl {
        url: raw.to_string(),
        source,
    })?;
    if url.cannot_be_a_base() {
        return Err(ClientError::OpaqueBaseUrl(raw.to_string()));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_default_values() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.base_url().as_str(), "http://localhost:3000/api/");
        assert_eq!(config.timeout(), DEFAULT_TIMEOUT);
        assert!(config.credentials().is_none());
    }

    #[test]
    fn test_reads_overrides() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("API_BASE_URL", "https://shop.example.com/v1/api/"),
            ("API_TIMEOUT_MS", "2500"),
            ("API_TOKEN", "s3cret"),
        ]))
        .unwrap();
        assert_eq!(config.base_url().as_str(), "https://shop.example.com/v1/api/");
        assert_eq!(config.timeout(), Duration::from_millis(2500));
        assert_eq!(config.upload_timeout(), Duration::from_millis(5000));
        assert_eq!(
            config.credentials().and_then(|c| c.bearer_token()).as_deref(),
            Some("s3cret")
        );
    }

    #[test]
    fn test_upload_timeout_saturates() {
        let config = ClientConfig::new(DEFAULT_BASE_URL)
            .unwrap()
            .with_timeout(Duration::MAX);
        assert_eq!(config.upload_timeout(), Duration::MAX);

        let config = ClientConfig::from_lookup(lookup(&[(
            "API_TIMEOUT_MS",
            &u64::MAX.to_string(),
        )]))
        .unwrap();
        assert_eq!(config.upload_timeout(), Duration::MAX);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(matches!(
            ClientConfig::from_lookup(lookup(&[("API_BASE_URL", "not a url")])),
            Err(ClientError::InvalidBaseUrl { .. })
        ));
        assert!(matches!(
            ClientConfig::new("mailto:shop@example.com"),
            Err(ClientError::OpaqueBaseUrl(_))
        ));
        for timeout in ["0", "soon"] {
            assert!(matches!(
                ClientConfig::from_lookup(lookup(&[("API_TIMEOUT_MS", timeout)])),
                Err(ClientError::InvalidTimeout(_))
            ));
        }
    }

    #[test]
    fn test_base_url_query_and_fragment_are_dropped() {
        let config = ClientConfig::new("http://localhost:8080/api?debug=1#top").unwrap();
        assert_eq!(config.base_url().as_str(), "http://localhost:8080/api/");
    }

    #[test]
    fn test_debug_hides_credentials() {
        let config = ClientConfig::new(DEFAULT_BASE_URL)
            .unwrap()
            .with_credentials(StaticToken::new("s3cret"));
        assert!(!format!("{config:?}").contains("s3cret"));
    }
}

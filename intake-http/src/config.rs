use std::time::Duration;

use intake::SUBMIT_PATH;
use reqwest::Url;

/// Environment variable holding the backend base URL.
pub const API_URL_ENV: &str = "INTAKE_API_URL";

/// Environment variable holding the API documentation URL.
pub const DOCS_URL_ENV: &str = "INTAKE_API_DOCS_URL";

/// Request timeout unless configured otherwise.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors in the API configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing INTAKE_API_URL. Set it to the base URL of the questionnaire API.")]
    MissingBaseUrl,

    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Could not build HTTP client: {0}")]
    Client(String),
}

/// Where the backend lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL without trailing slashes.
    pub base_url: String,

    /// Documentation URL named in fallback error messages.
    pub docs_url: String,

    pub timeout: Duration,
}

impl ApiConfig {
    /// Build the configuration from raw values.
    ///
    /// The base URL is required; the docs URL defaults to `<base>/docs`.
    /// Blank values count as missing.
    pub fn new(base_url: Option<&str>, docs_url: Option<&str>) -> Result<Self, ConfigError> {
        let base_url = base_url
            .map(sanitize_url)
            .filter(|url| !url.is_empty())
            .ok_or(ConfigError::MissingBaseUrl)?;
        check_url(&base_url)?;

        let docs_url = match docs_url.map(sanitize_url).filter(|url| !url.is_empty()) {
            Some(url) => {
                check_url(&url)?;
                url
            }
            None => format!("{base_url}/docs"),
        };

        Ok(Self {
            base_url,
            docs_url,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Full URL of the submission endpoint.
    pub fn submit_url(&self) -> String {
        format!("{}{SUBMIT_PATH}", self.base_url)
    }
}

/// Trim whitespace and trailing slashes.
pub fn sanitize_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn check_url(url: &str) -> Result<(), ConfigError> {
    let parsed = Url::parse(url).map_err(|err| ConfigError::InvalidUrl {
        url: url.to_string(),
        reason: err.to_string(),
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::InvalidUrl {
            url: url.to_string(),
            reason: format!("unsupported scheme '{other}'"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_trailing_slashes() {
        let config = ApiConfig::new(Some(" https://api.example.com/// "), None).unwrap();
        assert_eq!(config.base_url, "https://api.example.com");
        assert_eq!(config.docs_url, "https://api.example.com/docs");
        assert_eq!(
            config.submit_url(),
            "https://api.example.com/api/questionnaire/submit"
        );
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn explicit_docs_url() {
        let config = ApiConfig::new(
            Some("https://api.example.com"),
            Some("https://docs.example.com/swagger/"),
        )
        .unwrap();
        assert_eq!(config.docs_url, "https://docs.example.com/swagger");

        let blank = ApiConfig::new(Some("https://api.example.com"), Some("  ")).unwrap();
        assert_eq!(blank.docs_url, "https://api.example.com/docs");
    }

    #[test]
    fn base_url_required() {
        assert_eq!(ApiConfig::new(None, None), Err(ConfigError::MissingBaseUrl));
        assert_eq!(
            ApiConfig::new(Some(" / "), None),
            Err(ConfigError::MissingBaseUrl)
        );
    }

    #[test]
    fn rejects_bad_urls() {
        assert!(matches!(
            ApiConfig::new(Some("not a url"), None),
            Err(ConfigError::InvalidUrl { .. })
        ));
        assert!(matches!(
            ApiConfig::new(Some("ftp://files.example.com"), None),
            Err(ConfigError::InvalidUrl { .. })
        ));
    }
}

use std::time::Duration;

use intake::{SubmitRequest, Transport, TransportError, TransportResponse};
use reqwest::header::ACCEPT;
use tracing::debug;

use crate::config::{ApiConfig, ConfigError};

const USER_AGENT: &str = concat!("intake/", env!("CARGO_PKG_VERSION"));

/// Sends submissions to the questionnaire API over HTTP.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http_client: reqwest::Client,
    submit_url: String,
    timeout: Duration,
}

impl HttpTransport {
    /// Create a transport for the configured backend.
    pub fn new(config: &ApiConfig) -> Result<Self, ConfigError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .build()
            .map_err(|e| ConfigError::Client(e.to_string()))?;

        Ok(Self {
            http_client,
            submit_url: config.submit_url(),
            timeout: config.timeout,
        })
    }

    /// The endpoint submissions are posted to.
    pub fn submit_url(&self) -> &str {
        &self.submit_url
    }

    fn transport_error(&self, err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout(self.timeout)
        } else if err.is_builder() {
            TransportError::Encode(err.to_string())
        } else {
            TransportError::Network(err.to_string())
        }
    }
}

impl Transport for HttpTransport {
    async fn post_submission(
        &self,
        request: &SubmitRequest,
    ) -> Result<TransportResponse, TransportError> {
        debug!(url = %self.submit_url, "Posting questionnaire submission");

        let response = self
            .http_client
            .post(&self.submit_url)
            .header(ACCEPT, "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(e))?;

        debug!(status = status.as_u16(), bytes = body.len(), "Questionnaire API responded");
        let response = TransportResponse::new(status.as_u16(), body);
        Ok(match status.canonical_reason() {
            Some(reason) => response.with_reason(reason),
            None => response,
        })
    }
}

//! HTTP transport for intake submissions.
//!
//! This crate provides:
//! - `ApiConfig` - Backend base URL, documentation URL and request timeout
//! - `HttpTransport` - A [`intake::Transport`] backed by `reqwest`

mod config;
pub use config::{API_URL_ENV, ApiConfig, ConfigError, DEFAULT_TIMEOUT, DOCS_URL_ENV, sanitize_url};

mod transport;
pub use transport::HttpTransport;

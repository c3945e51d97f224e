//! Configuration options for the folio admin client

use std::time::Duration;
use url::Url;

use crate::error::Error;

/// Base URL used when nothing else is configured
pub const DEFAULT_API_URL: &str = "http://localhost:3000";

/// Environment variable holding the API base URL
pub const API_URL_ENV: &str = "FOLIO_API_URL";

/// Connection settings for the portfolio API
#[derive(Debug, Clone)]
pub struct FolioConfig {
    /// Base URL of the REST API
    pub url: Url,
}

impl FolioConfig {
    /// Creates a new configuration, validating the URL.
    pub fn new(url_str: &str) -> Result<Self, Error> {
        let url = Url::parse(url_str)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::config(format!(
                "unsupported scheme '{}' in API url",
                url.scheme()
            )));
        }
        Ok(Self { url })
    }

    /// Reads the API URL from `FOLIO_API_URL`, falling back to the local default.
    pub fn from_env() -> Result<Self, Error> {
        let url_str = std::env::var(API_URL_ENV).unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        Self::new(&url_str)
    }

    /// The base URL without a trailing slash
    pub fn base_url(&self) -> String {
        self.url.as_str().trim_end_matches('/').to_string()
    }
}

/// Configuration options for the client
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// The request timeout
    pub request_timeout: Option<Duration>,

    /// Page requested when an editor mounts
    pub default_page: u32,

    /// Page size requested when an editor mounts
    pub default_page_size: u32,

    /// Lifetime of the auth cookie mirror
    pub cookie_max_age: Duration,

    /// Value of the `X-Client-Info` header
    pub client_info: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            request_timeout: Some(Duration::from_secs(30)),
            default_page: 1,
            default_page_size: 10,
            cookie_max_age: Duration::from_secs(24 * 60 * 60),
            client_info: format!("folio-admin/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientOptions {
    /// Set the request timeout
    pub fn with_request_timeout(mut self, value: Option<Duration>) -> Self {
        self.request_timeout = value;
        self
    }

    /// Set the page an editor starts on
    pub fn with_default_page(mut self, value: u32) -> Self {
        self.default_page = value;
        self
    }

    /// Set the page size an editor starts with
    pub fn with_default_page_size(mut self, value: u32) -> Self {
        self.default_page_size = value;
        self
    }

    /// Set the auth cookie lifetime
    pub fn with_cookie_max_age(mut self, value: Duration) -> Self {
        self.cookie_max_age = value;
        self
    }

    /// Set the client info header value
    pub fn with_client_info(mut self, value: &str) -> Self {
        self.client_info = value.to_string();
        self
    }
}

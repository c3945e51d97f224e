//! HTTP client abstraction for making requests to the portfolio API

use log::{debug, warn};
use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue},
    Client, Method, RequestBuilder, Response, StatusCode,
};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::auth::SharedSessionStore;
use crate::error::{Error, GENERIC_FAILURE_MESSAGE};

/// Message carried by the error raised when a mutating call has no token
pub const NO_TOKEN_MESSAGE: &str = "No token provided";

/// Helper for building and executing HTTP requests
pub struct FetchBuilder<'a> {
    client: &'a Client,
    url: String,
    method: Method,
    headers: HeaderMap,
    query_params: Vec<(String, String)>,
    body: Option<Vec<u8>>,
    timeout: Option<Duration>,
    cancel: Option<CancellationToken>,
    session: Option<SharedSessionStore>,
}

impl<'a> FetchBuilder<'a> {
    /// Create a new FetchBuilder
    pub fn new(client: &'a Client, url: &str, method: Method) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));

        Self {
            client,
            url: url.to_string(),
            method,
            headers,
            query_params: Vec::new(),
            body: None,
            timeout: None,
            cancel: None,
            session: None,
        }
    }

    /// Add a header to the request
    pub fn header(mut self, name: &str, value: &str) -> Self {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                self.headers.insert(name, value);
            }
            _ => warn!("Dropping invalid header {}", name),
        }
        self
    }

    /// Add bearer token authentication to the request
    pub fn bearer_auth(self, token: &str) -> Self {
        self.header("Authorization", &format!("Bearer {}", token))
    }

    /// Attach the session token, failing closed when there is none.
    ///
    /// The check happens before anything is sent, so a missing token never
    /// costs a round trip. The store is also watched for 401 responses.
    pub fn authorize(self, store: &SharedSessionStore) -> Result<Self, Error> {
        let token = store.token().ok_or_else(|| Error::auth(NO_TOKEN_MESSAGE))?;
        Ok(self.bearer_auth(&token).with_session(store))
    }

    /// Clear `store` if the server answers 401
    pub fn with_session(mut self, store: &SharedSessionStore) -> Self {
        self.session = Some(store.clone());
        self
    }

    /// Add a single query parameter
    pub fn query_pair(mut self, key: &str, value: &str) -> Self {
        self.query_params.push((key.to_string(), value.to_string()));
        self
    }

    /// Add query parameters to the request
    pub fn query<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.query_params
            .extend(params.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Add a JSON body to the request
    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self, Error> {
        let json = serde_json::to_vec(body)?;
        self.body = Some(json);
        Ok(self)
    }

    /// Bound the request duration
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Abort the request when `token` is cancelled
    pub fn cancel_on(mut self, token: Option<CancellationToken>) -> Self {
        self.cancel = token;
        self
    }

    /// Build the request
    fn build(&self) -> Result<RequestBuilder, Error> {
        let mut url = Url::parse(&self.url)?;

        if !self.query_params.is_empty() {
            let mut query_pairs = url.query_pairs_mut();
            for (key, value) in &self.query_params {
                query_pairs.append_pair(key, value);
            }
        }

        let mut req = self.client.request(self.method.clone(), url.as_str());
        req = req.headers(self.headers.clone());

        if let Some(timeout) = self.timeout {
            req = req.timeout(timeout);
        }

        if let Some(body) = &self.body {
            req = req.body(body.clone());
        }

        Ok(req)
    }

    /// Send the request and return the successful response.
    ///
    /// Non-2xx answers become [`Error::Server`]; a 401 additionally clears the
    /// watched session store.
    pub async fn send(&self) -> Result<Response, Error> {
        let req = self.build()?;
        debug!("{} {}", self.method, self.url);

        let response = match &self.cancel {
            Some(token) => tokio::select! {
                _ = token.cancelled() => {
                    return Err(Error::transport("request cancelled"));
                }
                result = req.send() => result?,
            },
            None => req.send().await?,
        };

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::UNAUTHORIZED {
            if let Some(store) = &self.session {
                warn!("{} {} rejected with 401, clearing session", self.method, self.url);
                store.clear()?;
            }
        }

        let text = response.text().await.unwrap_or_default();
        Err(Error::server(status.as_u16(), error_message(&text)))
    }

    /// Execute the request and parse the response as JSON
    pub async fn execute<T: DeserializeOwned>(&self) -> Result<T, Error> {
        let response = self.send().await?;
        let bytes = response.bytes().await?;
        let result = serde_json::from_slice::<T>(&bytes)?;
        Ok(result)
    }

    /// Execute the request, discarding any response body
    pub async fn execute_empty(&self) -> Result<(), Error> {
        self.send().await?;
        Ok(())
    }
}

/// Pull a human readable message out of an error body.
///
/// JSON bodies contribute their `message` or `error` field; anything else is
/// used as-is. Empty bodies map to the generic fallback.
pub(crate) fn error_message(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return GENERIC_FAILURE_MESSAGE.to_string();
    }

    match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(value) => ["message", "error"]
            .iter()
            .find_map(|key| value.get(key).and_then(|v| v.as_str()))
            .map(str::to_string)
            .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string()),
        Err(_) => trimmed.to_string(),
    }
}

/// Helper for creating HTTP requests
pub struct Fetch;

impl Fetch {
    /// Create a GET request
    pub fn get<'a>(client: &'a Client, url: &str) -> FetchBuilder<'a> {
        FetchBuilder::new(client, url, Method::GET)
    }

    /// Create a POST request
    pub fn post<'a>(client: &'a Client, url: &str) -> FetchBuilder<'a> {
        FetchBuilder::new(client, url, Method::POST)
    }

    /// Create a PUT request
    pub fn put<'a>(client: &'a Client, url: &str) -> FetchBuilder<'a> {
        FetchBuilder::new(client, url, Method::PUT)
    }

    /// Create a DELETE request
    pub fn delete<'a>(client: &'a Client, url: &str) -> FetchBuilder<'a> {
        FetchBuilder::new(client, url, Method::DELETE)
    }
}

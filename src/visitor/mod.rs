//! Visit tracking for the public site and visit statistics for the dashboard

use log::{debug, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::auth::SharedSessionStore;
use crate::config::ClientOptions;
use crate::error::Error;
use crate::fetch::{Fetch, FetchBuilder};

/// Response of `POST /visitor/track`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub is_new_visit: bool,
}

/// Response of `GET /visitor/stats`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitStats {
    #[serde(default)]
    pub total_visits: u64,
    #[serde(default)]
    pub unique_visitors: u64,
    #[serde(default)]
    pub last_updated: String,
}

#[derive(Serialize)]
struct TrackVisit<'a> {
    fingerprint: &'a str,
}

/// Client for the visitor endpoints
pub struct VisitorClient {
    url: String,
    client: Client,
    store: SharedSessionStore,
    options: ClientOptions,
    fingerprint: OnceLock<String>,
    cancel: Option<CancellationToken>,
}

impl VisitorClient {
    /// Create a new VisitorClient
    pub fn new(url: &str, client: Client, store: SharedSessionStore, options: ClientOptions) -> Self {
        Self {
            url: url.trim_end_matches('/').to_string(),
            client,
            store,
            options,
            fingerprint: OnceLock::new(),
            cancel: None,
        }
    }

    /// Abort calls of this client when `token` is cancelled
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    fn prepare<'a>(&self, fetch: FetchBuilder<'a>) -> FetchBuilder<'a> {
        fetch
            .header("X-Client-Info", &self.options.client_info)
            .timeout(self.options.request_timeout)
            .cancel_on(self.cancel.clone())
            .with_session(&self.store)
    }

    /// Use a fingerprint computed elsewhere instead of a generated one.
    ///
    /// Only the first fingerprint sticks; later calls are ignored.
    pub fn with_fingerprint(self, fingerprint: &str) -> Self {
        if self.fingerprint.set(fingerprint.to_string()).is_err() {
            warn!("Visitor fingerprint already set, keeping the first one");
        }
        self
    }

    /// The visitor fingerprint, generated once per client
    pub fn fingerprint(&self) -> &str {
        self.fingerprint
            .get_or_init(|| Uuid::new_v4().simple().to_string())
    }

    /// Record a visit for `fingerprint`. Tracking is public.
    pub async fn track(&self, fingerprint: &str) -> Result<VisitResponse, Error> {
        if fingerprint.trim().is_empty() {
            return Err(Error::invalid_input("fingerprint must not be empty"));
        }

        let url = format!("{}/visitor/track", self.url);
        let response = self
            .prepare(Fetch::post(&self.client, &url))
            .json(&TrackVisit { fingerprint })?
            .execute::<VisitResponse>()
            .await?;

        debug!("Tracked visit (new: {})", response.is_new_visit);
        Ok(response)
    }

    /// Record a visit for this client's own fingerprint
    pub async fn track_current(&self) -> Result<VisitResponse, Error> {
        let fingerprint = self.fingerprint().to_string();
        self.track(&fingerprint).await
    }

    /// Aggregate visit numbers
    pub async fn stats(&self) -> Result<VisitStats, Error> {
        let url = format!("{}/visitor/stats", self.url);
        self.prepare(Fetch::get(&self.client, &url))
            .execute::<VisitStats>()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AdminUser, MemorySessionStore, Session, SessionStore};
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> VisitorClient {
        VisitorClient::new(
            &server.uri(),
            Client::new(),
            Arc::new(MemorySessionStore::new()),
            ClientOptions::default(),
        )
    }

    #[test]
    fn fingerprint_is_stable() {
        let client = VisitorClient::new(
            "http://localhost:3000",
            Client::new(),
            Arc::new(MemorySessionStore::new()),
            ClientOptions::default(),
        );
        let first = client.fingerprint().to_string();
        assert_eq!(first.len(), 32);
        assert_eq!(client.fingerprint(), first);

        let fixed = VisitorClient::new(
            "http://localhost:3000",
            Client::new(),
            Arc::new(MemorySessionStore::new()),
            ClientOptions::default(),
        )
        .with_fingerprint("abc")
        .with_fingerprint("def");
        assert_eq!(fixed.fingerprint(), "abc");
    }

    #[tokio::test]
    async fn tracking_needs_no_session() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/visitor/track"))
            .and(body_json(json!({"fingerprint": "fp-1"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": "Visit tracked",
                "isNewVisit": true
            })))
            .expect(1)
            .mount(&server)
            .await;

        let response = client_for(&server).track("fp-1").await.unwrap();
        assert!(response.is_new_visit);
    }

    #[tokio::test]
    async fn reads_stats() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/visitor/stats"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "totalVisits": 157,
                "uniqueVisitors": 42,
                "lastUpdated": "2025-05-01T10:00:00.000Z"
            })))
            .mount(&server)
            .await;

        let stats = client_for(&server).stats().await.unwrap();
        assert_eq!(stats.total_visits, 157);
        assert_eq!(stats.unique_visitors, 42);
    }

    #[tokio::test]
    async fn tracks_own_fingerprint() {
        let server = MockServer::start().await;
        let client = client_for(&server).with_fingerprint("fp-own");
        Mock::given(method("POST"))
            .and(path("/visitor/track"))
            .and(body_json(json!({"fingerprint": "fp-own"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": "Visit already tracked",
                "isNewVisit": false
            })))
            .expect(1)
            .mount(&server)
            .await;

        let response = client.track_current().await.unwrap();
        assert!(!response.is_new_visit);
        assert_eq!(response.message, "Visit already tracked");
    }

    #[tokio::test]
    async fn rejected_tracking_clears_session() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/visitor/track"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "Invalid token"})))
            .mount(&server)
            .await;

        let store: SharedSessionStore = Arc::new(MemorySessionStore::with_session(Session::new(
            "stale",
            AdminUser {
                id: "u1".to_string(),
                email: "admin@example.com".to_string(),
                name: None,
                role: None,
                username: None,
            },
        )));
        let client = VisitorClient::new(&server.uri(), Client::new(), store.clone(), ClientOptions::default());

        let err = client.track("fp-1").await.unwrap_err();
        assert!(matches!(err, Error::Server { status: 401, .. }));
        assert!(!store.is_authenticated());
    }

    #[tokio::test]
    async fn cancelled_stats_return_early() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/visitor/stats"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
            .mount(&server)
            .await;

        let token = CancellationToken::new();
        token.cancel();
        let result = client_for(&server).with_cancellation(token).stats().await;
        assert!(matches!(result, Err(Error::Transport(_))));
    }
}

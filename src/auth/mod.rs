//! Authentication and session management for the admin panel

mod session;
mod types;

use log::info;
use reqwest::Client;
use tokio_util::sync::CancellationToken;

use crate::config::ClientOptions;
use crate::error::Error;
use crate::fetch::Fetch;

pub use session::*;
pub use types::*;

/// Result of a successful login
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    /// The stored session
    pub session: Session,

    /// Cookies mirroring the session for route guards
    pub cookies: Vec<AuthCookie>,
}

/// Client for the login endpoint and the local session
pub struct Auth {
    /// The base URL of the API
    url: String,

    /// HTTP client used for requests
    client: Client,

    /// Where the current session lives
    store: SharedSessionStore,

    /// Client options
    options: ClientOptions,

    /// Aborts the login call when cancelled
    cancel: Option<CancellationToken>,
}

impl Auth {
    /// Create a new Auth client
    pub(crate) fn new(
        url: &str,
        client: Client,
        store: SharedSessionStore,
        options: ClientOptions,
    ) -> Self {
        Self {
            url: url.to_string(),
            client,
            store,
            options,
            cancel: None,
        }
    }

    pub(crate) fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Sign in with a username and password.
    ///
    /// The credentials are validated locally first; invalid input never
    /// reaches the network. Login is public and does not need a token.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<LoginOutcome, Error> {
        credentials.validate()?;

        let url = format!("{}/auth/login", self.url);
        let response = Fetch::post(&self.client, &url)
            .header("X-Client-Info", &self.options.client_info)
            .timeout(self.options.request_timeout)
            .cancel_on(self.cancel.clone())
            .with_session(&self.store)
            .json(credentials)?
            .execute::<LoginResponse>()
            .await?;

        let session = Session::new(response.token, response.user);
        self.store.save(&session)?;
        info!("Signed in as {}", session.display_name());

        let cookies = AuthCookie::for_session(&session, self.options.cookie_max_age)?;
        Ok(LoginOutcome { session, cookies })
    }

    /// Sign out, returning cookies that expire the auth mirror
    pub fn logout(&self) -> Result<Vec<AuthCookie>, Error> {
        if let Some(session) = self.store.load() {
            info!("Signing out {}", session.display_name());
        }
        self.store.clear()?;
        Ok(AuthCookie::cleared())
    }

    /// Get the current session
    pub fn session(&self) -> Option<Session> {
        self.store.load()
    }

    /// Set the session
    pub fn set_session(&self, session: Session) -> Result<(), Error> {
        self.store.save(&session)
    }

    /// Whether a session is present
    pub fn is_authenticated(&self) -> bool {
        self.store.is_authenticated()
    }

    /// The store backing this client
    pub fn store(&self) -> &SharedSessionStore {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn auth_for(server: &MockServer) -> Auth {
        Auth::new(
            &server.uri(),
            Client::new(),
            Arc::new(MemorySessionStore::new()),
            ClientOptions::default(),
        )
    }

    #[tokio::test]
    async fn login_stores_session() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .and(body_json(json!({"username": "admin", "password": "secret1"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "token": "test_token",
                "user": {"_id": "u1", "email": "admin@example.com", "name": "Admin", "role": "admin"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let auth = auth_for(&server);
        let outcome = auth
            .login(&LoginCredentials::new("admin", "secret1"))
            .await
            .unwrap();

        assert_eq!(outcome.session.token, "test_token");
        assert_eq!(outcome.cookies.len(), 2);
        assert_eq!(auth.session().map(|s| s.user.id), Some("u1".to_string()));
    }

    #[tokio::test]
    async fn login_failure_surfaces_server_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({"message": "Invalid credentials"})),
            )
            .mount(&server)
            .await;

        let auth = auth_for(&server);
        let err = auth
            .login(&LoginCredentials::new("admin", "wrong-password"))
            .await
            .unwrap_err();

        assert_eq!(err.user_message(), "Invalid credentials");
        assert!(!auth.is_authenticated());
    }

    #[tokio::test]
    async fn invalid_credentials_never_hit_network() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let auth = auth_for(&server);
        let err = auth.login(&LoginCredentials::new("a", "b")).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn logout_clears_session() {
        let server = MockServer::start().await;
        let auth = auth_for(&server);
        auth.set_session(Session::new(
            "tok",
            AdminUser {
                id: "u1".to_string(),
                email: "admin@example.com".to_string(),
                name: None,
                role: None,
                username: None,
            },
        ))
        .unwrap();

        let cookies = auth.logout().unwrap();
        assert!(!auth.is_authenticated());
        assert!(cookies.iter().all(|c| c.value.is_empty()));
    }

    #[tokio::test]
    async fn rejected_login_drops_previous_session() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({"message": "Invalid credentials"})),
            )
            .mount(&server)
            .await;

        let auth = auth_for(&server);
        auth.set_session(Session::new(
            "old",
            AdminUser {
                id: "u1".to_string(),
                email: "admin@example.com".to_string(),
                name: None,
                role: None,
                username: None,
            },
        ))
        .unwrap();

        let err = auth
            .login(&LoginCredentials::new("admin", "wrong-password"))
            .await
            .unwrap_err();
        assert_eq!(err.user_message(), "Invalid credentials");
        assert!(!auth.is_authenticated());
    }
}

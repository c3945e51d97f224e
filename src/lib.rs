//! Portfolio admin client library
//!
//! Typed access to a portfolio REST API (profile, education, experience,
//! skills, proficiency and projects) together with the controllers an admin
//! panel needs around it: list editors with validated dialog forms, a profile
//! editor, a session guard for admin routes, and the dashboard summary.

pub mod auth;
pub mod config;
pub mod contact;
pub mod dashboard;
pub mod editor;
pub mod error;
pub mod fetch;
pub mod guard;
pub mod models;
pub mod profile;
pub mod resource;
pub mod validation;
pub mod visitor;

use reqwest::Client;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::auth::{Auth, FileSessionStore, MemorySessionStore, SharedSessionStore};
use crate::config::{ClientOptions, FolioConfig};
use crate::contact::ContactClient;
use crate::dashboard::Dashboard;
use crate::editor::{Editable, ListEditor, ProfileEditor};
use crate::error::Error;
use crate::guard::SessionGuard;
use crate::models::{Education, Experience, Proficiency, Project, Skill};
use crate::profile::ProfileClient;
use crate::resource::{ListParams, Resource, ResourceClient};
use crate::visitor::VisitorClient;

/// The main entry point for the portfolio admin client
pub struct Folio {
    /// The base URL of the API
    pub url: String,
    /// HTTP client shared by every sub-client
    pub http_client: Client,
    /// Client options
    pub options: ClientOptions,
    /// Session shared by every sub-client
    store: SharedSessionStore,
    /// Auth client for login and logout
    auth: Auth,
    /// Cancels calls of every client created afterwards
    cancel: Option<CancellationToken>,
}

impl Folio {
    /// Create a new client with an in-memory session
    ///
    /// # Example
    ///
    /// ```
    /// use folio_admin::Folio;
    ///
    /// let folio = Folio::new("http://localhost:3000");
    /// assert!(!folio.auth().is_authenticated());
    /// ```
    pub fn new(api_url: &str) -> Self {
        Self::new_with_options(api_url, ClientOptions::default())
    }

    /// Create a new client with custom options
    ///
    /// # Example
    ///
    /// ```
    /// use std::time::Duration;
    /// use folio_admin::{Folio, config::ClientOptions};
    ///
    /// let options = ClientOptions::default().with_request_timeout(Some(Duration::from_secs(5)));
    /// let folio = Folio::new_with_options("http://localhost:3000", options);
    /// ```
    pub fn new_with_options(api_url: &str, options: ClientOptions) -> Self {
        let store: SharedSessionStore = Arc::new(MemorySessionStore::new());
        Self::with_parts(api_url, Client::new(), store, options)
    }

    /// Create a client for a validated configuration
    pub fn from_config(config: &FolioConfig, options: ClientOptions) -> Self {
        Self::new_with_options(&config.base_url(), options)
    }

    /// Create a client for the API named by `FOLIO_API_URL`
    pub fn from_env() -> Result<Self, Error> {
        Ok(Self::from_config(&FolioConfig::from_env()?, ClientOptions::default()))
    }

    fn with_parts(
        api_url: &str,
        http_client: Client,
        store: SharedSessionStore,
        options: ClientOptions,
    ) -> Self {
        let url = api_url.trim_end_matches('/').to_string();
        let auth = Auth::new(&url, http_client.clone(), store.clone(), options.clone());
        Self {
            url,
            http_client,
            options,
            store,
            auth,
            cancel: None,
        }
    }

    /// Use `store` for the session instead of the in-memory default
    pub fn with_session_store(self, store: SharedSessionStore) -> Self {
        let cancel = self.cancel.clone();
        let folio = Self::with_parts(&self.url, self.http_client, store, self.options);
        match cancel {
            Some(token) => folio.with_cancellation(token),
            None => folio,
        }
    }

    /// Persist the session as JSON at `path`
    pub fn with_session_file(self, path: impl AsRef<std::path::Path>) -> Self {
        self.with_session_store(Arc::new(FileSessionStore::open(path)))
    }

    /// Abort calls of clients created from now on when `token` is cancelled
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.auth = self.auth.with_cancellation(token.clone());
        self.cancel = Some(token);
        self
    }

    /// Get a reference to the auth client
    pub fn auth(&self) -> &Auth {
        &self.auth
    }

    /// The session store shared by every client
    pub fn store(&self) -> &SharedSessionStore {
        &self.store
    }

    /// Create a client for resource kind `R`
    ///
    /// # Example
    ///
    /// ```
    /// use folio_admin::{Folio, models::Skill};
    ///
    /// let folio = Folio::new("http://localhost:3000");
    /// let skills = folio.resource::<Skill>();
    /// ```
    pub fn resource<R: Resource>(&self) -> ResourceClient<R> {
        let client = ResourceClient::new(
            &self.url,
            self.http_client.clone(),
            self.store.clone(),
            self.options.clone(),
        );
        match &self.cancel {
            Some(token) => client.with_cancellation(token.clone()),
            None => client,
        }
    }

    pub fn education(&self) -> ResourceClient<Education> {
        self.resource()
    }

    pub fn experience(&self) -> ResourceClient<Experience> {
        self.resource()
    }

    pub fn skills(&self) -> ResourceClient<Skill> {
        self.resource()
    }

    pub fn proficiency(&self) -> ResourceClient<Proficiency> {
        self.resource()
    }

    pub fn projects(&self) -> ResourceClient<Project> {
        self.resource()
    }

    /// Create a client for the profile
    pub fn profile(&self) -> ProfileClient {
        let client = ProfileClient::new(
            &self.url,
            self.http_client.clone(),
            self.store.clone(),
            self.options.clone(),
        );
        match &self.cancel {
            Some(token) => client.with_cancellation(token.clone()),
            None => client,
        }
    }

    /// Create a client for visit tracking and stats
    pub fn visitor(&self) -> VisitorClient {
        let client = VisitorClient::new(
            &self.url,
            self.http_client.clone(),
            self.store.clone(),
            self.options.clone(),
        );
        match &self.cancel {
            Some(token) => client.with_cancellation(token.clone()),
            None => client,
        }
    }

    /// Create a client for the mail relay
    pub fn contact(&self) -> ContactClient {
        let client = ContactClient::new(
            &self.url,
            self.http_client.clone(),
            self.store.clone(),
            self.options.clone(),
        );
        match &self.cancel {
            Some(token) => client.with_cancellation(token.clone()),
            None => client,
        }
    }

    /// Create a guard over the shared session
    pub fn guard(&self) -> SessionGuard {
        SessionGuard::new(self.store.clone())
    }

    /// Create a list editor for resource kind `R` using the configured page size
    pub fn editor<R: Editable>(&self) -> ListEditor<R> {
        let params = ListParams::new(self.options.default_page, self.options.default_page_size);
        ListEditor::with_params(self.resource(), params)
    }

    /// Create an editor for the profile
    pub fn profile_editor(&self) -> ProfileEditor {
        ProfileEditor::new(self.profile())
    }

    /// Create a loader for the dashboard summary
    pub fn dashboard(&self) -> Dashboard {
        Dashboard::new(
            self.profile(),
            self.resource(),
            self.resource(),
            self.resource(),
            self.resource(),
            self.visitor(),
        )
    }
}

/// A convenience module for common imports
pub mod prelude {
    pub use crate::auth::{LoginCredentials, Session, SessionStore};
    pub use crate::config::ClientOptions;
    pub use crate::editor::{Editable, ListEditor, Notification, Phase, SubmitOutcome};
    pub use crate::error::Error;
    pub use crate::guard::Navigation;
    pub use crate::resource::{ListParams, Resource, ResourceApi, ResourceList};
    pub use crate::validation::Validate;
    pub use crate::Folio;
}

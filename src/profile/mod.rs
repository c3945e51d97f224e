//! Access to the singleton profile resource

use async_trait::async_trait;
use reqwest::Client;
use tokio_util::sync::CancellationToken;

use crate::auth::SharedSessionStore;
use crate::config::ClientOptions;
use crate::error::Error;
use crate::fetch::{Fetch, FetchBuilder};
use crate::models::{ContactCountUpdate, ContactCounts, Profile, UpdateContactCountsResponse};

/// The read/save surface a profile editor drives
#[async_trait]
pub trait ProfileApi: Send + Sync {
    /// Fetch the profile
    async fn get(&self) -> Result<Profile, Error>;

    /// Save the profile
    async fn update(&self, profile: &Profile) -> Result<Profile, Error>;
}

/// Client for `/profile` and its contact counters
#[derive(Clone)]
pub struct ProfileClient {
    url: String,
    client: Client,
    store: SharedSessionStore,
    options: ClientOptions,
    cancel: Option<CancellationToken>,
}

impl ProfileClient {
    /// Create a new ProfileClient
    pub fn new(url: &str, client: Client, store: SharedSessionStore, options: ClientOptions) -> Self {
        Self {
            url: url.trim_end_matches('/').to_string(),
            client,
            store,
            options,
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

    /// Fetch the profile
    pub async fn get(&self) -> Result<Profile, Error> {
        let url = format!("{}/profile", self.url);
        self.prepare(Fetch::get(&self.client, &url))
            .execute::<Profile>()
            .await
    }

    /// Create the profile when none exists yet
    pub async fn create(&self, profile: &Profile) -> Result<Profile, Error> {
        let url = format!("{}/profile", self.url);
        self.prepare(Fetch::post(&self.client, &url))
            .authorize(&self.store)?
            .json(profile)?
            .execute::<Profile>()
            .await
    }

    /// Replace the profile's fields
    pub async fn update(&self, profile: &Profile) -> Result<Profile, Error> {
        let url = format!("{}/profile", self.url);
        self.prepare(Fetch::put(&self.client, &url))
            .authorize(&self.store)?
            .json(profile)?
            .execute::<Profile>()
            .await
    }

    /// Current contact counters
    pub async fn contact_counts(&self) -> Result<ContactCounts, Error> {
        let url = format!("{}/profile/contact-counts", self.url);
        self.prepare(Fetch::get(&self.client, &url))
            .execute::<ContactCounts>()
            .await
    }

    /// Report the number of entries of one contact kind
    pub async fn update_contact_counts(
        &self,
        update: ContactCountUpdate,
    ) -> Result<UpdateContactCountsResponse, Error> {
        let url = format!("{}/profile/contact-counts", self.url);
        self.prepare(Fetch::put(&self.client, &url))
            .authorize(&self.store)?
            .json(&update)?
            .execute::<UpdateContactCountsResponse>()
            .await
    }
}

#[async_trait]
impl ProfileApi for ProfileClient {
    async fn get(&self) -> Result<Profile, Error> {
        ProfileClient::get(self).await
    }

    async fn update(&self, profile: &Profile) -> Result<Profile, Error> {
        ProfileClient::update(self, profile).await
    }
}

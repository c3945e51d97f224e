//! Typed CRUD access to one resource kind of the portfolio API

mod types;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use std::marker::PhantomData;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::auth::SharedSessionStore;
use crate::config::ClientOptions;
use crate::error::Error;
use crate::fetch::{Fetch, FetchBuilder};

pub use types::*;

/// A record kind served under its own base path
pub trait Resource: DeserializeOwned + Serialize + Clone + Send + Sync + 'static {
    /// Payload accepted by `create`
    type New: Serialize + Send + Sync;

    /// Partial payload accepted by `update`; absent fields stay unchanged
    type Patch: Serialize + Send + Sync;

    /// Base path, e.g. `/education`
    const PATH: &'static str;

    /// Human readable name used in notifications
    const LABEL: &'static str;

    /// Server-assigned identifier
    fn id(&self) -> &str;
}

/// The CRUD surface a list editor drives
#[async_trait]
pub trait ResourceApi<R: Resource>: Send + Sync {
    /// Fetch one page
    async fn list(&self, params: &ListParams) -> Result<ResourceList<R>, Error>;

    /// Create a record
    async fn create(&self, payload: &R::New) -> Result<R, Error>;

    /// Update the record `id`
    async fn update(&self, id: &str, patch: &R::Patch) -> Result<R, Error>;

    /// Delete the record `id`
    async fn delete(&self, id: &str) -> Result<(), Error>;
}

/// HTTP client for one resource kind
pub struct ResourceClient<R> {
    /// The base URL of the API
    url: String,

    /// HTTP client
    client: Client,

    /// Session consulted by mutating calls
    store: SharedSessionStore,

    /// Client options
    options: ClientOptions,

    /// Cancels every in-flight call of this client
    cancel: Option<CancellationToken>,

    _kind: PhantomData<fn() -> R>,
}

impl<R> Clone for ResourceClient<R> {
    fn clone(&self) -> Self {
        Self {
            url: self.url.clone(),
            client: self.client.clone(),
            store: self.store.clone(),
            options: self.options.clone(),
            cancel: self.cancel.clone(),
            _kind: PhantomData,
        }
    }
}

impl<R: Resource> ResourceClient<R> {
    /// Create a new ResourceClient
    pub fn new(url: &str, client: Client, store: SharedSessionStore, options: ClientOptions) -> Self {
        Self {
            url: url.trim_end_matches('/').to_string(),
            client,
            store,
            options,
            cancel: None,
            _kind: PhantomData,
        }
    }

    /// Abort calls of this client when `token` is cancelled
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    fn collection_url(&self) -> String {
        format!("{}{}", self.url, R::PATH)
    }

    fn item_url(&self, id: &str) -> Result<String, Error> {
        if id.trim().is_empty() {
            return Err(Error::invalid_input(format!("{} id must not be empty", R::LABEL)));
        }
        let mut url = Url::parse(&self.collection_url())?;
        url.path_segments_mut()
            .map_err(|_| Error::config(format!("{} is not a base URL", self.url)))?
            .pop_if_empty()
            .push(id);
        Ok(url.into())
    }

    fn prepare<'a>(&self, fetch: FetchBuilder<'a>) -> FetchBuilder<'a> {
        fetch
            .header("X-Client-Info", &self.options.client_info)
            .timeout(self.options.request_timeout)
            .cancel_on(self.cancel.clone())
            .with_session(&self.store)
    }

    /// Fetch page `page` of size `limit`
    pub async fn list(&self, page: u32, limit: u32) -> Result<ResourceList<R>, Error> {
        self.list_with(&ListParams::new(page, limit)).await
    }

    /// Fetch one page with extra filters
    pub async fn list_with(&self, params: &ListParams) -> Result<ResourceList<R>, Error> {
        params.validate()?;
        let url = self.collection_url();
        debug!("Listing {} page {} (limit {})", R::LABEL, params.page, params.limit);

        self.prepare(Fetch::get(&self.client, &url))
            .query(params.to_query())
            .execute::<ResourceList<R>>()
            .await
    }

    /// Fetch the record `id`
    pub async fn get_by_id(&self, id: &str) -> Result<R, Error> {
        let url = self.item_url(id)?;
        self.prepare(Fetch::get(&self.client, &url))
            .execute::<R>()
            .await
    }

    /// Create a record; fails with [`Error::Auth`] before sending when signed out
    pub async fn create(&self, payload: &R::New) -> Result<R, Error> {
        let url = self.collection_url();
        self.prepare(Fetch::post(&self.client, &url))
            .authorize(&self.store)?
            .json(payload)?
            .execute::<R>()
            .await
    }

    /// Update the record `id`; fails with [`Error::Auth`] before sending when signed out
    pub async fn update(&self, id: &str, patch: &R::Patch) -> Result<R, Error> {
        let url = self.item_url(id)?;
        self.prepare(Fetch::put(&self.client, &url))
            .authorize(&self.store)?
            .json(patch)?
            .execute::<R>()
            .await
    }

    /// Delete the record `id`; fails with [`Error::Auth`] before sending when signed out
    pub async fn delete(&self, id: &str) -> Result<(), Error> {
        let url = self.item_url(id)?;
        self.prepare(Fetch::delete(&self.client, &url))
            .authorize(&self.store)?
            .execute_empty()
            .await
    }
}

#[async_trait]
impl<R: Resource> ResourceApi<R> for ResourceClient<R> {
    async fn list(&self, params: &ListParams) -> Result<ResourceList<R>, Error> {
        self.list_with(params).await
    }

    async fn create(&self, payload: &R::New) -> Result<R, Error> {
        ResourceClient::create(self, payload).await
    }

    async fn update(&self, id: &str, patch: &R::Patch) -> Result<R, Error> {
        ResourceClient::update(self, id, patch).await
    }

    async fn delete(&self, id: &str) -> Result<(), Error> {
        ResourceClient::delete(self, id).await
    }
}

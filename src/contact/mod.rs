//! Outgoing email through the API's mail relay

use reqwest::Client;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::auth::SharedSessionStore;
use crate::config::ClientOptions;
use crate::error::Error;
use crate::fetch::Fetch;
use crate::validation::{Validate, ValidationErrors, Validator};

/// Body of `POST /email/send`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub text: String,
}

impl Validate for EmailMessage {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let validator = Validator::new()
            .required("to", &self.to, "Recipient is required.")
            .required("subject", &self.subject, "Subject is required.")
            .min_len("text", &self.text, 10, "Message must be at least 10 characters.");

        let to = self.to.trim();
        let looks_like_address = to
            .split_once('@')
            .map(|(local, domain)| !local.is_empty() && domain.contains('.'))
            .unwrap_or(false);

        let mut errors = validator.finish().err().unwrap_or_default();
        if !to.is_empty() && !looks_like_address {
            errors.add("to", "Please enter a valid email address.");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Client for the mail relay
pub struct ContactClient {
    url: String,
    client: Client,
    store: SharedSessionStore,
    options: ClientOptions,
    cancel: Option<CancellationToken>,
}

impl ContactClient {
    /// Create a new ContactClient
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

    /// Validate and send `message`; the relay is a mutating endpoint and needs a session
    pub async fn send_email(&self, message: &EmailMessage) -> Result<(), Error> {
        message.validate()?;

        let url = format!("{}/email/send", self.url);
        Fetch::post(&self.client, &url)
            .header("X-Client-Info", &self.options.client_info)
            .timeout(self.options.request_timeout)
            .cancel_on(self.cancel.clone())
            .authorize(&self.store)?
            .json(message)?
            .execute_empty()
            .await
    }
}

use log::{debug, warn};

use crate::editor::{Notification, Phase, SubmitOutcome};
use crate::models::{Profile, SocialLink};
use crate::profile::{ProfileApi, ProfileClient};
use crate::validation::{Validate, ValidationErrors};

/// Controller for the singleton profile screen
pub struct ProfileEditor<A = ProfileClient> {
    api: A,
    phase: Phase,
    loading: bool,
    error: Option<String>,
    profile: Option<Profile>,
    form: Profile,
    field_errors: ValidationErrors,
    session_expired: bool,
    notifications: Vec<Notification>,
}

impl<A: ProfileApi> ProfileEditor<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            phase: Phase::Idle,
            loading: false,
            error: None,
            profile: None,
            form: Profile::default(),
            field_errors: ValidationErrors::new(),
            session_expired: false,
            notifications: Vec::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The profile as last fetched
    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    /// Values being edited
    pub fn form(&self) -> &Profile {
        &self.form
    }

    pub fn field_errors(&self) -> &ValidationErrors {
        &self.field_errors
    }

    pub fn session_expired(&self) -> bool {
        self.session_expired
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    /// Fetch the profile and prefill the form with it
    pub async fn mount(&mut self) -> bool {
        self.phase = Phase::Loading;
        self.loading = true;

        let result = self.api.get().await;
        self.loading = false;

        match result {
            Ok(profile) => {
                self.form = profile.clone();
                self.profile = Some(profile);
                self.field_errors.clear();
                self.phase = Phase::Loaded;
                self.error = None;
                self.session_expired = false;
                true
            }
            Err(err) => {
                warn!("Failed to load profile: {}", err);
                if err.is_auth() || err.status() == Some(401) {
                    self.session_expired = true;
                }
                self.phase = Phase::Failed;
                self.error = Some(err.user_message());
                self.notifications
                    .push(Notification::error("Failed to load profile", err.user_message()));
                false
            }
        }
    }

    /// Store edited values and revalidate them for display
    pub fn on_field_change(&mut self, form: Profile) {
        self.field_errors = form.validate().err().unwrap_or_default();
        self.form = form;
    }

    /// Append an empty social link row
    pub fn add_social_link(&mut self) {
        self.form.social_media.push(SocialLink::default());
    }

    /// Remove the social link row at `index`, if present
    pub fn remove_social_link(&mut self, index: usize) {
        if index < self.form.social_media.len() {
            self.form.social_media.remove(index);
            self.field_errors = self.form.validate().err().unwrap_or_default();
        }
    }

    /// Discard edits and go back to the fetched profile
    pub fn reset(&mut self) {
        self.form = self.profile.clone().unwrap_or_default();
        self.field_errors.clear();
    }

    /// Validate and save `form`, then refetch
    pub async fn submit(&mut self, form: Profile) -> SubmitOutcome {
        self.form = form;

        if let Err(errors) = self.form.validate() {
            self.field_errors = errors.clone();
            return SubmitOutcome::Invalid(errors);
        }
        self.field_errors.clear();

        match self.api.update(&self.form).await {
            Ok(_) => {
                debug!("Profile updated");
                self.notifications.push(Notification::success(
                    "Profile updated",
                    "Your profile has been updated successfully.",
                ));
                self.mount().await;
                SubmitOutcome::Saved
            }
            Err(err) => {
                warn!("Failed to save profile: {}", err);
                if err.is_auth() || err.status() == Some(401) {
                    self.session_expired = true;
                }
                let message = err.user_message();
                self.notifications
                    .push(Notification::error("Failed to save profile", message.clone()));
                SubmitOutcome::Failed(message)
            }
        }
    }
}

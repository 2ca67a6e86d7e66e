use log::{debug, info};

use super::prompt::{Notifier, PromptSpec, Prompter};
use super::validate::validate_url;
use crate::errors::ProfileError;
use crate::storage::{ConnectionProfile, ProfileStore};

pub const NO_NAME_CANCELLED: &str = "Profile Name was not supplied. Operation Cancelled";
pub const NO_URL_CANCELLED: &str = "No valid value for URL. Operation Cancelled";
pub const CANCELLED: &str = "Operation Cancelled";
pub const DUPLICATE_NAME: &str = "Profile name already exists.";

pub const TLS_REJECT: &str = "True - Reject connections with self-signed certificates";
pub const TLS_ACCEPT: &str = "False - Accept connections with self-signed certificates";

/// How a wizard run ended, when the store itself did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardOutcome {
    /// The named profile was written.
    Created(String),
    /// A required prompt was dismissed or left empty.
    Cancelled,
    /// A profile with this name already exists; nothing was written.
    DuplicateName(String),
}

/// Collects one new profile from the user and saves it.
///
/// Steps run strictly one after another: name, URL, username, password,
/// TLS policy, then the duplicate check and the write. Dismissing the name,
/// URL or TLS prompt ends the run with an informational message; username
/// and password are optional.
pub struct ConnectionWizard<'a> {
    store: &'a ProfileStore,
    prompter: &'a mut dyn Prompter,
    notifier: &'a dyn Notifier,
}

impl<'a> ConnectionWizard<'a> {
    pub fn new(
        store: &'a ProfileStore,
        prompter: &'a mut dyn Prompter,
        notifier: &'a dyn Notifier,
    ) -> Self {
        Self {
            store,
            prompter,
            notifier,
        }
    }

    /// Runs the flow to completion.
    ///
    /// Only store failures are returned as `Err`; every user-side outcome is
    /// reported through the notifier and the returned [`WizardOutcome`].
    pub async fn run(mut self) -> Result<WizardOutcome, ProfileError> {
        let Some(name) = self.ask_name().await else {
            return Ok(self.cancel("name", NO_NAME_CANCELLED));
        };
        let Some(url) = self.ask_url().await else {
            return Ok(self.cancel("url", NO_URL_CANCELLED));
        };
        let username = self.ask_username().await;
        let password = self.ask_password().await;
        let Some(reject_unauthorized) = self.ask_tls_policy().await else {
            return Ok(self.cancel("tls policy", CANCELLED));
        };

        // Includes records `list` cannot parse, so those are never shadowed.
        if self.store.stored_names().await?.contains(&name) {
            debug!("Profile {name:?} already exists; nothing written");
            self.notifier.show_error(DUPLICATE_NAME);
            return Ok(WizardOutcome::DuplicateName(name));
        }

        let mut profiles = self.store.list().await?;
        profiles.push(ConnectionProfile {
            name: name.clone(),
            url,
            username,
            password,
            reject_unauthorized,
        });
        self.store.update(&profiles).await?;

        info!("Created profile {name:?}");
        self.notifier.show_info(&format!("Profile {name} was created."));
        Ok(WizardOutcome::Created(name))
    }

    fn cancel(&self, step: &str, message: &str) -> WizardOutcome {
        debug!("Wizard cancelled at the {step} prompt");
        self.notifier.show_info(message);
        WizardOutcome::Cancelled
    }

    async fn ask_name(&mut self) -> Option<String> {
        let spec =
            PromptSpec::new("Enter a name for the connection").placeholder("Connection Name");
        trimmed(self.prompter.request_text(&spec).await)
    }

    async fn ask_url(&mut self) -> Option<String> {
        let spec = PromptSpec::new("Enter a URL in the format 'http(s)://url:port'.")
            .placeholder("http(s)://url:port")
            .validate_with(validate_url);
        trimmed(self.prompter.request_text(&spec).await)
    }

    async fn ask_username(&mut self) -> Option<String> {
        let spec = PromptSpec::new("Optional: Enter the user name for the connection")
            .placeholder("User Name (Optional)");
        trimmed(self.prompter.request_text(&spec).await)
    }

    async fn ask_password(&mut self) -> Option<String> {
        let spec = PromptSpec::new("Optional: Enter a password for the connection")
            .placeholder("Password (Optional)")
            .hidden();
        // whitespace is significant in passwords
        self.prompter
            .request_text(&spec)
            .await
            .filter(|p| !p.is_empty())
    }

    async fn ask_tls_policy(&mut self) -> Option<bool> {
        let options = [TLS_REJECT.to_string(), TLS_ACCEPT.to_string()];
        let spec = PromptSpec::new("Reject Unauthorized Connections")
            .placeholder("Reject Unauthorized Connections");
        match self.prompter.request_choice(&options, &spec).await.as_deref() {
            Some(TLS_REJECT) => Some(true),
            Some(TLS_ACCEPT) => Some(false),
            _ => None,
        }
    }
}

/// Surrounding whitespace dropped; blank input counts as no input.
fn trimmed(input: Option<String>) -> Option<String> {
    input
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
}

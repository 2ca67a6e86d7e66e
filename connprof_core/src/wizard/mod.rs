pub mod connection_wizard;
pub mod prompt;
pub mod validate;

pub use connection_wizard::{ConnectionWizard, WizardOutcome};
pub use prompt::{Notifier, PromptSpec, Prompter, Validator};
pub use validate::validate_url;

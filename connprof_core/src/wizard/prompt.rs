//! The input and notification surfaces the wizard talks to.
//!
//! A front end (terminal, GUI, test script) implements [`Prompter`] and
//! [`Notifier`]; the wizard only ever suspends inside `request_*` calls.

use async_trait::async_trait;

/// Inline validator: `Err(message)` makes the surface re-prompt.
pub type Validator = fn(&str) -> Result<(), String>;

/// Describes one text or choice prompt.
#[derive(Clone, Default)]
pub struct PromptSpec {
    pub prompt: String,
    pub placeholder: String,
    /// Do not echo what the user types.
    pub hide_input: bool,
    pub validate: Option<Validator>,
}

impl PromptSpec {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Self::default()
        }
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hide_input = true;
        self
    }

    pub fn validate_with(mut self, validator: Validator) -> Self {
        self.validate = Some(validator);
        self
    }

    /// Runs the validator against non-blank input.
    ///
    /// Empty or whitespace-only input is always let through so the caller can
    /// treat it as a cancellation.
    pub fn check(&self, input: &str) -> Result<(), String> {
        match self.validate {
            Some(validate) if !input.trim().is_empty() => validate(input),
            _ => Ok(()),
        }
    }
}

/// Blocking-style input requests. `None` means the prompt was dismissed.
#[async_trait]
pub trait Prompter: Send {
    /// Ask for free text. Implementations must apply [`PromptSpec::check`]
    /// and keep asking until it passes or the user gives up.
    async fn request_text(&mut self, spec: &PromptSpec) -> Option<String>;

    /// Ask the user to pick one of `options`; returns the picked option.
    async fn request_choice(&mut self, options: &[String], spec: &PromptSpec) -> Option<String>;
}

/// Fire-and-forget user notifications.
pub trait Notifier: Send + Sync {
    fn show_info(&self, text: &str);
    fn show_error(&self, text: &str);
}

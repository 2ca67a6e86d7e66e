//! A deterministic **scripted stand‑in** for the interactive surface the
//! wizard drives.
//!
//! *  **From the test’s perspective**
//!    * Queue answers with `ScriptedPrompter::new([...])`; `None` plays the
//!      role of a dismissed prompt.
//!    * Inspect what was asked via `asked`, and which inputs the inline
//!      validator bounced via `rejected`.
//!    * `RecordingNotifier` keeps every info / error message in order.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use connprof_core::wizard::{Notifier, PromptSpec, Prompter};

pub struct ScriptedPrompter {
    answers: VecDeque<Option<String>>,

    /// `(prompt, hide_input)` for every request, in order.
    pub asked: Vec<(String, bool)>,
    /// `(input, validator message)` for every re-prompt.
    pub rejected: Vec<(String, String)>,
}

impl ScriptedPrompter {
    /// One entry per answer the user "types". Running out of answers behaves
    /// like dismissing the prompt.
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(|a| a.map(Into::into)).collect(),
            asked: Vec::new(),
            rejected: Vec::new(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

#[async_trait]
impl Prompter for ScriptedPrompter {
    async fn request_text(&mut self, spec: &PromptSpec) -> Option<String> {
        self.asked.push((spec.prompt.clone(), spec.hide_input));
        loop {
            let answer = self.answers.pop_front().flatten()?;
            match spec.check(&answer) {
                Ok(()) => return Some(answer),
                // Same as the user correcting their input after the inline error.
                Err(message) => self.rejected.push((answer, message)),
            }
        }
    }

    async fn request_choice(&mut self, options: &[String], spec: &PromptSpec) -> Option<String> {
        self.asked.push((spec.prompt.clone(), spec.hide_input));
        let answer = self.answers.pop_front().flatten()?;
        // Allow scripts to pick by 1-based index as well as by label.
        match answer.parse::<usize>() {
            Ok(n) if (1..=options.len()).contains(&n) => Some(options[n - 1].clone()),
            _ => Some(answer),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Error(String),
}

#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.notices()
            .into_iter()
            .filter_map(|n| match n {
                Notice::Error(text) => Some(text),
                Notice::Info(_) => None,
            })
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn show_info(&self, text: &str) {
        self.notices.lock().unwrap().push(Notice::Info(text.to_owned()));
    }

    fn show_error(&self, text: &str) {
        self.notices.lock().unwrap().push(Notice::Error(text.to_owned()));
    }
}

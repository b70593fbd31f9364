//! Yes/no confirmation for destructive or overwriting actions
use std::collections::VecDeque;
use std::future::{Future, ready};

/// Presents `message` and resolves once the user answers. `false` covers both
/// a negative answer and a dismissed prompt.
pub trait ConfirmationGate {
    fn prompt(&mut self, message: &str) -> impl Future<Output = bool>;
}

/// Result of an operation that went through a [`ConfirmationGate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Accepted,
    Declined,
}

/// Answers prompts from a prepared script, falling back to a fixed answer once
/// the script runs out. Keeps every message it was shown.
#[derive(Debug, Clone, Default)]
pub struct ScriptedGate {
    answers: VecDeque<bool>,
    fallback: bool,
    prompts: Vec<String>,
}

impl ScriptedGate {
    pub fn always(answer: bool) -> Self {
        Self {
            fallback: answer,
            ..Self::default()
        }
    }
    pub fn answering(answers: impl IntoIterator<Item = bool>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            ..Self::default()
        }
    }
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }
}

impl ConfirmationGate for ScriptedGate {
    fn prompt(&mut self, message: &str) -> impl Future<Output = bool> {
        self.prompts.push(message.to_owned());
        ready(self.answers.pop_front().unwrap_or(self.fallback))
    }
}

impl From<bool> for Confirmation {
    fn from(value: bool) -> Self {
        if value {
            Confirmation::Accepted
        } else {
            Confirmation::Declined
        }
    }
}

//! Message composer: turns the user's words into a finished message.
//!
//! A composer holds an intent and an index into that intent's template list.
//! `regenerate` steps to the next phrasing and wraps around.

pub mod intent;
pub mod templates;

pub use intent::Intent;
pub use templates::{Template, templates_for};

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::validation::require;

/// The fields a template interpolates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageInput {
    pub recipient: String,
    /// May be blank; templates fall back to neutral wording.
    #[serde(default)]
    pub relationship: String,
    pub text: String,
}

impl MessageInput {
    pub fn new(
        recipient: impl Into<String>,
        relationship: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            recipient: recipient.into(),
            relationship: relationship.into(),
            text: text.into(),
        }
    }

    /// The relationship, if one was given.
    pub fn relationship(&self) -> Option<&str> {
        let rel = self.relationship.trim();
        (!rel.is_empty()).then_some(rel)
    }

    /// Presence checks for the required fields. Callers run this before
    /// composing.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("Recipient name", &self.recipient)?;
        require("Message", &self.text)?;
        Ok(())
    }
}

/// Picks and cycles phrasings for one intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageComposer {
    intent: Intent,
    index: usize,
}

impl MessageComposer {
    pub fn new(intent: Intent) -> Self {
        Self { intent, index: 0 }
    }

    pub fn intent(&self) -> Intent {
        self.intent
    }

    /// Which phrasing is current (0-based).
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn template_count(&self) -> usize {
        templates_for(self.intent).len()
    }

    /// Render the current phrasing.
    pub fn compose(&self, input: &MessageInput) -> String {
        let templates = templates_for(self.intent);
        templates[self.index % templates.len()](input)
    }

    /// Advance to the next phrasing (wrapping) and render it.
    pub fn regenerate(&mut self, input: &MessageInput) -> String {
        self.index = (self.index + 1) % self.template_count();
        self.compose(input)
    }
}

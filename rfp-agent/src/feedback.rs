//! Human feedback on a suggestion.

use serde::{Deserialize, Serialize};

/// What the user did with a suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackAction {
    /// Keep the suggestion as it is.
    Accept,
    /// Ask for a rewrite, optionally with a critique.
    Reject,
    /// Replace the suggestion with the caller's own text.
    Edit,
}

impl FeedbackAction {
    /// Wire name of the action.
    pub fn as_str(self) -> &'static str {
        match self {
            FeedbackAction::Accept => "accept",
            FeedbackAction::Reject => "reject",
            FeedbackAction::Edit => "edit",
        }
    }
}

/// One feedback round trip.
///
/// Nothing is kept server-side between requests, so the caller sends back
/// the query, the context, and the suggestion it is reacting to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub action: FeedbackAction,
    /// The question that produced the suggestion.
    pub query: String,
    /// The suggestion being reviewed.
    pub suggestion: String,
    /// Retrieved context the suggestion was drafted from.
    #[serde(default)]
    pub context: String,
    /// What the user disliked. Only read on reject.
    #[serde(default)]
    pub critique: Option<String>,
    /// Replacement text. Required on edit.
    #[serde(default)]
    pub edit_text: Option<String>,
}

impl FeedbackRecord {
    /// A record with no critique or edit text.
    pub fn new(
        action: FeedbackAction,
        query: impl Into<String>,
        suggestion: impl Into<String>,
        context: impl Into<String>,
    ) -> Self {
        Self {
            action,
            query: query.into(),
            suggestion: suggestion.into(),
            context: context.into(),
            critique: None,
            edit_text: None,
        }
    }

    /// Attach the critique sent with a reject.
    pub fn with_critique(mut self, critique: impl Into<String>) -> Self {
        self.critique = Some(critique.into());
        self
    }

    /// Attach the replacement text sent with an edit.
    pub fn with_edit_text(mut self, text: impl Into<String>) -> Self {
        self.edit_text = Some(text.into());
        self
    }
}

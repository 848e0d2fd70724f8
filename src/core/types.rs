// src/core/types.rs — Core domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::provider::Message;

/// Sentinel comment and summary recorded for the first generation.
pub const INITIAL_TURN_LABEL: &str = "首稿";
/// Summary recorded for comment-driven revisions.
pub const REVISION_SUMMARY: &str = "修订";

/// What the operator wants written. Fixed for the lifetime of a session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Spec {
    pub topic: String,
    #[serde(default)]
    pub outline: Vec<String>,
    /// Target length in characters; 0 means unspecified.
    #[serde(default)]
    pub words: u32,
    #[serde(default)]
    pub constraints: Vec<String>,
    /// Style preset key; empty selects the default preset.
    #[serde(default)]
    pub style: String,
}

/// A generated article in Markdown form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Draft {
    pub title: String,
    pub digest: String,
    pub markdown: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_hint: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inline_image_hints: Vec<String>,
}

/// One revision event. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub comment: String,
    pub draft: Draft,
    pub summary: String,
    pub created_at: DateTime<Utc>,
}

impl Turn {
    pub fn new(comment: impl Into<String>, draft: Draft, summary: impl Into<String>) -> Self {
        Self {
            comment: comment.into(),
            draft,
            summary: summary.into(),
            created_at: Utc::now(),
        }
    }
}

/// The message set sent to the language model.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
    /// Auxiliary context placed before the user message.
    pub history: Vec<Message>,
}

// src/core/session.rs — One article's draft/revision thread

use std::sync::Arc;

use super::agent::Agent;
use super::types::{Draft, Spec, Turn, INITIAL_TURN_LABEL, REVISION_SUMMARY};
use crate::infra::errors::{Result, WxDraftError};

/// Holds the article `Spec`, the current draft and the append-only turn history.
///
/// `draft` is `None` until the first successful generation and afterwards
/// always equals the draft of the last turn.
pub struct Session {
    id: String,
    spec: Spec,
    draft: Option<Draft>,
    history: Vec<Turn>,
    agent: Arc<Agent>,
}

impl Session {
    pub fn new(id: impl Into<String>, spec: Spec, agent: Arc<Agent>) -> Self {
        Self {
            id: id.into(),
            spec,
            draft: None,
            history: Vec::new(),
            agent,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn spec(&self) -> &Spec {
        &self.spec
    }

    pub fn draft(&self) -> Option<&Draft> {
        self.draft.as_ref()
    }

    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    /// Generate the first draft.
    pub async fn propose(&mut self) -> Result<Draft> {
        let draft = self
            .agent
            .generate(&self.spec, None, &self.history, "")
            .await?;
        self.commit(INITIAL_TURN_LABEL, draft.clone(), INITIAL_TURN_LABEL);
        tracing::info!(session = %self.id, title = %draft.title, "initial draft generated");
        Ok(draft)
    }

    /// Revise the current draft according to `comment`. State is untouched on failure.
    pub async fn revise(&mut self, comment: &str) -> Result<Draft> {
        let Some(current) = self.draft.as_ref() else {
            return Err(WxDraftError::Validation(
                "draft is empty; generate first".into(),
            ));
        };

        let draft = self
            .agent
            .generate(&self.spec, Some(current), &self.history, comment)
            .await?;
        self.commit(comment, draft.clone(), REVISION_SUMMARY);
        tracing::info!(
            session = %self.id,
            turns = self.history.len(),
            "draft revised"
        );
        Ok(draft)
    }

    fn commit(&mut self, comment: &str, draft: Draft, summary: &str) {
        self.history.push(Turn::new(comment, draft.clone(), summary));
        self.draft = Some(draft);
    }
}

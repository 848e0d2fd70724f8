// src/core/agent.rs — Drafting agent: prompt -> model -> post-process

use std::sync::Arc;

use super::postprocess::post_process;
use super::prompt::{build_initial_prompt, build_revision_prompt};
use super::types::{Draft, Prompt, Spec, Turn};
use crate::infra::errors::Result;
use crate::provider::{ChatRequest, Message, ModelProvider};

/// Produces first drafts and revisions. Holds no per-article state.
pub struct Agent {
    provider: Arc<dyn ModelProvider>,
    model: String,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
}

impl Agent {
    pub fn new(provider: Arc<dyn ModelProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            max_tokens: None,
            temperature: None,
        }
    }

    /// Unset values leave the provider's own defaults in place.
    pub fn with_sampling(mut self, max_tokens: Option<u32>, temperature: Option<f32>) -> Self {
        self.max_tokens = max_tokens;
        self.temperature = temperature;
        self
    }

    /// First draft when `previous` is `None`, otherwise a revision driven by `comment`.
    pub async fn generate(
        &self,
        spec: &Spec,
        previous: Option<&Draft>,
        history: &[Turn],
        comment: &str,
    ) -> Result<Draft> {
        let prompt = match previous {
            None => build_initial_prompt(spec),
            Some(prev) => build_revision_prompt(spec, prev, comment, history),
        };

        let raw = self.complete(&prompt).await?;
        post_process(&raw, spec)
    }

    /// Send a prompt to the model and return its text unchanged.
    pub async fn complete(&self, prompt: &Prompt) -> Result<String> {
        let mut messages = prompt.history.clone();
        messages.push(Message::user(prompt.user.clone()));

        let request = ChatRequest {
            model: self.model.clone(),
            messages,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            system: Some(prompt.system.clone()),
        };

        let started = std::time::Instant::now();
        let response = self.provider.chat(request).await?;
        tracing::info!(
            provider = self.provider.id(),
            model = %self.model,
            tokens = response.usage.total(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "model completion finished"
        );
        Ok(response.content)
    }
}

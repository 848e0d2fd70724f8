// src/provider/resolver.rs — Build the configured provider

use std::sync::Arc;

use super::anthropic::AnthropicProvider;
use super::mock::MockProvider;
use super::openai_compat::OpenAICompatProvider;
use super::ModelProvider;
use crate::infra::config::LlmConfig;
use crate::infra::errors::{Result, WxDraftError};

/// A provider plus the model name requests should carry.
pub struct ResolvedProvider {
    pub provider: Arc<dyn ModelProvider>,
    pub model: String,
}

fn default_key_env(provider: &str) -> &'static str {
    match provider {
        "anthropic" => "ANTHROPIC_API_KEY",
        _ => "OPENAI_API_KEY",
    }
}

/// Env var first, then the inline config value.
fn resolve_key(cfg: &LlmConfig) -> Result<String> {
    let env_var = cfg
        .api_key_env
        .as_deref()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default_key_env(&cfg.provider));

    if let Ok(key) = std::env::var(env_var) {
        if !key.is_empty() {
            return Ok(key);
        }
    }
    cfg.api_key
        .clone()
        .filter(|k| !k.is_empty())
        .ok_or_else(|| {
            WxDraftError::Config(format!(
                "{} api key missing; set {} or llm.api_key",
                cfg.provider, env_var
            ))
        })
}

pub fn build_provider(cfg: &LlmConfig) -> Result<ResolvedProvider> {
    let provider: Arc<dyn ModelProvider> = match cfg.provider.as_str() {
        "mock" => {
            return Ok(ResolvedProvider {
                provider: Arc::new(MockProvider),
                model: cfg.model.clone(),
            })
        }
        "anthropic" => {
            require_model(cfg)?;
            Arc::new(AnthropicProvider::new(resolve_key(cfg)?, cfg.base_url.clone()))
        }
        "openai" | "openai-compatible" => {
            require_model(cfg)?;
            Arc::new(OpenAICompatProvider::new(
                cfg.provider.clone(),
                resolve_key(cfg)?,
                cfg.base_url.clone(),
            ))
        }
        other => {
            return Err(WxDraftError::Config(format!(
                "llm provider {} not supported",
                other
            )))
        }
    };

    tracing::info!(provider = provider.id(), model = %cfg.model, "language model configured");
    Ok(ResolvedProvider {
        provider,
        model: cfg.model.clone(),
    })
}

fn require_model(cfg: &LlmConfig) -> Result<()> {
    if cfg.model.trim().is_empty() {
        return Err(WxDraftError::Config("llm model is required".into()));
    }
    Ok(())
}

// src/provider/openai_compat.rs — Generic OpenAI-compatible provider
//
// Covers the OpenAI API itself and any gateway speaking the same
// `/chat/completions` wire format; only the base URL differs.

use async_trait::async_trait;

use super::{provider_error, ChatRequest, ChatResponse, Message, ModelProvider, TokenUsage};
use crate::infra::errors::WxDraftError;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

pub struct OpenAICompatProvider {
    id_str: String,
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl OpenAICompatProvider {
    pub fn new(id: impl Into<String>, api_key: String, base_url: Option<String>) -> Self {
        Self {
            id_str: id.into(),
            api_key,
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn build_request_body(&self, request: &ChatRequest) -> serde_json::Value {
        // The system prompt travels as the leading message.
        let system = request.system.clone().map(Message::system);
        let msgs: Vec<serde_json::Value> = system
            .iter()
            .chain(request.messages.iter())
            .map(|m| {
                serde_json::json!({
                    "role": m.role.as_str(),
                    "content": m.content,
                })
            })
            .collect();

        let mut body = serde_json::json!({
            "model": request.model,
            "messages": msgs,
        });
        if let Some(max_tokens) = request.max_tokens {
            body["max_tokens"] = serde_json::json!(max_tokens);
        }
        if let Some(temp) = request.temperature {
            body["temperature"] = serde_json::json!(temp);
        }
        body
    }
}

#[async_trait]
impl ModelProvider for OpenAICompatProvider {
    fn id(&self) -> &str {
        &self.id_str
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, WxDraftError> {
        let body = self.build_request_body(&request);

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| provider_error(&self.id_str, e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response.text().await.unwrap_or_default();
            return Err(provider_error(
                &self.id_str,
                format!("HTTP {}: {}", status, error_body),
            ));
        }

        let resp: serde_json::Value = response
            .json()
            .await
            .map_err(|e| provider_error(&self.id_str, e.to_string()))?;

        parse_completion(&self.id_str, &resp)
    }
}

fn parse_completion(provider: &str, resp: &serde_json::Value) -> Result<ChatResponse, WxDraftError> {
    let choices = resp["choices"].as_array().map(Vec::len).unwrap_or(0);
    if choices == 0 {
        return Err(provider_error(provider, "empty choices"));
    }

    let content = resp["choices"][0]["message"]["content"]
        .as_str()
        .unwrap_or("")
        .to_string();

    let usage = TokenUsage {
        input_tokens: resp["usage"]["prompt_tokens"].as_u64().unwrap_or(0) as u32,
        output_tokens: resp["usage"]["completion_tokens"].as_u64().unwrap_or(0) as u32,
    };

    Ok(ChatResponse { content, usage })
}

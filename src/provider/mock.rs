// src/provider/mock.rs — Offline provider for local runs
//
// Never touches the network. Echoes the user message inside a fixed
// article skeleton so the whole draft/publish flow can be exercised.

use async_trait::async_trait;

use super::{ChatRequest, ChatResponse, ModelProvider, Role, TokenUsage};
use crate::infra::errors::WxDraftError;

#[derive(Debug, Default, Clone, Copy)]
pub struct MockProvider;

#[async_trait]
impl ModelProvider for MockProvider {
    fn id(&self) -> &str {
        "mock"
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, WxDraftError> {
        let user = request
            .messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
            .unwrap_or("");

        let mut content = String::with_capacity(user.len() + 128);
        content.push_str("# 自动生成示例标题\n\n");
        content.push_str("这里是一段自动生成的摘要，概述全文要点。\n\n");
        content.push_str("## 正文\n\n");
        content.push_str("根据提示生成的内容：\n\n");
        content.push_str("```\n");
        content.push_str(user);
        content.push_str("\n```\n");

        Ok(ChatResponse {
            content,
            usage: TokenUsage::default(),
        })
    }
}

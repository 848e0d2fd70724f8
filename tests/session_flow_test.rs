// tests/session_flow_test.rs — Integration test: draft sessions with a scripted provider

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use pretty_assertions::assert_eq;

use wxdraft::core::agent::Agent;
use wxdraft::core::session::Session;
use wxdraft::core::types::{Spec, INITIAL_TURN_LABEL, REVISION_SUMMARY};
use wxdraft::infra::errors::WxDraftError;
use wxdraft::provider::*;

/// Replies in order and records every request it receives.
struct ScriptedProvider {
    replies: Mutex<VecDeque<String>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedProvider {
    fn new(replies: &[&str]) -> Self {
        Self {
            replies: Mutex::new(replies.iter().map(|r| r.to_string()).collect()),
            requests: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ModelProvider for ScriptedProvider {
    fn id(&self) -> &str {
        "scripted"
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, WxDraftError> {
        self.requests.lock().unwrap().push(request);
        let content = self.replies.lock().unwrap().pop_front().unwrap_or_default();
        Ok(ChatResponse {
            content,
            usage: TokenUsage {
                input_tokens: 120,
                output_tokens: 80,
            },
        })
    }
}

const FIRST: &str = "# 自动化实践\n\n## 为什么\n\n正文一\n\n## 怎么做\n\n正文二\n";
const REVISED: &str = "# 自动化实践\n\n## 为什么\n\n正文一\n\n## 怎么做\n\n正文二，结尾更有力。\n";

fn spec() -> Spec {
    Spec {
        topic: "自动化".into(),
        words: 200,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_propose_then_revise() {
    let provider = Arc::new(ScriptedProvider::new(&[FIRST, REVISED]));
    let agent = Arc::new(Agent::new(provider.clone(), "test-model"));
    let mut session = Session::new("s1", spec(), agent);

    let first = session.propose().await.unwrap();
    assert_eq!(first.title, "自动化实践");
    assert_eq!(first.digest, "");

    let revised = session.revise("加强结尾").await.unwrap();
    assert_eq!(session.history().len(), 2);
    assert_eq!(session.history()[1].draft, revised);
    assert_eq!(session.draft(), Some(&revised));

    assert_eq!(session.history()[0].comment, INITIAL_TURN_LABEL);
    assert_eq!(session.history()[0].summary, INITIAL_TURN_LABEL);
    assert_eq!(session.history()[1].comment, "加强结尾");
    assert_eq!(session.history()[1].summary, REVISION_SUMMARY);

    // Structure survives post-processing untouched.
    let headings = revised.markdown.lines().filter(|l| l.starts_with('#')).count();
    assert_eq!(headings, 3);
}

#[tokio::test]
async fn test_requests_carry_model_and_context() {
    let provider = Arc::new(ScriptedProvider::new(&[FIRST, REVISED]));
    let agent = Arc::new(Agent::new(provider.clone(), "test-model"));
    let mut session = Session::new("s1", spec(), agent);
    session.propose().await.unwrap();
    session.revise("加强结尾").await.unwrap();

    let requests = provider.requests.lock().unwrap();
    assert_eq!(requests.len(), 2);
    assert!(requests.iter().all(|r| r.model == "test-model"));

    let initial = &requests[0];
    assert!(initial.system.as_deref().unwrap().contains("200"));
    assert!(initial.messages.last().unwrap().content.contains("自动化"));

    let revision = &requests[1];
    let user = &revision.messages.last().unwrap().content;
    assert!(user.contains("正文二\n"), "current draft travels in the user message");
    assert!(user.contains("加强结尾"));
}

#[tokio::test]
async fn test_empty_model_output_leaves_session_untouched() {
    let provider = Arc::new(ScriptedProvider::new(&[FIRST, "   \n"]));
    let agent = Arc::new(Agent::new(provider, "m"));
    let mut session = Session::new("s1", spec(), agent);
    let first = session.propose().await.unwrap();

    let err = session.revise("改").await.unwrap_err();
    assert!(matches!(err, WxDraftError::EmptyOutput));
    assert_eq!(session.history().len(), 1);
    assert_eq!(session.draft(), Some(&first));
}

#[tokio::test]
async fn test_revise_before_propose_rejected() {
    let provider = Arc::new(ScriptedProvider::new(&[]));
    let agent = Arc::new(Agent::new(provider.clone(), "m"));
    let mut session = Session::new("s1", spec(), agent);
    let err = session.revise("改").await.unwrap_err();
    assert!(err.is_validation());
    assert!(provider.requests.lock().unwrap().is_empty());
}

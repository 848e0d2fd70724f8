// src/core/service.rs — Session lifecycle and publishing, independent of transport

use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::OnceCell;
use uuid::Uuid;

use super::agent::Agent;
use super::session::Session;
use super::store::{SessionHandle, SessionStore};
use super::types::{Draft, Spec, Turn};
use crate::infra::config::{Config, WeChatConfig};
use crate::infra::deadline::with_deadline;
use crate::infra::errors::{Result, WxDraftError};
use crate::publisher::wechat::{Credentials, WeChatApi};
use crate::publisher::{PublishParams, Publisher};

/// What callers see after create/revise.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub session_id: String,
    pub draft: Draft,
    pub history: Vec<Turn>,
}

impl SessionView {
    fn of(session: &Session) -> Self {
        Self {
            session_id: session.id().to_string(),
            draft: session.draft().cloned().unwrap_or_default(),
            history: session.history().to_vec(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PublishRequest {
    pub session_id: String,
    /// Empty falls back to the configured default cover.
    pub cover_path: Option<PathBuf>,
    pub author: String,
    pub title: String,
    pub digest: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublishOutcome {
    pub media_id: String,
    pub title: String,
    pub cover_path: PathBuf,
}

pub struct DraftService {
    agent: Arc<Agent>,
    store: SessionStore,
    api: Arc<dyn WeChatApi>,
    wechat: WeChatConfig,
    publisher: OnceCell<Publisher>,
    generation_timeout: Duration,
    publish_timeout: Duration,
}

impl DraftService {
    pub fn new(agent: Arc<Agent>, api: Arc<dyn WeChatApi>, config: &Config) -> Self {
        Self {
            agent,
            store: SessionStore::new(config.session.ttl()),
            api,
            wechat: config.wechat.clone(),
            publisher: OnceCell::new(),
            generation_timeout: Duration::from_secs(config.timeouts.generation_secs),
            publish_timeout: Duration::from_secs(config.timeouts.publish_secs),
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Start a session and generate its first draft. Nothing is registered
    /// if generation fails.
    pub async fn create_session(&self, spec: Spec) -> Result<SessionView> {
        if spec.topic.trim().is_empty() {
            return Err(WxDraftError::Validation("topic is required".into()));
        }
        let id = Uuid::new_v4().to_string();
        let mut session = Session::new(id.clone(), spec, self.agent.clone());

        with_deadline("generation", self.generation_timeout, session.propose()).await?;

        let view = SessionView::of(&session);
        self.store.set(id.clone(), session);
        tracing::info!(session = %id, "session created");
        Ok(view)
    }

    pub async fn revise_session(&self, id: &str, comment: &str) -> Result<SessionView> {
        let handle = self.lookup(id)?;
        let mut session = handle.lock().await;
        with_deadline("revision", self.generation_timeout, session.revise(comment)).await?;
        Ok(SessionView::of(&session))
    }

    /// Current state without generating anything.
    pub async fn view(&self, id: &str) -> Result<SessionView> {
        let handle = self.lookup(id)?;
        let session = handle.lock().await;
        Ok(SessionView::of(&session))
    }

    pub fn heartbeat(&self, id: &str) -> Result<()> {
        if self.store.heartbeat(id) {
            Ok(())
        } else {
            Err(not_found(id))
        }
    }

    pub fn delete_session(&self, id: &str) -> bool {
        self.store.delete(id)
    }

    /// Remove `path` along with the session when it ends.
    pub fn track_upload(&self, id: &str, path: impl Into<PathBuf>) -> Result<()> {
        let path = path.into();
        if path.as_os_str().is_empty() {
            return Err(WxDraftError::Validation("upload path is empty".into()));
        }
        if self.store.add_upload(id, &path) {
            Ok(())
        } else {
            Err(not_found(id))
        }
    }

    /// Publish a session's current draft to the draft box.
    pub async fn publish_session(&self, request: PublishRequest) -> Result<PublishOutcome> {
        let id = request.session_id.trim();
        if id.is_empty() {
            return Err(WxDraftError::Validation("session_id is required".into()));
        }
        let handle = self.lookup(id)?;
        let (draft, topic) = {
            let session = handle.lock().await;
            (
                session.draft().cloned().unwrap_or_default(),
                session.spec().topic.clone(),
            )
        };
        if draft.markdown.trim().is_empty() {
            return Err(WxDraftError::Validation(
                "draft is empty; generate first".into(),
            ));
        }

        let cover_path = self.resolve_cover(request.cover_path)?;
        let title = first_non_empty([request.title.as_str(), draft.title.as_str(), topic.as_str()]);
        let digest = first_non_empty([request.digest.as_str(), draft.digest.as_str()]);

        let mut file = tempfile::Builder::new()
            .prefix("draft-")
            .suffix(".md")
            .tempfile()?;
        file.write_all(draft.markdown.as_bytes())?;
        file.flush()?;

        let params = PublishParams {
            markdown_path: file.path().to_path_buf(),
            title: title.clone(),
            cover_path: cover_path.clone(),
            author: request.author,
            digest,
        };
        let media_id = with_deadline("publish", self.publish_timeout, async {
            let publisher = self.publisher().await?;
            publisher.publish_draft(&params).await
        })
        .await?;

        if let Err(e) = file.close() {
            tracing::warn!("failed to remove temporary markdown: {e}");
        }
        tracing::info!(session = %id, media_id = %media_id, "session published");
        Ok(PublishOutcome {
            media_id,
            title,
            cover_path,
        })
    }

    fn lookup(&self, id: &str) -> Result<SessionHandle> {
        self.store.get(id).ok_or_else(|| not_found(id))
    }

    fn resolve_cover(&self, requested: Option<PathBuf>) -> Result<PathBuf> {
        let cover = match requested.filter(|p| !p.as_os_str().is_empty()) {
            Some(path) => path,
            None => match &self.wechat.default_cover {
                Some(fallback) if fallback.exists() => fallback.clone(),
                _ => return Err(WxDraftError::Validation("cover_path is required".into())),
            },
        };
        if !cover.exists() {
            return Err(WxDraftError::Validation(format!(
                "cover_path not found: {}",
                cover.display()
            )));
        }
        Ok(cover)
    }

    async fn publisher(&self) -> Result<&Publisher> {
        self.publisher
            .get_or_try_init(|| async {
                self.wechat.validate()?;
                let credentials = Credentials {
                    app_id: self.wechat.app_id.clone(),
                    app_secret: self.wechat.app_secret.clone(),
                };
                Publisher::connect(credentials, self.api.clone()).await
            })
            .await
    }
}

fn not_found(id: &str) -> WxDraftError {
    WxDraftError::SessionNotFound { id: id.to_string() }
}

fn first_non_empty<const N: usize>(candidates: [&str; N]) -> String {
    candidates
        .iter()
        .map(|s| s.trim())
        .find(|s| !s.is_empty())
        .unwrap_or_default()
        .to_string()
}

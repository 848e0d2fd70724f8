// src/publisher/mod.rs — Markdown file -> WeChat draft box

pub mod images;
pub mod normalize;
pub mod token;
pub mod wechat;

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::infra::errors::{Result, WxDraftError};
use images::{replace_markdown_images, ImageUploader};
use token::TokenCache;
use wechat::{Article, Credentials, WeChatApi};

/// Fallback digests are cut to this many characters.
pub const DIGEST_LIMIT: usize = 120;

#[derive(Debug, Clone, Default)]
pub struct PublishParams {
    pub markdown_path: PathBuf,
    pub title: String,
    pub cover_path: PathBuf,
    pub author: String,
    /// Empty means derive one from the body.
    pub digest: String,
}

impl PublishParams {
    fn validate(&self) -> Result<()> {
        if self.markdown_path.as_os_str().is_empty() {
            return Err(WxDraftError::Validation("markdown path is required".into()));
        }
        if self.title.trim().is_empty() {
            return Err(WxDraftError::Validation("title is required".into()));
        }
        if self.cover_path.as_os_str().is_empty() {
            return Err(WxDraftError::Validation("cover path is required".into()));
        }
        Ok(())
    }
}

/// Whitespace-collapsed body, cut to `limit` characters.
pub fn default_digest(markdown: &str, limit: usize) -> String {
    let joined = markdown.split_whitespace().collect::<Vec<_>>().join(" ");
    match joined.char_indices().nth(limit) {
        Some((end, _)) => joined[..end].to_string(),
        None => joined,
    }
}

/// Content-image uploads with the publisher's cached token.
struct ContentImageUploader<'a> {
    api: &'a dyn WeChatApi,
    tokens: &'a TokenCache,
}

#[async_trait]
impl ImageUploader for ContentImageUploader<'_> {
    async fn upload(&self, path: &Path) -> Result<String> {
        let token = self.tokens.get().await?;
        self.api.upload_content_image(&token, path).await
    }
}

/// Publishes Markdown articles to one Official Account.
pub struct Publisher {
    api: Arc<dyn WeChatApi>,
    tokens: TokenCache,
}

impl Publisher {
    /// Exchange credentials for an access token up front.
    pub async fn connect(credentials: Credentials, api: Arc<dyn WeChatApi>) -> Result<Self> {
        if credentials.app_id.trim().is_empty() || credentials.app_secret.trim().is_empty() {
            return Err(WxDraftError::Config(
                "wechat app_id and app_secret are required".into(),
            ));
        }
        let tokens = TokenCache::fetch(api.clone(), credentials).await?;
        tracing::info!("wechat access token acquired");
        Ok(Self { api, tokens })
    }

    /// Run the full pipeline and return the draft's media id.
    ///
    /// Steps run strictly in order and the first failure aborts the rest.
    /// Anything already uploaded stays on the platform.
    pub async fn publish_draft(&self, params: &PublishParams) -> Result<String> {
        params.validate()?;

        let markdown = tokio::fs::read_to_string(&params.markdown_path)
            .await
            .map_err(|e| WxDraftError::file(&params.markdown_path, e))?;
        tracing::debug!(
            bytes = markdown.len(),
            "read markdown {}",
            params.markdown_path.display()
        );

        let digest = if params.digest.trim().is_empty() {
            default_digest(&markdown, DIGEST_LIMIT)
        } else {
            params.digest.clone()
        };

        let uploader = ContentImageUploader {
            api: self.api.as_ref(),
            tokens: &self.tokens,
        };
        let markdown = replace_markdown_images(&markdown, &params.markdown_path, &uploader).await?;

        let html = normalize::markdown_to_html(&markdown);
        let content = normalize::normalize_for_wechat(&html);
        tracing::debug!(html_bytes = content.len(), "article html ready");

        let token = self.tokens.get().await?;
        let thumb_media_id = self.api.upload_material(&token, &params.cover_path).await?;
        tracing::info!(thumb_media_id = %thumb_media_id, "cover uploaded");

        let article = Article {
            title: params.title.clone(),
            author: params.author.clone(),
            digest,
            content,
            thumb_media_id,
            need_open_comment: 0,
            only_fans_can_comment: 0,
        };
        let token = self.tokens.get().await?;
        let media_id = self.api.add_draft(&token, &article).await?;
        tracing::info!(media_id = %media_id, title = %article.title, "draft created");
        Ok(media_id)
    }
}

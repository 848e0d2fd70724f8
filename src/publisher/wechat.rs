// src/publisher/wechat.rs — WeChat Official Account REST client
//
// Endpoints under https://api.weixin.qq.com/cgi-bin. Every response shares
// one convention: the success field is absent or empty and `errcode` /
// `errmsg` explain why.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::infra::errors::{Result, WxDraftError};

pub const DEFAULT_API_BASE: &str = "https://api.weixin.qq.com";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
/// Lifetime the platform documents for access tokens.
const DEFAULT_TOKEN_TTL_SECS: u64 = 7200;

/// App credentials for the token exchange.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub app_id: String,
    pub app_secret: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IssuedToken {
    pub token: String,
    pub expires_in: Duration,
}

/// One entry of the draft-box `articles` array.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Article {
    pub title: String,
    pub author: String,
    pub digest: String,
    pub content: String,
    pub thumb_media_id: String,
    pub need_open_comment: u8,
    pub only_fans_can_comment: u8,
}

#[derive(Serialize)]
struct AddDraftPayload<'a> {
    articles: [&'a Article; 1],
}

/// Platform operations the publisher depends on.
#[async_trait]
pub trait WeChatApi: Send + Sync {
    async fn fetch_token(&self, credentials: &Credentials) -> Result<IssuedToken>;

    /// Permanent material upload; returns the media id used as a cover.
    async fn upload_material(&self, access_token: &str, path: &Path) -> Result<String>;

    /// Body image upload; returns the hosted URL.
    async fn upload_content_image(&self, access_token: &str, path: &Path) -> Result<String>;

    /// Create a draft; returns its media id.
    async fn add_draft(&self, access_token: &str, article: &Article) -> Result<String>;
}

#[derive(Debug, Default, Deserialize)]
struct Envelope {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    expires_in: Option<u64>,
    #[serde(default)]
    media_id: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    errcode: i64,
    #[serde(default)]
    errmsg: String,
}

impl Envelope {
    fn require(field: Option<String>, fail: impl FnOnce() -> WxDraftError) -> Result<String> {
        field.filter(|v| !v.is_empty()).ok_or_else(fail)
    }

    fn platform_error(&self, step: &'static str) -> WxDraftError {
        WxDraftError::Platform {
            step,
            code: self.errcode,
            message: self.errmsg.clone(),
        }
    }
}

pub struct WeChatClient {
    http: Client,
    base: String,
}

impl WeChatClient {
    pub fn new(base: Option<String>) -> Result<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|source| WxDraftError::Http {
                step: "client setup",
                source,
            })?;
        Ok(Self::with_client(http, base))
    }

    pub fn with_client(http: Client, base: Option<String>) -> Self {
        Self {
            http,
            base: base
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
                .trim_end_matches('/')
                .to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/cgi-bin/{}", self.base, path)
    }

    async fn decode(step: &'static str, response: reqwest::Response) -> Result<Envelope> {
        response
            .json::<Envelope>()
            .await
            .map_err(|source| WxDraftError::Http { step, source })
    }

    async fn image_form(path: &Path) -> Result<Form> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| WxDraftError::file(path, e))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "image".to_string());
        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(content_type(path))
            .map_err(|source| WxDraftError::Http {
                step: "multipart",
                source,
            })?;
        Ok(Form::new().part("media", part))
    }

    async fn post_image(
        &self,
        step: &'static str,
        endpoint: &str,
        query: &[(&str, &str)],
        path: &Path,
    ) -> Result<Envelope> {
        let form = Self::image_form(path).await?;
        let response = self
            .http
            .post(self.url(endpoint))
            .query(query)
            .multipart(form)
            .send()
            .await
            .map_err(|source| WxDraftError::Http { step, source })?;
        Self::decode(step, response).await
    }
}

#[async_trait]
impl WeChatApi for WeChatClient {
    async fn fetch_token(&self, credentials: &Credentials) -> Result<IssuedToken> {
        let response = self
            .http
            .get(self.url("token"))
            .query(&[
                ("grant_type", "client_credential"),
                ("appid", credentials.app_id.as_str()),
                ("secret", credentials.app_secret.as_str()),
            ])
            .send()
            .await
            .map_err(token_transport_error)?;
        let env = response
            .json::<Envelope>()
            .await
            .map_err(token_transport_error)?;
        let code = env.errcode;
        let message = env.errmsg.clone();
        let token = Envelope::require(env.access_token, || WxDraftError::Auth { code, message })?;
        Ok(IssuedToken {
            token,
            expires_in: Duration::from_secs(env.expires_in.unwrap_or(DEFAULT_TOKEN_TTL_SECS)),
        })
    }

    async fn upload_material(&self, access_token: &str, path: &Path) -> Result<String> {
        let step = "upload cover";
        let env = self
            .post_image(
                step,
                "material/add_material",
                &[("access_token", access_token), ("type", "image")],
                path,
            )
            .await?;
        let err = env.platform_error(step);
        Envelope::require(env.media_id, || err)
    }

    async fn upload_content_image(&self, access_token: &str, path: &Path) -> Result<String> {
        let step = "upload content image";
        let env = self
            .post_image(step, "media/uploadimg", &[("access_token", access_token)], path)
            .await?;
        let err = env.platform_error(step);
        Envelope::require(env.url, || err)
    }

    async fn add_draft(&self, access_token: &str, article: &Article) -> Result<String> {
        let step = "add draft";
        let response = self
            .http
            .post(self.url("draft/add"))
            .query(&[("access_token", access_token)])
            .json(&AddDraftPayload {
                articles: [article],
            })
            .send()
            .await
            .map_err(|source| WxDraftError::Http { step, source })?;
        let env = Self::decode(step, response).await?;
        let err = env.platform_error(step);
        Envelope::require(env.media_id, || err)
    }
}

fn content_type(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|s| s.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("bmp") => "image/bmp",
        Some("webp") => "image/webp",
        _ => "image/jpeg",
    }
}

/// Any failure to obtain a token is an authentication failure.
fn token_transport_error(source: reqwest::Error) -> WxDraftError {
    WxDraftError::Auth {
        code: -1,
        message: format!("token request failed: {source}"),
    }
}

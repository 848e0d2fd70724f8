// src/infra/config.rs — Configuration loading (TOML)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::infra::errors::{Result, WxDraftError};
use crate::infra::paths;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub wechat: WeChatConfig,

    /// Language model settings. Required for drafting, not for publishing.
    #[serde(default)]
    pub llm: Option<LlmConfig>,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub timeouts: TimeoutConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeChatConfig {
    #[serde(default)]
    pub app_id: String,
    #[serde(default)]
    pub app_secret: String,
    /// Override for the platform host, e.g. a local mock.
    pub api_base: Option<String>,
    /// Cover used when a publish request names none.
    pub default_cover: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    pub provider: String,
    #[serde(default)]
    pub model: String,
    /// Env var holding the API key. Defaults per provider.
    pub api_key_env: Option<String>,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    /// Output cap per completion; provider default when unset.
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub ttl_secs: u64,
    pub sweep_interval_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 300,
            sweep_interval_secs: 60,
        }
    }
}

impl SessionConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs.max(1))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    pub generation_secs: u64,
    pub publish_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            generation_secs: 60,
            publish_secs: 60,
        }
    }
}

impl WeChatConfig {
    /// App credentials are mandatory before any platform call.
    pub fn validate(&self) -> Result<()> {
        if self.app_id.trim().is_empty() || self.app_secret.trim().is_empty() {
            return Err(WxDraftError::Config(
                "config must include wechat.app_id and wechat.app_secret".into(),
            ));
        }
        Ok(())
    }
}

impl Config {
    /// Load config from the default location, falling back to defaults.
    pub fn load() -> anyhow::Result<Self> {
        let path = paths::config_file_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            tracing::debug!("no config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn llm(&self) -> Result<&LlmConfig> {
        self.llm.as_ref().filter(|l| !l.provider.is_empty()).ok_or_else(|| {
            WxDraftError::Config(
                "llm config missing; set llm.provider and llm.model in config.toml".into(),
            )
        })
    }
}

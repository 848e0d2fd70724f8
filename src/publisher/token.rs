// src/publisher/token.rs — Cached access token with single-flight refresh

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;

use super::wechat::{Credentials, WeChatApi};
use crate::infra::errors::Result;

/// Refresh this long before the platform-reported expiry.
const REFRESH_MARGIN: Duration = Duration::from_secs(300);

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    refresh_at: Instant,
}

/// Owns the app's access token. Concurrent callers that find it stale wait
/// on one refresh instead of issuing their own.
pub struct TokenCache {
    api: Arc<dyn WeChatApi>,
    credentials: Credentials,
    current: Mutex<CachedToken>,
}

impl TokenCache {
    /// Exchange credentials immediately; fails if the platform refuses them.
    pub async fn fetch(api: Arc<dyn WeChatApi>, credentials: Credentials) -> Result<Self> {
        let current = Self::exchange(api.as_ref(), &credentials).await?;
        Ok(Self {
            api,
            credentials,
            current: Mutex::new(current),
        })
    }

    async fn exchange(api: &dyn WeChatApi, credentials: &Credentials) -> Result<CachedToken> {
        let issued = api.fetch_token(credentials).await?;
        let lifetime = issued.expires_in.saturating_sub(REFRESH_MARGIN);
        tracing::debug!(expires_in = issued.expires_in.as_secs(), "access token issued");
        Ok(CachedToken {
            value: issued.token,
            refresh_at: Instant::now() + lifetime,
        })
    }

    /// A token valid for at least the refresh margin, refreshing if needed.
    pub async fn get(&self) -> Result<String> {
        let mut current = self.current.lock().await;
        if Instant::now() >= current.refresh_at {
            tracing::info!("access token stale, refreshing");
            *current = Self::exchange(self.api.as_ref(), &self.credentials).await?;
        }
        Ok(current.value.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::errors::WxDraftError;
    use crate::publisher::wechat::{Article, IssuedToken};
    use async_trait::async_trait;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// The first token it issues is already stale; later ones last two hours.
    struct CountingApi {
        issued: AtomicUsize,
        first_stale: bool,
    }

    #[async_trait]
    impl WeChatApi for CountingApi {
        async fn fetch_token(&self, _c: &Credentials) -> Result<IssuedToken> {
            let n = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
            tokio::time::sleep(Duration::from_millis(10)).await;
            let expires_in = if n == 1 && self.first_stale {
                Duration::ZERO
            } else {
                Duration::from_secs(7200)
            };
            Ok(IssuedToken {
                token: format!("t{n}"),
                expires_in,
            })
        }
        async fn upload_material(&self, _t: &str, _p: &Path) -> Result<String> {
            Err(WxDraftError::EmptyOutput)
        }
        async fn upload_content_image(&self, _t: &str, _p: &Path) -> Result<String> {
            Err(WxDraftError::EmptyOutput)
        }
        async fn add_draft(&self, _t: &str, _a: &Article) -> Result<String> {
            Err(WxDraftError::EmptyOutput)
        }
    }

    fn creds() -> Credentials {
        Credentials {
            app_id: "wx".into(),
            app_secret: "s".into(),
        }
    }

    #[tokio::test]
    async fn test_fresh_token_reused() {
        let api = Arc::new(CountingApi {
            issued: AtomicUsize::new(0),
            first_stale: false,
        });
        let cache = TokenCache::fetch(api.clone(), creds()).await.unwrap();
        assert_eq!(cache.get().await.unwrap(), "t1");
        assert_eq!(cache.get().await.unwrap(), "t1");
        assert_eq!(api.issued.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_stale_token_refreshed_once_for_concurrent_callers() {
        let api = Arc::new(CountingApi {
            issued: AtomicUsize::new(0),
            first_stale: true,
        });
        let cache = TokenCache::fetch(api.clone(), creds()).await.unwrap();

        let (a, b) = tokio::join!(cache.get(), cache.get());
        assert_eq!(a.unwrap(), "t2");
        assert_eq!(b.unwrap(), "t2");
        assert_eq!(api.issued.load(Ordering::SeqCst), 2);
    }
}

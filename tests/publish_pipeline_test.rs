// tests/publish_pipeline_test.rs — Integration test: publisher against a fake platform

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tempfile::TempDir;

use wxdraft::infra::errors::{Result, WxDraftError};
use wxdraft::publisher::wechat::{Article, Credentials, IssuedToken, WeChatApi};
use wxdraft::publisher::{PublishParams, Publisher, DIGEST_LIMIT};

/// Records each platform call in order; can be told to reject the cover.
#[derive(Default)]
struct FakePlatform {
    calls: Mutex<Vec<String>>,
    drafts: Mutex<Vec<Article>>,
    reject_cover: bool,
}

impl FakePlatform {
    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl WeChatApi for FakePlatform {
    async fn fetch_token(&self, credentials: &Credentials) -> Result<IssuedToken> {
        self.calls.lock().unwrap().push(format!("token:{}", credentials.app_id));
        Ok(IssuedToken {
            token: "ACCESS".into(),
            expires_in: Duration::from_secs(7200),
        })
    }

    async fn upload_material(&self, access_token: &str, path: &Path) -> Result<String> {
        assert_eq!(access_token, "ACCESS");
        self.calls.lock().unwrap().push(format!(
            "cover:{}",
            path.file_name().unwrap().to_string_lossy()
        ));
        if self.reject_cover {
            return Err(WxDraftError::Platform {
                step: "upload cover",
                code: 40007,
                message: "invalid media_id".into(),
            });
        }
        Ok("THUMB".into())
    }

    async fn upload_content_image(&self, _token: &str, path: &Path) -> Result<String> {
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        self.calls.lock().unwrap().push(format!("image:{name}"));
        Ok(format!("https://mmbiz.qpic.cn/mmbiz_png/{name}"))
    }

    async fn add_draft(&self, _token: &str, article: &Article) -> Result<String> {
        self.calls.lock().unwrap().push("draft".into());
        self.drafts.lock().unwrap().push(article.clone());
        Ok("MEDIA".into())
    }
}

fn credentials() -> Credentials {
    Credentials {
        app_id: "wx-app".into(),
        app_secret: "secret".into(),
    }
}

fn write_markdown(dir: &TempDir, body: &str) -> std::path::PathBuf {
    let path = dir.path().join("article.md");
    std::fs::write(&path, body).unwrap();
    path
}

fn params(markdown_path: std::path::PathBuf, cover: std::path::PathBuf) -> PublishParams {
    PublishParams {
        markdown_path,
        title: "自动化实践".into(),
        cover_path: cover,
        author: "编辑部".into(),
        digest: String::new(),
    }
}

#[tokio::test]
async fn test_only_local_image_uploaded() {
    let dir = TempDir::new().unwrap();
    let md = write_markdown(&dir, "# 自动化实践\n\n![a](img1.png)\n\n![b](http://x/y.png)\n");
    let platform = Arc::new(FakePlatform::default());

    let publisher = Publisher::connect(credentials(), platform.clone()).await.unwrap();
    let media_id = publisher
        .publish_draft(&params(md, dir.path().join("cover.jpg")))
        .await
        .unwrap();

    assert_eq!(media_id, "MEDIA");
    assert_eq!(
        platform.calls(),
        vec!["token:wx-app", "image:img1.png", "cover:cover.jpg", "draft"]
    );

    let drafts = platform.drafts.lock().unwrap();
    let article = &drafts[0];
    assert!(article.content.contains("https://mmbiz.qpic.cn/mmbiz_png/img1.png"));
    assert!(article.content.contains("http://x/y.png"));
    assert_eq!(article.thumb_media_id, "THUMB");
    assert_eq!(article.need_open_comment, 0);
    assert_eq!(article.only_fans_can_comment, 0);
}

#[tokio::test]
async fn test_digest_falls_back_to_body() {
    let dir = TempDir::new().unwrap();
    let body = format!("# 标题\n\n{}", "很长的正文。".repeat(60));
    let md = write_markdown(&dir, &body);
    let platform = Arc::new(FakePlatform::default());

    let publisher = Publisher::connect(credentials(), platform.clone()).await.unwrap();
    publisher
        .publish_draft(&params(md, dir.path().join("cover.jpg")))
        .await
        .unwrap();

    let digest = platform.drafts.lock().unwrap()[0].digest.clone();
    assert_eq!(digest.chars().count(), DIGEST_LIMIT);
    assert!(digest.starts_with("# 标题 很长的正文。"));
}

#[tokio::test]
async fn test_caller_digest_wins() {
    let dir = TempDir::new().unwrap();
    let md = write_markdown(&dir, "# T\n\nbody");
    let platform = Arc::new(FakePlatform::default());

    let publisher = Publisher::connect(credentials(), platform.clone()).await.unwrap();
    let mut p = params(md, dir.path().join("cover.jpg"));
    p.digest = "一句话摘要".into();
    publisher.publish_draft(&p).await.unwrap();

    assert_eq!(platform.drafts.lock().unwrap()[0].digest, "一句话摘要");
}

#[tokio::test]
async fn test_cover_failure_aborts_before_draft() {
    let dir = TempDir::new().unwrap();
    let md = write_markdown(&dir, "# T\n\n![x](local.png)\n");
    let platform = Arc::new(FakePlatform {
        reject_cover: true,
        ..Default::default()
    });

    let publisher = Publisher::connect(credentials(), platform.clone()).await.unwrap();
    let err = publisher
        .publish_draft(&params(md, dir.path().join("cover.jpg")))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        WxDraftError::Platform {
            step: "upload cover",
            code: 40007,
            ..
        }
    ));
    // The inline image stays uploaded; nothing is rolled back.
    assert_eq!(
        platform.calls(),
        vec!["token:wx-app", "image:local.png", "cover:cover.jpg"]
    );
    assert!(platform.drafts.lock().unwrap().is_empty());
}

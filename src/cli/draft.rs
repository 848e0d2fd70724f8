// src/cli/draft.rs — Generate, revise and optionally publish one article

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::DraftArgs;
use crate::core::agent::Agent;
use crate::core::postprocess::extract_digest;
use crate::core::service::{DraftService, PublishRequest};
use crate::core::types::Spec;
use crate::infra::config::Config;
use crate::provider::resolver::build_provider;
use crate::publisher::wechat::WeChatClient;

pub async fn run_draft(args: DraftArgs, config: &Config) -> anyhow::Result<()> {
    let llm = config.llm()?;
    let resolved = build_provider(llm)?;
    eprintln!("[model] {} / {}", resolved.provider.id(), resolved.model);
    let agent = Arc::new(
        Agent::new(resolved.provider, resolved.model)
            .with_sampling(llm.max_tokens, llm.temperature),
    );
    let api = Arc::new(WeChatClient::new(config.wechat.api_base.clone())?);
    let service = DraftService::new(agent, api, config);
    let cancel = CancellationToken::new();
    let sweeper = service
        .store()
        .spawn_sweeper(config.session.sweep_interval(), cancel.clone());

    let result = drive(&service, args).await;

    cancel.cancel();
    if let Err(e) = sweeper.await {
        tracing::warn!("session sweeper ended abnormally: {e}");
    }
    result
}

async fn drive(service: &DraftService, args: DraftArgs) -> anyhow::Result<()> {
    let spec = Spec {
        topic: args.topic,
        outline: args.outline,
        words: args.words,
        constraints: args.constraints,
        style: args.style,
    };

    let mut view = service.create_session(spec).await?;
    eprintln!("[draft] {}", view.draft.title);

    for (i, comment) in args.revisions.iter().enumerate() {
        view = service.revise_session(&view.session_id, comment).await?;
        eprintln!(
            "[revise {}/{}] {}",
            i + 1,
            args.revisions.len(),
            view.draft.title
        );
    }

    let preview = extract_digest(&view.draft.markdown);
    if !preview.is_empty() {
        eprintln!("[preview] {preview}");
    }

    match &args.out {
        Some(path) => {
            tokio::fs::write(path, &view.draft.markdown).await?;
            eprintln!("[out] {}", path.display());
        }
        None => println!("{}", view.draft.markdown),
    }

    if args.publish {
        let outcome = service
            .publish_session(PublishRequest {
                session_id: view.session_id.clone(),
                cover_path: args.cover,
                author: args.author,
                ..Default::default()
            })
            .await?;
        eprintln!(
            "[publish] \"{}\" -> {} (cover {})",
            outcome.title,
            outcome.media_id,
            outcome.cover_path.display()
        );
    }

    service.delete_session(&view.session_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::errors::Result;
    use crate::provider::mock::MockProvider;
    use crate::publisher::wechat::{Article, Credentials, IssuedToken, WeChatApi};
    use async_trait::async_trait;
    use std::path::Path;
    use tempfile::TempDir;

    struct NoPlatform;

    #[async_trait]
    impl WeChatApi for NoPlatform {
        async fn fetch_token(&self, _c: &Credentials) -> Result<IssuedToken> {
            panic!("platform must not be reached");
        }
        async fn upload_material(&self, _t: &str, _p: &Path) -> Result<String> {
            panic!("platform must not be reached");
        }
        async fn upload_content_image(&self, _t: &str, _p: &Path) -> Result<String> {
            panic!("platform must not be reached");
        }
        async fn add_draft(&self, _t: &str, _a: &Article) -> Result<String> {
            panic!("platform must not be reached");
        }
    }

    #[tokio::test]
    async fn test_drive_writes_final_draft_to_out() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("article.md");
        let agent = Arc::new(Agent::new(Arc::new(MockProvider), "mock"));
        let service = DraftService::new(agent, Arc::new(NoPlatform), &Config::default());

        drive(
            &service,
            DraftArgs {
                topic: "自动化".into(),
                outline: vec![],
                words: 200,
                constraints: vec![],
                style: String::new(),
                revisions: vec!["更短".into()],
                out: Some(out.clone()),
                publish: false,
                cover: None,
                author: String::new(),
            },
        )
        .await
        .unwrap();

        let written = std::fs::read_to_string(&out).unwrap();
        assert!(!written.trim().is_empty());
        assert!(service.store().is_empty());
    }
}

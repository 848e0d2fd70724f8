// src/cli/publish.rs — Publish a local Markdown file

use std::sync::Arc;

use super::PublishArgs;
use crate::infra::config::Config;
use crate::infra::deadline::with_deadline;
use crate::publisher::wechat::{Credentials, WeChatClient};
use crate::publisher::{PublishParams, Publisher};

pub async fn run_publish(args: PublishArgs, config: &Config) -> anyhow::Result<()> {
    config.wechat.validate()?;
    let api = Arc::new(WeChatClient::new(config.wechat.api_base.clone())?);
    let credentials = Credentials {
        app_id: config.wechat.app_id.clone(),
        app_secret: config.wechat.app_secret.clone(),
    };

    let params = PublishParams {
        markdown_path: args.md,
        title: args.title,
        cover_path: args.cover,
        author: args.author,
        digest: args.digest,
    };
    let limit = std::time::Duration::from_secs(config.timeouts.publish_secs);
    let media_id = with_deadline("publish", limit, async {
        let publisher = Publisher::connect(credentials, api).await?;
        publisher.publish_draft(&params).await
    })
    .await?;

    eprintln!("[publish] draft created");
    println!("{media_id}");
    Ok(())
}

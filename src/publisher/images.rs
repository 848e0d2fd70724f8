// src/publisher/images.rs — Swap local Markdown image references for hosted URLs

use async_trait::async_trait;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::infra::errors::Result;

/// Uploads one local image and returns the URL it is served from.
#[async_trait]
pub trait ImageUploader: Send + Sync {
    async fn upload(&self, path: &Path) -> Result<String>;
}

fn image_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"!\[[^\]]*\]\(([^)]+)\)").expect("image pattern is valid"))
}

/// Already hosted or embedded; passed through untouched.
pub fn is_remote(reference: &str) -> bool {
    reference.starts_with("http://")
        || reference.starts_with("https://")
        || reference.starts_with("data:")
}

/// Absolute or existing paths are used as-is; anything else is taken
/// relative to the Markdown file's directory.
pub fn resolve_local_path(reference: &str, markdown_path: &Path) -> PathBuf {
    let candidate = PathBuf::from(reference);
    if candidate.is_absolute() || candidate.exists() {
        return candidate;
    }
    markdown_path
        .parent()
        .map(|dir| dir.join(reference))
        .unwrap_or(candidate)
}

/// Upload every local image in `markdown` and rewrite its link target.
///
/// References are processed left to right and each occurrence is uploaded,
/// duplicates included. The first failed upload aborts the whole rewrite.
pub async fn replace_markdown_images(
    markdown: &str,
    markdown_path: &Path,
    uploader: &dyn ImageUploader,
) -> Result<String> {
    let mut out = String::with_capacity(markdown.len());
    let mut last = 0;
    let mut uploaded = 0usize;

    for caps in image_re().captures_iter(markdown) {
        let Some(target) = caps.get(1) else { continue };
        out.push_str(&markdown[last..target.start()]);
        last = target.end();

        let reference = target.as_str().trim();
        if is_remote(reference) {
            out.push_str(reference);
            continue;
        }

        let local = resolve_local_path(reference, markdown_path);
        let url = uploader.upload(&local).await?;
        tracing::debug!("uploaded inline image {} -> {url}", local.display());
        out.push_str(&url);
        uploaded += 1;
    }
    out.push_str(&markdown[last..]);

    if uploaded > 0 {
        tracing::info!(uploaded, "inline images uploaded");
    }
    Ok(out)
}

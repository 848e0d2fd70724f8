// src/core/postprocess.rs — Turn raw model output into a Draft

use regex::Regex;
use std::sync::OnceLock;

use super::types::{Draft, Spec};
use crate::infra::errors::{Result, WxDraftError};

fn title_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^#\s+(.+)$").expect("title pattern is valid"))
}

/// Validate and shape model output.
///
/// The digest stays empty; the publisher derives a bounded one at publish
/// time (over-long digests fail with errcode 45004).
pub fn post_process(raw: &str, _spec: &Spec) -> Result<Draft> {
    let markdown = raw.trim();
    if markdown.is_empty() {
        return Err(WxDraftError::EmptyOutput);
    }

    Ok(Draft {
        title: extract_title(markdown),
        digest: String::new(),
        markdown: markdown.to_string(),
        ..Default::default()
    })
}

/// Text of the first `# ` heading line anywhere in the document.
pub fn extract_title(markdown: &str) -> String {
    title_re()
        .captures(markdown)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

/// First non-heading, non-blank line. Used for previews only.
pub fn extract_digest(markdown: &str) -> String {
    markdown
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty() && !line.starts_with('#'))
        .unwrap_or("")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_title_from_first_h1() {
        let d = post_process("# 自动化实践\n\n正文内容", &Spec::default()).unwrap();
        assert_eq!(d.title, "自动化实践");
        assert_eq!(d.digest, "");
    }

    #[test]
    fn test_title_found_after_preamble() {
        let raw = "好的，以下是文章：\n\n#   标题在中间  \n\n## 小节";
        assert_eq!(extract_title(raw), "标题在中间");
    }

    #[test]
    fn test_h2_is_not_a_title() {
        let d = post_process("## 只有二级标题\n内容", &Spec::default()).unwrap();
        assert_eq!(d.title, "");
    }

    #[test]
    fn test_no_heading_empty_title() {
        let d = post_process("just prose", &Spec::default()).unwrap();
        assert_eq!(d.title, "");
        assert_eq!(d.markdown, "just prose");
    }

    #[test]
    fn test_empty_output_rejected() {
        for raw in ["", "   ", "\n\t\n"] {
            let err = post_process(raw, &Spec::default()).unwrap_err();
            assert!(matches!(err, WxDraftError::EmptyOutput));
        }
    }

    #[test]
    fn test_markdown_trimmed_but_structure_kept() {
        let raw = "\n\n# A\n\n## one\n\n## two\n\n## three\n\n";
        let d = post_process(raw, &Spec::default()).unwrap();
        assert_eq!(d.markdown, "# A\n\n## one\n\n## two\n\n## three");
        assert_eq!(d.markdown.matches("\n## ").count(), 3);
    }

    #[test]
    fn test_extract_digest_skips_headings() {
        let md = "# 标题\n\n## 小节\n\n第一段内容。\n第二行";
        assert_eq!(extract_digest(md), "第一段内容。");
    }
}

// src/core/prompt.rs — Assembles system/user prompts for drafting and revision

use super::style::resolve_style;
use super::types::{Draft, Prompt, Spec, Turn};
use crate::provider::Message;

/// Prompt for the first draft of an article.
///
/// System text, in order: output contract, length target, style preset,
/// extra constraints, title requirement, outline as background.
pub fn build_initial_prompt(spec: &Spec) -> Prompt {
    let mut system = String::with_capacity(2048);
    system.push_str("你是一名专业中文内容创作者，请直接输出 Markdown，不要额外解释。\n");
    system.push_str("要求：\n");
    if spec.words > 0 {
        system.push_str(&format!("- 目标字数约 {} 字（允许 ±15%）。\n", spec.words));
    }

    let style_key = append_style_section(&mut system, &spec.style);
    append_constraints_section(&mut system, &spec.constraints);

    system.push_str("- 必须包含一级标题作为文章标题。\n");
    if !spec.outline.is_empty() {
        system.push_str("- 结合以下背景信息进行写作：\n");
        for (i, item) in spec.outline.iter().enumerate() {
            system.push_str(&format!("  {}. {}\n", i + 1, item));
        }
    }
    system.push_str("请严格遵守以上要求和 Markdown 结构，禁止额外说明。\n");

    let user = format!(
        "主题：{}\n请输出符合上述要求的完整 Markdown。",
        spec.topic
    );

    tracing::debug!(
        style = style_key,
        constraints = spec.constraints.len(),
        "built initial prompt\nsystem:\n{system}\nuser:\n{user}"
    );

    Prompt {
        system,
        user,
        history: Vec::new(),
    }
}

/// Prompt for revising `previous` according to `comment`.
///
/// Earlier turns that carried a comment are replayed as user messages so the
/// model sees the feedback trail; the current draft travels only in `user`.
pub fn build_revision_prompt(spec: &Spec, previous: &Draft, comment: &str, history: &[Turn]) -> Prompt {
    let mut system = String::with_capacity(2048);
    system.push_str("你是一名专业编辑，基于用户反馈对稿件做最小必要改动，保持 Markdown 结构。\n");
    system.push_str("- 维持标题层级和列表格式。\n");
    system.push_str("- 如果反馈无效或不合理，说明原因并保持原文。\n");

    let style_key = append_style_section(&mut system, &spec.style);
    append_constraints_section(&mut system, &spec.constraints);

    let user = format!(
        "当前稿件：\n{}\n\n用户反馈：{}\n请输出修订后的完整 Markdown。",
        previous.markdown, comment
    );

    let history: Vec<Message> = history
        .iter()
        .filter(|t| !t.comment.is_empty())
        .map(|t| Message::user(t.comment.clone()))
        .collect();

    tracing::debug!(
        style = style_key,
        constraints = spec.constraints.len(),
        history = history.len(),
        "built revision prompt"
    );

    Prompt {
        system,
        user,
        history,
    }
}

// ─── Section builders ───────────────────────────────────────────────────────

/// Returns the effective style key for logging.
fn append_style_section<'a>(prompt: &mut String, style: &'a str) -> &'a str {
    let (key, text) = resolve_style(style);
    if let Some(text) = text.map(str::trim).filter(|t| !t.is_empty()) {
        prompt.push_str("风格预设：\n");
        prompt.push_str(text);
        prompt.push('\n');
    }
    key
}

fn append_constraints_section(prompt: &mut String, constraints: &[String]) {
    if constraints.is_empty() {
        return;
    }
    prompt.push_str("额外约束：\n");
    for c in constraints {
        prompt.push_str(&format!("- {}\n", c));
    }
}

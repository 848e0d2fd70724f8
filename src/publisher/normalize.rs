// src/publisher/normalize.rs — Markdown -> HTML, then WeChat layout fixes
//
// The draft-box renderer drops heading styles and collapses native list
// numbering, so headings become sized paragraphs and list items become
// one paragraph each.

use pulldown_cmark::{html, Options, Parser};
use regex::{Captures, Regex};
use std::sync::OnceLock;

/// Inline font sizes for h1..h6.
const HEADING_SIZES: [&str; 6] = ["24px", "22px", "20px", "18px", "16px", "15px"];
const BULLET: &str = "•";

fn heading_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)<h([1-6])[^>]*>(.*?)</h[1-6]>").expect("heading pattern is valid")
    })
}

fn list_open_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<(ol|ul)(\s[^>]*)?>").expect("list open pattern is valid"))
}

fn list_close_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"</(?:ol|ul)>").expect("list close pattern is valid"))
}

fn start_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"start="?(\d+)"?"#).expect("start pattern is valid"))
}

fn item_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<li[^>]*>(.*?)</li>").expect("li pattern is valid"))
}

fn paragraph_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<p[\s>]").expect("p pattern is valid"))
}

/// Render CommonMark (plus tables, footnotes, strikethrough, task lists) to HTML.
pub fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(markdown, options);
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

/// Apply every WeChat fix. Idempotent.
pub fn normalize_for_wechat(html: &str) -> String {
    let html = convert_headings(html);
    flatten_lists(&html)
}

/// `<hN>text</hN>` -> bold paragraph with the level's font size.
pub fn convert_headings(html: &str) -> String {
    heading_re()
        .replace_all(html, |caps: &Captures| {
            let level: usize = caps[1].parse().unwrap_or(4);
            let size = HEADING_SIZES.get(level.wrapping_sub(1)).copied().unwrap_or("18px");
            format!(
                r#"<p style="font-size:{};font-weight:700;margin:1em 0 0.6em;">{}</p>"#,
                size,
                caps[2].trim()
            )
        })
        .into_owned()
}

/// Ordered items become `<p>n. text</p>`, unordered items `<p>• text</p>`.
///
/// Lists are rewritten innermost first: the first closing tag always belongs
/// to the last list opened before it. A flattened inner list stays in order
/// right after its parent item's paragraph. Ordered lists honour `start`.
pub fn flatten_lists(html: &str) -> String {
    let mut out = html.to_string();
    while let Some(close) = list_close_re().find(&out) {
        let (close_start, close_end) = (close.start(), close.end());
        let open = list_open_re()
            .captures_iter(&out[..close_start])
            .last()
            .and_then(|caps| {
                let tag = caps.get(0)?;
                let ordered = &caps[1] == "ol";
                let start = caps
                    .get(2)
                    .and_then(|attrs| start_re().captures(attrs.as_str()))
                    .and_then(|c| c[1].parse::<usize>().ok())
                    .unwrap_or(1);
                Some((tag.start(), tag.end(), ordered, start))
            });

        let replacement = match open {
            Some((open_start, open_end, ordered, start)) => {
                let items = render_items(&out[open_end..close_start], ordered, start);
                format!("{}{}{}", &out[..open_start], items, &out[close_end..])
            }
            // Stray closing tag with nothing to close.
            None => format!("{}{}", &out[..close_start], &out[close_end..]),
        };
        out = replacement;
    }
    out
}

fn render_items(body: &str, ordered: bool, start: usize) -> String {
    let mut out = String::with_capacity(body.len() + 32);
    for (i, caps) in item_re().captures_iter(body).enumerate() {
        let marker = if ordered {
            format!("{}.", start + i)
        } else {
            BULLET.to_string()
        };
        let (lead, rest) = split_item(&caps[1]);
        if lead.is_empty() {
            out.push_str(&format!("<p>{}</p>", marker));
        } else {
            out.push_str(&format!("<p>{} {}</p>", marker, lead));
        }
        out.push_str(rest);
    }
    out
}

/// Split an item into its own text and the blocks that follow it (further
/// paragraphs, already-flattened nested lists). Loose items wrap their text
/// in a `<p>`, which is dropped.
fn split_item(content: &str) -> (&str, &str) {
    let content = content.trim();
    if let Some(after) = content.strip_prefix("<p>") {
        if let Some(end) = after.find("</p>") {
            return (after[..end].trim(), after[end + "</p>".len()..].trim());
        }
    }
    match paragraph_re().find(content) {
        Some(m) => (content[..m.start()].trim(), content[m.start()..].trim()),
        None => (content, ""),
    }
}

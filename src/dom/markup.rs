//! Escaping and lightweight formatting of chat text into markup.

use maud::{PreEscaped, html};
use regex::{Captures, Regex};
use std::sync::LazyLock;

static CODE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```([A-Za-z0-9_]+)?\n(.*?)```").expect("valid regex"));
static INLINE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`([^`]+)`").expect("valid regex"));
static LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("valid regex"));
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));

/// Text as it appears once rendered into markup.
pub fn escape_html(text: &str) -> String {
    html! { (text) }.into_string()
}

pub fn unescape_html(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Render assistant text: fenced code blocks first, then inline code and
/// links in the prose between them. Prose is escaped before either runs.
pub fn format_response(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 64);
    let mut last = 0;

    for caps in CODE_FENCE.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        out.push_str(&format_prose(&text[last..whole.start()]));

        let lang = caps.get(1).map_or("text", |m| m.as_str());
        let code = caps.get(2).map_or("", |m| m.as_str());
        let block = html! {
            div class="code-block" {
                pre { code class={ "language-" (lang) } { (code) } }
            }
        };
        out.push_str(&block.into_string());
        last = whole.end();
    }

    out.push_str(&format_prose(&text[last..]));
    out
}

fn format_prose(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let escaped = escape_html(text);
    let with_code = INLINE_CODE.replace_all(&escaped, |caps: &Captures| {
        html! { code { (PreEscaped(&caps[1])) } }.into_string()
    });
    LINK.replace_all(&with_code, |caps: &Captures| {
        // Both groups come from escaped prose.
        let label = PreEscaped(&caps[1]);
        let href = unescape_html(&caps[2]);
        if is_safe_href(&href) {
            html! { a href=(href) target="_blank" rel="noopener noreferrer" { (label) } }
                .into_string()
        } else {
            label.0.to_string()
        }
    })
    .into_owned()
}

fn is_safe_href(href: &str) -> bool {
    let lower = href.trim().to_ascii_lowercase();
    match lower.split_once(':') {
        // "/docs?a=b:c" is relative even though it has a colon.
        Some((scheme, _)) if !scheme.contains(['/', '?', '#']) => {
            matches!(scheme, "http" | "https" | "mailto")
        }
        _ => true,
    }
}

/// Strip tags and decode entities so markup can be shown on a terminal.
pub fn to_plain_text(markup: &str) -> String {
    let spaced = markup
        .replace("</div>", "</div>\n")
        .replace("<br>", "\n");
    let stripped = TAG.replace_all(&spaced, "");
    let text = unescape_html(&stripped);
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

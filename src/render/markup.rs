//! Safe Markdown subset for assistant chat messages.
//!
//! The input is HTML-escaped before any markup is introduced, so the only
//! tags in the output are the ones produced here: `pre`, `code`, `strong`,
//! `em`, `ul`, `li` and `br`.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Break sequences that chat backends sometimes put inside code blocks,
/// as they look after escaping.
const ESCAPED_BREAKS: [&str; 2] = ["&lt;br/&gt;", "&lt;br&gt;"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkupOptions {
    /// Render `*x*` and `_x_` as emphasis.
    pub italics: bool,
}

impl Default for MarkupOptions {
    fn default() -> Self {
        Self { italics: true }
    }
}

fn regex(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("markup pattern is valid"))
}

fn fenced_code() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r"(?s)```(.*?)```")
}

fn inline_code() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r"`([^`]+)`")
}

fn bold() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r"\*\*(.*?)\*\*")
}

fn bold_italic() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r"\*\*\*([^*\s][^*]*?)\*\*\*")
}

// Italic bodies never contain `<`: after escaping, the only `<` left belongs
// to a tag produced by an earlier pass, and an italic span must not cross it.
fn star_italic() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r"\*([^*\s<][^*<]*?)\*")
}

fn underscore_italic() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r"(^|[^A-Za-z0-9_])_([^_\s<][^_<]*?)_")
}

fn list_item() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r"^\s*[-*+]\s+(.*)$")
}

pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// Render chat text to markup. See the module docs for the tag set.
pub fn render_inline_markup(text: &str, options: MarkupOptions) -> String {
    if text.is_empty() {
        return String::new();
    }

    let escaped = escape_html(text);
    let mut out = String::with_capacity(escaped.len() + 16);
    let mut has_items = false;
    let mut at_line_start = true;
    let mut last = 0;

    for caps in fenced_code().captures_iter(&escaped) {
        let (Some(whole), Some(body)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        render_text(&escaped[last..whole.start()], at_line_start, options, &mut out, &mut has_items);

        let mut code = body.as_str().to_string();
        for br in ESCAPED_BREAKS {
            code = code.replace(br, "\n");
        }
        out.push_str("<pre><code>");
        out.push_str(&code);
        out.push_str("</code></pre>");

        last = whole.end();
        at_line_start = false;
    }
    render_text(&escaped[last..], at_line_start, options, &mut out, &mut has_items);

    if has_items {
        out = format!("<ul>{out}</ul>");
    }
    out.replace('\n', "<br/>")
}

/// Render the text between fenced blocks line by line. `at_line_start` is
/// false when the segment continues a line that a code block interrupted.
fn render_text(
    segment: &str,
    mut at_line_start: bool,
    options: MarkupOptions,
    out: &mut String,
    has_items: &mut bool,
) {
    for (i, line) in segment.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
            at_line_start = true;
        }

        let item = at_line_start
            .then(|| list_item().captures(line))
            .flatten()
            .and_then(|caps| caps.get(1));

        match item {
            Some(content) => {
                *has_items = true;
                out.push_str("<li>");
                render_inline(content.as_str(), options, out);
                out.push_str("</li>");
            }
            None => render_inline(line, options, out),
        }
    }
}

/// Inline code spans first; emphasis only outside them.
fn render_inline(line: &str, options: MarkupOptions, out: &mut String) {
    let mut last = 0;
    for caps in inline_code().captures_iter(line) {
        let (Some(whole), Some(body)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        out.push_str(&emphasize(&line[last..whole.start()], options));
        out.push_str("<code>");
        out.push_str(body.as_str());
        out.push_str("</code>");
        last = whole.end();
    }
    out.push_str(&emphasize(&line[last..], options));
}

fn emphasize(text: &str, options: MarkupOptions) -> String {
    if !options.italics {
        return bold().replace_all(text, "<strong>$1</strong>").into_owned();
    }
    let text = bold_italic().replace_all(text, "<strong><em>$1</em></strong>");
    let text = bold().replace_all(&text, "<strong>$1</strong>");
    let text = star_italic().replace_all(&text, "<em>$1</em>");
    underscore_italic().replace_all(&text, "${1}<em>${2}</em>").into_owned()
}

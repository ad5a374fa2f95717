//! Inline emphasis, code span, and link markup for a single run of text.
//!
//! The input is HTML-escaped first, so every tag in the output was
//! introduced by this module. Code spans are cut out of the emphasis
//! pipeline entirely: no further markup applies inside them.

use regex::{Captures, Regex};
use std::borrow::Cow;
use std::sync::OnceLock;

const CODE_STYLE: &str = "background:#f0f0f0;padding:1px 5px;border-radius:3px;font-size:0.9em;";
const LINK_STYLE: &str = "color:#1565c0;";

/// URL schemes allowed in rendered anchors. Anything else (including
/// `javascript:`) is left as escaped plain text.
const ALLOWED_SCHEMES: [&str; 3] = ["http://", "https://", "mailto:"];

fn bold_italic_star_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\*{3}([^*]+)\*{3}").expect("invalid bold-italic regex"))
}

fn bold_italic_underscore_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"_{3}([^_]+)_{3}").expect("invalid bold-italic regex"))
}

fn bold_star_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\*{2}([^*]+)\*{2}").expect("invalid bold regex"))
}

fn bold_underscore_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"_{2}([^_]+)_{2}").expect("invalid bold regex"))
}

fn italic_star_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\*([^*]+)\*").expect("invalid italic regex"))
}

fn link_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("invalid link regex"))
}

/// Applies inline formatting to one run of text destined for HTML.
pub fn format_inline(text: &str) -> String {
    let escaped = html_escape::encode_safe(text);

    let mut out = String::with_capacity(escaped.len());
    let mut rest: &str = &escaped;
    while let Some((open, end)) = find_code_span(rest) {
        out.push_str(&apply_emphasis(&rest[..open]));
        out.push_str(&format!(
            "<code style=\"{CODE_STYLE}\">{}</code>",
            &rest[open + 1..end - 1]
        ));
        rest = &rest[end..];
    }
    out.push_str(&apply_emphasis(rest));
    out
}

/// Finds the next backtick-delimited code span with non-empty content.
/// Returns the byte range including both backticks.
fn find_code_span(s: &str) -> Option<(usize, usize)> {
    let mut from = 0;
    while let Some(rel) = s[from..].find('`') {
        let open = from + rel;
        match s[open + 1..].find('`') {
            // Empty span: keep scanning from the second backtick.
            Some(0) => from = open + 1,
            Some(len) => return Some((open, open + 1 + len + 1)),
            None => return None,
        }
    }
    None
}

/// Emphasis and link substitution, longest delimiters first so `***x***`
/// is not eaten by the bold pass.
fn apply_emphasis(text: &str) -> String {
    let text = bold_italic_star_re().replace_all(text, "<strong><em>$1</em></strong>");
    let text = bold_italic_underscore_re().replace_all(&text, "<strong><em>$1</em></strong>");
    let text = bold_star_re().replace_all(&text, "<strong>$1</strong>");
    let text = bold_underscore_re().replace_all(&text, "<strong>$1</strong>");
    let text = italic_star_re().replace_all(&text, "<em>$1</em>");
    let text = underscore_italic(&text);
    replace_links(&text).into_owned()
}

fn replace_links(text: &str) -> Cow<'_, str> {
    link_re().replace_all(text, |caps: &Captures| {
        let label = &caps[1];
        let url = &caps[2];
        if scheme_allowed(url) {
            format!("<a href=\"{url}\" style=\"{LINK_STYLE}\">{label}</a>")
        } else {
            caps[0].to_string()
        }
    })
}

fn scheme_allowed(url: &str) -> bool {
    let lower = url.trim().to_ascii_lowercase();
    ALLOWED_SCHEMES.iter().any(|s| lower.starts_with(s))
}

/// Single-underscore italics with a word boundary guard: `_x_` becomes
/// emphasis only when neither delimiter touches an ASCII word character
/// on the outside, so `snake_case_name` stays untouched.
fn underscore_italic(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(open) = rest.find('_') {
        let prev_is_word = rest[..open].chars().next_back().is_some_and(is_ascii_word);
        if !prev_is_word {
            let after_open = &rest[open + 1..];
            if let Some(len) = after_open.find('_') {
                if len > 0 {
                    let close_end = open + 1 + len + 1;
                    let next_is_word = rest[close_end..].chars().next().is_some_and(is_ascii_word);
                    if !next_is_word {
                        out.push_str(&rest[..open]);
                        out.push_str("<em>");
                        out.push_str(&after_open[..len]);
                        out.push_str("</em>");
                        rest = &rest[close_end..];
                        continue;
                    }
                }
            }
        }
        out.push_str(&rest[..open + 1]);
        rest = &rest[open + 1..];
    }
    out.push_str(rest);
    out
}

fn is_ascii_word(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

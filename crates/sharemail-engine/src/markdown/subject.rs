//! Subject line extraction for generic (non-log) payloads.

use regex::Regex;
use std::sync::OnceLock;

use super::heading_re;

/// Used when the text has no heading and no non-blank line outside front matter.
pub const FALLBACK_SUBJECT: &str = "Shared content";

/// Prefix applied to every generic subject.
pub const SUBJECT_PREFIX: &str = "Shared: ";

/// Subjects longer than this many code points are truncated.
const MAX_SUBJECT_LEN: usize = 80;
const TRUNCATED_LEN: usize = 77;

fn star_emphasis_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\*{1,2}([^*]+)\*{1,2}").expect("invalid emphasis regex"))
}

fn underscore_emphasis_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"_{1,2}([^_]+)_{1,2}").expect("invalid emphasis regex"))
}

/// Derives a short subject from generic text: the first heading outside
/// front matter, else the first non-blank line, else [`FALLBACK_SUBJECT`].
/// Emphasis delimiters are stripped and the result is clipped to
/// [`MAX_SUBJECT_LEN`] code points. No HTML escaping happens here; the
/// subject goes into a mail header, not into markup.
pub fn extract_subject(text: &str) -> String {
    let mut in_front_matter = false;
    let mut first_heading: Option<String> = None;
    let mut first_line: Option<String> = None;

    for line in text.split('\n') {
        let trimmed = line.trim();

        if trimmed == "---" {
            in_front_matter = !in_front_matter;
            continue;
        }
        if in_front_matter || trimmed.is_empty() {
            continue;
        }

        if let Some(caps) = heading_re().captures(trimmed) {
            first_heading = Some(caps[2].trim().to_string());
            break;
        }
        if first_line.is_none() {
            first_line = Some(trimmed.to_string());
        }
    }

    let raw = first_heading
        .or(first_line)
        .unwrap_or_else(|| FALLBACK_SUBJECT.to_string());
    let stripped = strip_emphasis(&raw);

    format!("{SUBJECT_PREFIX}{}", clip(&stripped))
}

fn strip_emphasis(text: &str) -> String {
    let text = star_emphasis_re().replace_all(text, "$1");
    underscore_emphasis_re().replace_all(&text, "$1").into_owned()
}

fn clip(text: &str) -> String {
    if text.chars().count() > MAX_SUBJECT_LEN {
        let mut clipped: String = text.chars().take(TRUNCATED_LEN).collect();
        clipped.push_str("...");
        clipped
    } else {
        text.to_string()
    }
}

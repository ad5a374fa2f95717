//! Parser for Logarte debug-console exports.
//!
//! An export is a labeled header block followed by timestamped entries of
//! the form `[H:M:S] [TYPE] content`. Parsing is total: text that merely
//! looks like an export still yields a [`ParsedLog`], worst case with
//! content-only entries or none at all.

use regex::Regex;
use std::sync::OnceLock;

/// Label used for subjects derived from Logarte exports.
pub const LOG_LABEL: &str = "Logarte";

/// One export entry. An entry with no recognizable `[H:M:S] [TYPE]` header
/// still carries its raw text in `content` with empty `time` and `type_tag`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LogEntry {
    /// `HH:MM:SS` timestamp, or empty when the entry had no header.
    pub time: String,
    /// Uppercased type tag (`LOG`, `NETWORK`, ...), or empty.
    pub type_tag: String,
    /// Entry body, possibly multi-line, trimmed.
    pub content: String,
}

/// A fully parsed Logarte export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLog {
    /// Subject line derived from the header block.
    pub subject: String,
    /// Non-blank header lines preceding the first timestamped entry.
    pub header_lines: Vec<String>,
    /// Entries in source order.
    pub entries: Vec<LogEntry>,
}

fn timestamp_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\[\d+:\d+:\d+\]").expect("invalid timestamp regex"))
}

fn entry_start_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^\[\d+:\d+:\d+\]\s*\[\w+\]").expect("invalid entry start regex")
    })
}

fn entry_header_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)^\[(\d+:\d+:\d+)\]\s*\[(\w+)\](.*)$").expect("invalid entry header regex")
    })
}

fn leading_non_word_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\W*").expect("invalid leading non-word regex"))
}

/// Parses text already classified as a Logarte export. Never fails.
pub fn parse(text: &str) -> ParsedLog {
    let lines: Vec<&str> = text.split('\n').collect();

    // Header block: non-blank lines up to the first timestamped line. If no
    // such line exists the header absorbs everything and there are no entries.
    let mut header_lines = Vec::new();
    let mut entry_start = lines.len();
    for (i, line) in lines.iter().enumerate() {
        let trimmed = line.trim();
        if timestamp_re().is_match(trimmed) {
            entry_start = i;
            break;
        }
        if !trimmed.is_empty() {
            header_lines.push(trimmed.to_string());
        }
    }

    let subject = derive_subject(&header_lines);

    let remaining = lines[entry_start..].join("\n");
    let entries = split_entries(&remaining);

    ParsedLog {
        subject,
        header_lines,
        entries,
    }
}

/// Second header line (with leading punctuation stripped) becomes the
/// session info; absent that, the subject is the bare label.
fn derive_subject(header_lines: &[String]) -> String {
    let session = header_lines
        .get(1)
        .map(|line| leading_non_word_re().replace(line, "").to_string())
        .unwrap_or_default();

    if session.is_empty() {
        LOG_LABEL.to_string()
    } else {
        format!("{LOG_LABEL}: {session}")
    }
}

/// Splits the entries region at every line start matching `[H:M:S] [TYPE]`.
/// Segments that don't match the header pattern become content-only entries;
/// blank segments are dropped.
fn split_entries(remaining: &str) -> Vec<LogEntry> {
    let mut starts = vec![0];
    for m in entry_start_re().find_iter(remaining) {
        if m.start() != 0 {
            starts.push(m.start());
        }
    }
    starts.push(remaining.len());

    let mut entries = Vec::new();
    for pair in starts.windows(2) {
        let segment = remaining[pair[0]..pair[1]].trim();
        if segment.is_empty() {
            continue;
        }

        let entry = match entry_header_re().captures(segment) {
            Some(caps) => LogEntry {
                time: caps[1].to_string(),
                type_tag: caps[2].to_uppercase(),
                content: caps[3].trim().to_string(),
            },
            None => LogEntry {
                content: segment.to_string(),
                ..LogEntry::default()
            },
        };
        entries.push(entry);
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_header_and_entries() {
        let text = "LOGARTE\nSession abc\n[12:00:01] [LOG] hello\n[12:00:02] [NETWORK] GET /x";
        let parsed = parse(text);

        assert_eq!(parsed.subject, "Logarte: Session abc");
        assert_eq!(parsed.header_lines, vec!["LOGARTE", "Session abc"]);
        assert_eq!(
            parsed.entries,
            vec![
                LogEntry {
                    time: "12:00:01".to_string(),
                    type_tag: "LOG".to_string(),
                    content: "hello".to_string(),
                },
                LogEntry {
                    time: "12:00:02".to_string(),
                    type_tag: "NETWORK".to_string(),
                    content: "GET /x".to_string(),
                },
            ]
        );
    }

    #[test]
    fn no_timestamp_line_means_zero_entries() {
        let text = "LOGARTE\nSession abc\nno entries here";
        let parsed = parse(text);

        assert_eq!(
            parsed.header_lines,
            vec!["LOGARTE", "Session abc", "no entries here"]
        );
        assert!(parsed.entries.is_empty());
    }

    #[test]
    fn single_header_line_gives_bare_label_subject() {
        let parsed = parse("LOGARTE\n[12:00:01] [LOG] hi");
        assert_eq!(parsed.subject, "Logarte");
    }

    #[test]
    fn session_info_strips_leading_punctuation() {
        let parsed = parse("LOGARTE\n-- Session xyz\n[1:2:3] [LOG] hi");
        assert_eq!(parsed.subject, "Logarte: Session xyz");
    }

    #[test]
    fn blank_header_lines_are_skipped() {
        let parsed = parse("LOGARTE\n\nSession abc\n[1:2:3] [LOG] hi");
        assert_eq!(parsed.header_lines, vec!["LOGARTE", "Session abc"]);
    }

    #[test]
    fn entry_content_spans_multiple_lines() {
        let text = "LOGARTE\nSession\n[1:2:3] [NETWORK] GET /x\nstatus: 200\nbody: ok";
        let parsed = parse(text);

        assert_eq!(parsed.entries.len(), 1);
        assert_eq!(parsed.entries[0].content, "GET /x\nstatus: 200\nbody: ok");
    }

    #[test]
    fn timestamp_without_type_tag_becomes_content_entry() {
        let text = "LOGARTE\nSession\n[1:2:3] no tag here";
        let parsed = parse(text);

        assert_eq!(parsed.entries.len(), 1);
        assert_eq!(parsed.entries[0].time, "");
        assert_eq!(parsed.entries[0].type_tag, "");
        assert_eq!(parsed.entries[0].content, "[1:2:3] no tag here");
    }

    #[test]
    fn type_tag_is_uppercased() {
        let parsed = parse("LOGARTE\nSession\n[1:2:3] [network] GET /x");
        assert_eq!(parsed.entries[0].type_tag, "NETWORK");
    }

    #[test]
    fn entries_preserve_source_order() {
        let text = "LOGARTE\nSession\n[1:0:0] [LOG] a\n[0:0:0] [LOG] b\n[2:0:0] [LOG] c";
        let parsed = parse(text);
        let contents: Vec<&str> = parsed.entries.iter().map(|e| e.content.as_str()).collect();
        assert_eq!(contents, vec!["a", "b", "c"]);
    }
}

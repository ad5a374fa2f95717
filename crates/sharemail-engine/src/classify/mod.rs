//! Decides whether an incoming payload is a Logarte debug-console export
//! or generic free text / markdown.

/// Literal token marking a Logarte debug-console export.
pub const LOG_MARKER: &str = "LOGARTE";

/// The two payload shapes the engine knows how to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadFormat {
    /// A Logarte export: labeled header followed by timestamped, typed entries.
    StructuredLog,
    /// Anything else: free text or markdown.
    Generic,
}

/// Classifies raw payload text.
///
/// Returns [`PayloadFormat::StructuredLog`] only when the text has at least
/// three lines and the first non-empty line contains [`LOG_MARKER`]. Total
/// over arbitrary input; never fails.
pub fn classify(text: &str) -> PayloadFormat {
    let lines: Vec<&str> = text.split('\n').collect();
    if lines.len() < 3 {
        return PayloadFormat::Generic;
    }

    let first_non_empty = lines.iter().map(|l| l.trim()).find(|l| !l.is_empty());
    match first_non_empty {
        Some(line) if line.contains(LOG_MARKER) => PayloadFormat::StructuredLog,
        _ => PayloadFormat::Generic,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn logarte_export_is_structured_log() {
        let text = "LOGARTE\nSession abc\n[12:00:01] [LOG] hello";
        assert_eq!(classify(text), PayloadFormat::StructuredLog);
    }

    #[rstest]
    #[case("")]
    #[case("LOGARTE")]
    #[case("LOGARTE\nSession abc")]
    fn fewer_than_three_lines_is_generic(#[case] text: &str) {
        assert_eq!(classify(text), PayloadFormat::Generic);
    }

    #[test]
    fn marker_on_first_non_empty_line_counts() {
        let text = "\n\n  LOGARTE v1\nSession abc\n[12:00:01] [LOG] hi";
        assert_eq!(classify(text), PayloadFormat::StructuredLog);
    }

    #[test]
    fn marker_on_later_line_is_generic() {
        let text = "intro\nLOGARTE\n[12:00:01] [LOG] hi";
        assert_eq!(classify(text), PayloadFormat::Generic);
    }

    #[test]
    fn plain_markdown_is_generic() {
        let text = "# Title\n\nSome body text here.";
        assert_eq!(classify(text), PayloadFormat::Generic);
    }
}

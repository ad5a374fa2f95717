//! Line-oriented markdown-to-HTML conversion for email bodies.
//!
//! This is deliberately not a CommonMark implementation. A small, closed
//! token set (headings, flat lists, quotes, fenced code, front matter,
//! inline emphasis) is converted in a single pass by an explicit state
//! machine; everything else is a paragraph.

pub mod inline;
pub mod subject;

use regex::Regex;
use std::sync::OnceLock;

const HR_HTML: &str = "<hr style=\"border:none;border-top:1px solid #e0e0e0;margin:20px 0;\">";
const PRE_OPEN: &str = "<pre style=\"background:#f5f5f5;border:1px solid #e0e0e0;border-radius:4px;\
padding:12px;overflow-x:auto;font-size:13px;line-height:1.5;\"><code>";
const PRE_CLOSE: &str = "</code></pre>";
const OL_OPEN: &str = "<ol style=\"margin:8px 0;padding-left:24px;line-height:1.7;\">";
const UL_OPEN: &str = "<ul style=\"margin:8px 0;padding-left:24px;line-height:1.7;\">";
const TABLE_OPEN: &str =
    "<table style=\"width:100%;border-collapse:collapse;margin-bottom:16px;font-size:13px;\">";

/// Heading font sizes keyed by level 1..=6.
const HEADING_SIZES: [&str; 6] = ["22px", "18px", "16px", "14px", "13px", "12px"];

pub(crate) fn heading_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(#{1,6})\s+(.+)$").expect("invalid heading regex"))
}

fn horizontal_rule_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\*{3,}|-{3,}|_{3,})$").expect("invalid rule regex"))
}

fn ordered_item_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d+)\.\s+(.+)$").expect("invalid ordered item regex"))
}

fn unordered_item_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[-*]\s+(.+)$").expect("invalid unordered item regex"))
}

fn blockquote_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^>\s*(.*)$").expect("invalid blockquote regex"))
}

fn continuation_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\s{4}|\t)(.+)$").expect("invalid continuation regex"))
}

fn front_matter_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([^:]+):\s*(.*)$").expect("invalid front matter regex"))
}

/// The single active block construct. Exactly one state is open at a time;
/// any open list or code block is force-closed at end of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockState {
    None,
    FrontMatter,
    Code,
    ListOrdered,
    ListUnordered,
}

/// Converts generic text to block-level HTML. Pure: same input, same output.
pub fn render_blocks(text: &str) -> String {
    let mut renderer = Renderer::new();
    for line in text.split('\n') {
        renderer.push_line(line);
    }
    renderer.finish()
}

struct Renderer {
    html: String,
    state: BlockState,
    front_matter: Vec<String>,
    front_matter_seen: bool,
}

impl Renderer {
    fn new() -> Self {
        Self {
            html: String::new(),
            state: BlockState::None,
            front_matter: Vec::new(),
            front_matter_seen: false,
        }
    }

    /// Per-line dispatch. Rules are checked in a fixed priority order; the
    /// first match wins. Reordering these checks changes behavior on lines
    /// that match more than one pattern.
    fn push_line(&mut self, line: &str) {
        let trimmed = line.trim();

        // Open code block: everything is verbatim until the closing fence.
        if self.state == BlockState::Code {
            if trimmed.starts_with("```") {
                self.html.push_str(PRE_CLOSE);
                self.state = BlockState::None;
            } else {
                self.html.push_str(&html_escape::encode_safe(line));
                self.html.push('\n');
            }
            return;
        }

        // Open front matter: buffer until the closing delimiter.
        if self.state == BlockState::FrontMatter {
            if trimmed == "---" {
                self.state = BlockState::None;
                let buffered = std::mem::take(&mut self.front_matter);
                self.html.push_str(&front_matter_table(&buffered));
            } else {
                self.front_matter.push(trimmed.to_string());
            }
            return;
        }

        // 1. Front matter delimiter, valid only before any emitted content.
        if trimmed == "---" {
            if !self.front_matter_seen && self.html.is_empty() {
                self.front_matter_seen = true;
                self.state = BlockState::FrontMatter;
            } else {
                self.close_list();
                self.html.push_str(HR_HTML);
            }
            return;
        }

        // 2. Code fence.
        if trimmed.starts_with("```") {
            self.close_list();
            self.html.push_str(PRE_OPEN);
            self.state = BlockState::Code;
            return;
        }

        // 3. Horizontal rule.
        if horizontal_rule_re().is_match(trimmed) {
            self.close_list();
            self.html.push_str(HR_HTML);
            return;
        }

        // 4. Heading.
        if let Some(caps) = heading_re().captures(trimmed) {
            self.close_list();
            self.push_heading(caps[1].len(), &caps[2]);
            return;
        }

        // 5. Ordered list item.
        if let Some(caps) = ordered_item_re().captures(trimmed) {
            self.open_list(BlockState::ListOrdered);
            self.push_list_item(&caps[2]);
            return;
        }

        // 6. Unordered list item.
        if let Some(caps) = unordered_item_re().captures(trimmed) {
            self.open_list(BlockState::ListUnordered);
            self.push_list_item(&caps[1]);
            return;
        }

        // 7. Blockquote.
        if let Some(caps) = blockquote_re().captures(trimmed) {
            self.close_list();
            self.html.push_str(
                "<blockquote style=\"margin:10px 0;padding:8px 16px;border-left:3px solid \
#90caf9;background:#f8f9ff;color:#555;font-style:italic;\">",
            );
            self.html.push_str(&inline::format_inline(&caps[1]));
            self.html.push_str("</blockquote>");
            return;
        }

        // 8. Indented continuation of the current list item (raw line, not
        // trimmed: the indent is the signal).
        if self.in_list()
            && let Some(caps) = continuation_re().captures(line)
        {
            self.html.push_str("<br>");
            self.html.push_str(&inline::format_inline(caps[2].trim()));
            return;
        }

        // 9. Blank line.
        if trimmed.is_empty() {
            self.close_list();
            return;
        }

        // 10. Paragraph fallback.
        self.close_list();
        self.html
            .push_str("<p style=\"margin:8px 0;line-height:1.7;color:#333;\">");
        self.html.push_str(&inline::format_inline(trimmed));
        self.html.push_str("</p>");
    }

    /// Force-closes any open construct. Buffered front matter from an
    /// unterminated block is discarded, matching the subject extractor's
    /// view that such lines are metadata, not content.
    fn finish(mut self) -> String {
        self.close_list();
        if self.state == BlockState::Code {
            self.html.push_str(PRE_CLOSE);
        }
        self.html
    }

    fn in_list(&self) -> bool {
        matches!(
            self.state,
            BlockState::ListOrdered | BlockState::ListUnordered
        )
    }

    fn close_list(&mut self) {
        match self.state {
            BlockState::ListOrdered => {
                self.html.push_str("</ol>");
                self.state = BlockState::None;
            }
            BlockState::ListUnordered => {
                self.html.push_str("</ul>");
                self.state = BlockState::None;
            }
            _ => {}
        }
    }

    /// Opens a list of the wanted type, closing a list of the other type
    /// first. No-op when the wanted list is already open.
    fn open_list(&mut self, wanted: BlockState) {
        if self.state == wanted {
            return;
        }
        self.close_list();
        self.html.push_str(match wanted {
            BlockState::ListOrdered => OL_OPEN,
            _ => UL_OPEN,
        });
        self.state = wanted;
    }

    fn push_list_item(&mut self, text: &str) {
        self.html.push_str("<li style=\"margin-bottom:6px;\">");
        self.html.push_str(&inline::format_inline(text));
        self.html.push_str("</li>");
    }

    fn push_heading(&mut self, level: usize, text: &str) {
        let size = HEADING_SIZES[level - 1];
        let margin_top = if level <= 2 { "24px" } else { "18px" };
        let border_bottom = if level <= 2 {
            "border-bottom:1px solid #e0e0e0;padding-bottom:6px;"
        } else {
            ""
        };
        self.html.push_str(&format!(
            "<h{level} style=\"font-size:{size};color:#1a237e;margin:{margin_top} 0 10px 0;\
{border_bottom}\">{}</h{level}>",
            inline::format_inline(text)
        ));
    }
}

/// Renders buffered `key: value` front matter lines as a two-column table.
/// Quotes and whitespace are trimmed from values. Lines without a colon are
/// skipped; an all-skipped block renders nothing.
fn front_matter_table(lines: &[String]) -> String {
    let mut rows = String::new();
    for line in lines {
        if let Some(caps) = front_matter_line_re().captures(line) {
            let key = html_escape::encode_safe(caps[1].trim()).into_owned();
            let value =
                html_escape::encode_safe(caps[2].trim_matches([' ', '\t', '\'', '"'])).into_owned();
            rows.push_str(&format!(
                "<tr><td style=\"padding:4px 12px 4px 0;color:#757575;font-weight:bold;\
white-space:nowrap;vertical-align:top;\">{key}</td>\
<td style=\"padding:4px 0;color:#333;\">{value}</td></tr>"
            ));
        }
    }

    if rows.is_empty() {
        return String::new();
    }
    format!("{TABLE_OPEN}{rows}</table>")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn heading_levels() {
        let html = render_blocks("# Top\n### Sub");
        assert!(html.contains("<h1 style=\"font-size:22px;"));
        assert!(html.contains(">Top</h1>"));
        assert!(html.contains("<h3 style=\"font-size:16px;"));
        assert!(html.contains(">Sub</h3>"));
    }

    #[test]
    fn seven_hashes_is_a_paragraph() {
        let html = render_blocks("####### not a heading");
        assert!(html.starts_with("<p "));
        assert!(!html.contains("<h"));
    }

    #[test]
    fn paragraph_gets_inline_formatting() {
        let html = render_blocks("Some *italic* text");
        assert!(html.contains("<em>italic</em>"));
    }

    #[test]
    fn unordered_list_opens_and_closes() {
        let html = render_blocks("- one\n- two\n\nafter");
        let ul_start = html.find("<ul").unwrap();
        let ul_end = html.find("</ul>").unwrap();
        assert!(ul_start < ul_end);
        assert_eq!(html.matches("<li").count(), 2);
        assert!(html.find("<p ").unwrap() > ul_end);
    }

    #[test]
    fn ordered_list_uses_ol() {
        let html = render_blocks("1. first\n2. second");
        assert!(html.contains("<ol"));
        assert!(html.ends_with("</ol>"));
    }

    #[test]
    fn switching_list_type_closes_previous_list() {
        let html = render_blocks("- bullet\n1. number");
        let close_ul = html.find("</ul>").unwrap();
        let open_ol = html.find("<ol").unwrap();
        assert!(close_ul < open_ol);
        assert!(html.ends_with("</ol>"));
    }

    #[test]
    fn list_left_open_is_closed_at_end_of_input() {
        let html = render_blocks("- only item");
        assert!(html.ends_with("</ul>"));
    }

    #[test]
    fn code_fence_is_verbatim() {
        let html = render_blocks("```\nlet x = *1*;\n<tag>\n```");
        assert!(html.contains("let x = *1*;\n"));
        assert!(html.contains("&lt;tag&gt;\n"));
        assert!(!html.contains("<em>"));
    }

    #[test]
    fn unterminated_code_fence_is_closed_at_end_of_input() {
        let html = render_blocks("```\nunfinished");
        assert!(html.ends_with("</code></pre>"));
    }

    #[test]
    fn rule_lines_inside_code_fence_stay_verbatim() {
        let html = render_blocks("```\n---\n# not a heading\n```");
        assert!(html.contains("---\n"));
        assert!(html.contains("# not a heading\n"));
        assert!(!html.contains("<hr"));
    }

    #[test]
    fn front_matter_renders_metadata_table() {
        let html = render_blocks("---\ntitle: Demo\nauthor: 'Jo'\n---\nBody text");
        assert!(html.contains(">title</td>"));
        assert!(html.contains(">Demo</td>"));
        assert!(html.contains(">author</td>"));
        assert!(html.contains(">Jo</td>"));
        assert!(html.find("</table>").unwrap() < html.find("<p ").unwrap());
    }

    #[test]
    fn later_triple_dash_is_horizontal_rule() {
        let html = render_blocks("text\n---\nmore");
        assert!(html.contains("<hr"));
    }

    #[rstest]
    #[case("***")]
    #[case("----")]
    #[case("_____")]
    fn horizontal_rule_variants(#[case] line: &str) {
        let html = render_blocks(line);
        assert_eq!(html, HR_HTML);
    }

    #[test]
    fn blockquote_renders() {
        let html = render_blocks("> quoted words");
        assert!(html.contains("<blockquote"));
        assert!(html.contains("quoted words</blockquote>"));
    }

    #[test]
    fn indented_line_continues_list_item() {
        let html = render_blocks("- item\n    continued here");
        assert!(html.contains("<br>continued here"));
        assert!(html.ends_with("</ul>"));
    }

    #[test]
    fn indented_line_outside_list_is_a_paragraph() {
        let html = render_blocks("    just indented");
        assert!(html.starts_with("<p "));
        assert!(html.contains("just indented"));
    }

    #[test]
    fn blank_line_closes_list_without_output() {
        let html = render_blocks("- a\n\n- b");
        // Two separate lists, not one.
        assert_eq!(html.matches("<ul").count(), 2);
        assert_eq!(html.matches("</ul>").count(), 2);
    }

    #[test]
    fn empty_input_renders_nothing() {
        assert_eq!(render_blocks(""), "");
    }

    #[test]
    fn rendering_is_idempotent() {
        let text = "# T\n- a\n- b\n```\ncode\n```\n> q";
        assert_eq!(render_blocks(text), render_blocks(text));
    }

    #[test]
    fn front_matter_without_colon_lines_renders_nothing() {
        let html = render_blocks("---\nnot metadata\n---\nbody");
        assert!(!html.contains("<table"));
        assert!(html.contains("body"));
    }
}

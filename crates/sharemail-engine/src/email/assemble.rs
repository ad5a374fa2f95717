//! The two fixed HTML email templates: Logarte exports and generic text.
//!
//! Inline styles only, since this HTML lands in mail clients that strip
//! stylesheets. Every piece of user text is escaped before insertion.

use crate::logarte::{LogEntry, ParsedLog};
use crate::markdown;
use crate::markdown::subject::SUBJECT_PREFIX;
use crate::models::{ExtraFields, RequestContext};

/// Badge colors for one entry type.
struct Palette {
    bg: &'static str,
    fg: &'static str,
    border: &'static str,
}

/// Badge palette keyed by uppercased entry type. Unknown types fall back to
/// [`DEFAULT_PALETTE`].
static TYPE_PALETTE: [(&str, Palette); 4] = [
    (
        "NAVIGATION",
        Palette {
            bg: "#e3f2fd",
            fg: "#1565c0",
            border: "#90caf9",
        },
    ),
    (
        "LOG",
        Palette {
            bg: "#e8f5e9",
            fg: "#2e7d32",
            border: "#a5d6a7",
        },
    ),
    (
        "NETWORK",
        Palette {
            bg: "#fff3e0",
            fg: "#e65100",
            border: "#ffcc80",
        },
    ),
    (
        "DATABASE",
        Palette {
            bg: "#f3e5f5",
            fg: "#6a1b9a",
            border: "#ce93d8",
        },
    ),
];

static DEFAULT_PALETTE: Palette = Palette {
    bg: "#f5f5f5",
    fg: "#424242",
    border: "#bdbdbd",
};

fn palette_for(type_tag: &str) -> &'static Palette {
    TYPE_PALETTE
        .iter()
        .find(|(tag, _)| *tag == type_tag)
        .map(|(_, palette)| palette)
        .unwrap_or(&DEFAULT_PALETTE)
}

fn escape(text: &str) -> String {
    html_escape::encode_safe(text).into_owned()
}

fn footer(ctx: &RequestContext) -> String {
    format!(
        "<div style=\"background:#f5f5f5;padding:14px 24px;font-size:11px;color:#999;\
border-top:1px solid #e0e0e0;\">Received: {} &middot; IP: {} &middot; UA: {}</div>",
        escape(&ctx.time),
        escape(&ctx.ip),
        escape(&ctx.user_agent),
    )
}

fn document(body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"UTF-8\"></head>\n\
<body style=\"margin:0;padding:0;background:#f0f0f0;font-family:Arial,Helvetica,sans-serif;\">\n\
<div style=\"max-width:700px;margin:20px auto;background:#ffffff;border-radius:8px;\
overflow:hidden;box-shadow:0 2px 8px rgba(0,0,0,0.1);\">\n{body}\n</div>\n</body>\n</html>"
    )
}

/// Builds the full HTML document for a parsed Logarte export.
pub fn log_html(parsed: &ParsedLog, ctx: &RequestContext) -> String {
    let header_html: String = parsed
        .header_lines
        .iter()
        .map(|line| format!("{}<br>", escape(line)))
        .collect();

    // First header line mentioning "entries" doubles as a stats strip.
    let stats_line = parsed
        .header_lines
        .iter()
        .find(|line| line.contains("entries"))
        .map(|line| escape(line))
        .unwrap_or_default();

    let entries_html: String = parsed.entries.iter().map(entry_card).collect();

    let body = format!(
        "<div style=\"background:#1a237e;color:#ffffff;padding:20px 24px;\">\
<h1 style=\"margin:0 0 8px 0;font-size:22px;font-weight:bold;\">Logarte Export</h1>\
<div style=\"font-size:14px;opacity:0.9;\">{header_html}</div></div>\
<div style=\"background:#e8eaf6;padding:10px 24px;font-size:13px;color:#3949ab;\">{stats_line}</div>\
<div style=\"padding:16px 24px;\">\
<h2 style=\"font-size:16px;color:#333;margin:0 0 14px 0;border-bottom:1px solid #e0e0e0;\
padding-bottom:8px;\">Log Entries</h2>{entries_html}</div>{}",
        footer(ctx)
    );

    document(&body)
}

/// One bordered card per entry: optional `[time]` prefix, colored type
/// badge, then the content escaped verbatim with line breaks preserved.
/// Log text is never run through the inline formatter.
fn entry_card(entry: &LogEntry) -> String {
    let palette = palette_for(&entry.type_tag);
    let content = escape(&entry.content).replace('\n', "<br>");

    let mut badge = String::new();
    if !entry.time.is_empty() || !entry.type_tag.is_empty() {
        let type_label = if entry.type_tag.is_empty() {
            "UNKNOWN".to_string()
        } else {
            escape(&entry.type_tag)
        };
        if !entry.time.is_empty() {
            badge.push_str(&format!(
                "<span style=\"color:#757575;font-size:12px;margin-right:6px;\">[{}]</span>",
                escape(&entry.time)
            ));
        }
        badge.push_str(&format!(
            "<span style=\"display:inline-block;padding:2px 8px;border-radius:3px;\
background:{};color:{};border:1px solid {};font-weight:bold;font-size:12px;\
margin-right:8px;\">{type_label}</span>",
            palette.bg, palette.fg, palette.border
        ));
    }

    format!(
        "<div style=\"margin-bottom:12px;padding:10px 14px;border-left:3px solid {};\
background:#fafafa;\"><div style=\"margin-bottom:6px;\">{badge}</div>\
<div style=\"font-family:'Courier New',Courier,monospace;font-size:13px;line-height:1.5;\
color:#333;white-space:pre-wrap;word-break:break-word;\">{content}</div></div>",
        palette.border
    )
}

/// Builds the full HTML document for generic text: rendered blocks, the
/// optional extra-fields table, a title derived from the subject, and the
/// request footer.
pub fn generic_html(
    text: &str,
    subject: &str,
    ctx: &RequestContext,
    extra_fields: &ExtraFields,
) -> String {
    let mut body_html = markdown::render_blocks(text);

    if !extra_fields.is_empty() {
        let rows: String = extra_fields
            .iter()
            .map(|(key, value)| {
                format!(
                    "<tr><td style=\"padding:4px 12px 4px 0;color:#757575;font-weight:bold;\
white-space:nowrap;vertical-align:top;\">{}</td>\
<td style=\"padding:4px 0;color:#333;\">{}</td></tr>",
                    escape(key),
                    escape(&value.to_string())
                )
            })
            .collect();
        body_html.push_str(&format!(
            "<hr style=\"border:none;border-top:1px solid #e0e0e0;margin:20px 0;\">\
<div style=\"font-size:12px;color:#757575;margin-bottom:6px;font-weight:bold;\">\
Additional Fields</div>\
<table style=\"width:100%;border-collapse:collapse;margin-bottom:16px;font-size:13px;\">\
{rows}</table>"
        ));
    }

    let display_title = subject.strip_prefix(SUBJECT_PREFIX).unwrap_or(subject);

    let body = format!(
        "<div style=\"background:#37474f;color:#ffffff;padding:20px 24px;\">\
<h1 style=\"margin:0;font-size:20px;font-weight:bold;\">{}</h1></div>\
<div style=\"padding:20px 24px;\">{body_html}</div>{}",
        escape(display_title),
        footer(ctx)
    );

    document(&body)
}

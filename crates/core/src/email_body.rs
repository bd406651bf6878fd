//! Email body rendering: a fixed HTML layout plus a derived plain-text part.
//!
//! Note content arrives as rich-text HTML from the editor. It is embedded
//! as-is in the layout. Every other interpolated value (titles, names) is
//! escaped. The plain-text alternative is produced from the final HTML by
//! [`html_to_text`], so both parts always carry the same words.

use std::sync::LazyLock;

use regex::Regex;

static HIDDEN_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(head|style|script)\b[^>]*>.*?</(head|style|script)>").expect("valid regex")
});
static LINE_BREAK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>|</(p|div|li|tr|h[1-6])>").expect("valid regex"));
static LIST_ITEM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<li\b[^>]*>").expect("valid regex"));
static BLOCK_EDGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<hr\b[^>]*>|</?(ul|ol)\b[^>]*>").expect("valid regex"));
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));
static BLANK_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid regex"));

/// Literal entity substitutions applied after tags are stripped.
/// `&amp;` goes last so `&amp;lt;` decodes to `&lt;`, not `<`.
const ENTITIES: &[(&str, &str)] = &[
    ("&nbsp;", " "),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#39;", "'"),
    ("&copy;", "\u{a9}"),
    ("&amp;", "&"),
];

/// A fully rendered message, ready for a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    pub subject: String,
    pub html: String,
    pub text: String,
}

/// Escape text for safe interpolation into HTML.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Convert an HTML document or fragment into readable plain text.
pub fn html_to_text(html: &str) -> String {
    let text = HIDDEN_BLOCK_RE.replace_all(html, "");
    let text = BLOCK_EDGE_RE.replace_all(&text, "\n");
    let text = LIST_ITEM_RE.replace_all(&text, "- ");
    let text = LINE_BREAK_RE.replace_all(&text, "\n");
    let text = TAG_RE.replace_all(&text, "");

    let mut text = text.into_owned();
    for (entity, replacement) in ENTITIES {
        text = text.replace(entity, replacement);
    }

    let text = text
        .lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n");
    BLANK_RUN_RE.replace_all(&text, "\n\n").trim().to_string()
}

/// Wrap `body_html` in the standard layout.
///
/// `heading` is escaped; `body_html` is trusted editor output.
pub fn wrap_html(app_name: &str, heading: &str, body_html: &str, year: i32) -> String {
    let app_name = escape_html(app_name);
    let heading = escape_html(heading);
    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>{heading}</title></head>
<body style="margin:0;padding:0;background:#f3f4f6;">
<div style="max-width:600px;margin:0 auto;padding:24px;background:#ffffff;font-family:Arial,Helvetica,sans-serif;color:#1f2937;line-height:1.5;">
<h1 style="font-size:20px;margin:0 0 16px;">{heading}</h1>
<div>{body_html}</div>
<hr style="border:none;border-top:1px solid #e5e7eb;margin:24px 0;">
<p style="font-size:12px;color:#6b7280;">&copy; {year} {app_name}. You are receiving this email because of activity in {app_name}.</p>
</div>
</body>
</html>"#
    )
}

fn finish(app_name: &str, subject: String, heading: &str, body_html: &str, year: i32) -> RenderedEmail {
    let html = wrap_html(app_name, heading, body_html, year);
    let text = html_to_text(&html);
    RenderedEmail {
        subject,
        html,
        text,
    }
}

/// A note delivered to its recipients.
pub fn render_note_email(
    app_name: &str,
    note_title: &str,
    note_html: &str,
    author_name: &str,
    year: i32,
) -> RenderedEmail {
    let body = format!(
        "{note_html}<p style=\"font-size:13px;color:#6b7280;\">Sent by {}</p>",
        escape_html(author_name)
    );
    finish(
        app_name,
        format!("[{app_name}] {note_title}"),
        note_title,
        &body,
        year,
    )
}

/// Tells the note owner that someone asked for edit access.
pub fn render_edit_request_received(
    app_name: &str,
    note_title: &str,
    requester_name: &str,
    requester_email: &str,
    review_url: &str,
    year: i32,
) -> RenderedEmail {
    let body = format!(
        "<p>{} &lt;{}&gt; has requested access to edit the note <strong>{}</strong>.</p>\
         <p>Review the request: <a href=\"{review_url}\">{review_url}</a></p>",
        escape_html(requester_name),
        escape_html(requester_email),
        escape_html(note_title),
    );
    finish(
        app_name,
        format!("[{app_name}] Edit access requested: {note_title}"),
        "New edit access request",
        &body,
        year,
    )
}

/// Gives an approved requester their edit link.
pub fn render_edit_access_approved(
    app_name: &str,
    note_title: &str,
    requester_name: &str,
    edit_url: &str,
    year: i32,
) -> RenderedEmail {
    let body = format!(
        "<p>Hi {},</p>\
         <p>Your request to edit <strong>{}</strong> was approved.</p>\
         <p>Open this link to make your changes: <a href=\"{edit_url}\">{edit_url}</a></p>\
         <p>Keep the link private. Anyone with it can edit the note until access is revoked.</p>",
        escape_html(requester_name),
        escape_html(note_title),
    );
    finish(
        app_name,
        format!("[{app_name}] Edit access approved: {note_title}"),
        "Edit access approved",
        &body,
        year,
    )
}

/// Tells an assignee about a new task.
pub fn render_task_assigned(
    app_name: &str,
    task_title: &str,
    due_date: Option<&str>,
    task_url: &str,
    year: i32,
) -> RenderedEmail {
    let due = due_date
        .map(|d| format!("<p>Due: {}</p>", escape_html(d)))
        .unwrap_or_default();
    let body = format!(
        "<p>You have been assigned a new task: <strong>{}</strong>.</p>{due}\
         <p><a href=\"{task_url}\">{task_url}</a></p>",
        escape_html(task_title),
    );
    finish(
        app_name,
        format!("[{app_name}] New task: {task_title}"),
        "New task assigned",
        &body,
        year,
    )
}

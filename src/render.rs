use std::borrow::Cow;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use regex::{Captures, Regex};
use crate::error::Result;
use crate::record::{AttachmentRecord, MessageRecord};

const EMOJI_CDN: &str = "https://cdn.discordapp.com/emojis";

const HEAD: &str = r#"<html><head><meta charset="utf-8">
<style>
.discord-message { background: #313338; color: #dbdee1; font-family: 'gg sans', 'Noto Sans', 'Helvetica Neue', Helvetica, Arial, sans-serif; border-radius: 8px; padding: 16px; margin: 20px; width: 480px; }
.discord-header { display: flex; align-items: center; }
.discord-avatar { width: 40px; height: 40px; border-radius: 50%; margin-right: 12px; }
.discord-username { font-weight: 600; color: #fff; font-size: 16px; margin-right: 8px; }
.discord-timestamp { color: #949ba4; font-size: 12px; }
.discord-content { margin-left: 52px; margin-top: -8px; font-size: 15px; word-break: break-word; }
.discord-attachment { margin-left: 52px; margin-top: 8px; }
</style></head><body style="background:#232428;">
"#;

const TAIL: &str = "\n</body></html>";

/// `<:name:id>` (static) and `<a:name:id>` (animated).
static EMOJI: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<(a?):([a-zA-Z0-9_]+):(\d+)>").unwrap());

/// The same tokens after `<` and `>` went through `escape`.
static ESCAPED_EMOJI: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&lt;(a?):([a-zA-Z0-9_]+):(\d+)&gt;").unwrap());

#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    /// Escape user-controlled text. Off by default, which keeps output
    /// identical to existing transcripts.
    pub escape_html: bool,
}

/// Build the whole transcript document from the history, oldest first.
pub fn render_document(records: &[MessageRecord], opts: RenderOptions) -> String {
    let mut html = String::from(HEAD);
    for record in records {
        render_message(&mut html, record, opts);
    }
    html.push_str(TAIL);
    html
}

/// Overwrite messages.html with a fresh rendering.
pub fn write_document(html_path: &Path, records: &[MessageRecord], opts: RenderOptions) -> Result<()> {
    if let Some(parent) = html_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(html_path, render_document(records, opts))?;
    Ok(())
}

fn render_message(html: &mut String, record: &MessageRecord, opts: RenderOptions) {
    let text = |s: &str| -> String {
        if opts.escape_html {
            escape(s).into_owned()
        } else {
            s.to_string()
        }
    };

    let avatar = text(record.avatar.as_deref().unwrap_or(""));
    let content = if opts.escape_html {
        expand_emojis_in(&ESCAPED_EMOJI, &escape(&record.content))
    } else {
        expand_emojis(&record.content)
    };

    html.push_str(&format!(
        r#"<div class="discord-message">
  <div class="discord-header">
    <img class="discord-avatar" src="{}">
    <span class="discord-username">{}</span>
    <span class="discord-timestamp">{}</span>
  </div>
  <div class="discord-content">{}</div>
"#,
        avatar,
        text(&record.username),
        text(&record.timestamp),
        content
    ));

    for att in &record.attachments {
        html.push_str(&render_attachment(att, &text));
    }
    html.push_str("</div>");
}

fn render_attachment(att: &AttachmentRecord, text: &dyn Fn(&str) -> String) -> String {
    if att.is_image {
        format!(
            r#"<div class="discord-attachment"><img src="{}" style="max-width:320px; border-radius:8px;"></div>"#,
            text(&att.filename)
        )
    } else {
        format!(
            r#"<div class="discord-attachment"><a href="{}">{}</a></div>"#,
            text(&att.filename),
            text(&att.orig_name)
        )
    }
}

/// Replace custom emoji tokens with CDN image tags. Tokens are expanded
/// whether or not the emoji exists.
pub fn expand_emojis(text: &str) -> String {
    expand_emojis_in(&EMOJI, text)
}

fn expand_emojis_in(pattern: &Regex, text: &str) -> String {
    pattern
        .replace_all(text, |caps: &Captures| {
            let ext = if caps[1].is_empty() { "png" } else { "gif" };
            format!(
                r#"<img src="{}/{}.{}" alt=":{}:" style="height:1.5em;vertical-align:-0.4em;">"#,
                EMOJI_CDN, &caps[3], ext, &caps[2]
            )
        })
        .into_owned()
}

pub fn escape(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len() + 16);
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    Cow::Owned(out)
}

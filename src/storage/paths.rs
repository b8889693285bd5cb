use std::path::{Path, PathBuf};

const TEXT_LOG: &str = "messages.txt";
const HTML_LOG: &str = "messages.html";
const MAX_FILENAME_LEN: usize = 64;
const IMAGE_EXTENSIONS: &[&str] = &[".png", ".jpg", ".jpeg", ".gif", ".webp"];

pub fn text_log_path(save_path: &Path) -> PathBuf {
    save_path.join(TEXT_LOG)
}

pub fn html_path(save_path: &Path) -> PathBuf {
    save_path.join(HTML_LOG)
}

/// `<sender-id>_avatar<ext>`, with the extension taken from the URL path
/// (query string and fragment ignored).
pub fn avatar_filename(sender_id: u64, avatar_url: &str) -> String {
    let path = match url::Url::parse(avatar_url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => avatar_url.split('?').next().unwrap_or_default().to_string(),
    };
    format!("{}_avatar{}", sender_id, sanitize_filename(extension(&path)))
}

/// `<message-id>_att<index><ext>`; `index` is 1-based and the extension comes
/// from the attachment's original name.
pub fn attachment_filename(message_id: u64, index: usize, orig_name: &str) -> String {
    format!(
        "{}_att{}{}",
        message_id,
        index,
        sanitize_filename(extension(orig_name))
    )
}

/// Extension including the leading dot, or "" when there is none.
/// Dots that only lead the final path component (".bashrc") don't count.
pub fn extension(name: &str) -> &str {
    let base = name.rsplit('/').next().unwrap_or(name);
    let stem_start = base.len() - base.trim_start_matches('.').len();
    match base[stem_start..].rfind('.') {
        Some(idx) => &base[stem_start + idx..],
        None => "",
    }
}

pub fn is_image(filename: &str) -> bool {
    let ext = extension(filename).to_ascii_lowercase();
    IMAGE_EXTENSIONS.contains(&ext.as_str())
}

/// Replace characters that are illegal in filenames on common platforms and
/// cap the length.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            other => other,
        })
        .take(MAX_FILENAME_LEN)
        .collect()
}

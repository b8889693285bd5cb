use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;
use crate::error::Result;
use crate::format::{self, ParseError};
use crate::record::History;

/// A text-log line that couldn't be parsed and was left out of the history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    /// 1-based line number in messages.txt.
    pub line_no: usize,
    pub reason: ParseError,
}

#[derive(Debug, Default)]
pub struct LoadReport {
    pub history: History,
    pub skipped: Vec<SkippedLine>,
}

/// Append one line to messages.txt, creating the save directory if needed.
pub fn append_message(log_path: &Path, timestamp: &str, username: &str, content: &str) -> Result<()> {
    if let Some(parent) = log_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = OpenOptions::new().create(true).append(true).open(log_path)?;
    file.write_all(format::format_log_line(timestamp, username, content).as_bytes())?;
    Ok(())
}

/// Load the history from messages.txt. A missing file is an empty history;
/// malformed lines are skipped and reported, never fatal.
pub fn load_history(log_path: &Path) -> Result<LoadReport> {
    let mut report = LoadReport::default();
    if !log_path.exists() {
        return Ok(report);
    }

    let bytes = fs::read(log_path)?;
    let text = String::from_utf8_lossy(&bytes);
    for (idx, line) in text.lines().enumerate() {
        match format::parse_log_line(line) {
            Ok(record) => report.history.push(record),
            Err(reason) => {
                tracing::warn!(line = idx + 1, %reason, "skipping malformed transcript line");
                report.skipped.push(SkippedLine { line_no: idx + 1, reason });
            }
        }
    }
    Ok(report)
}

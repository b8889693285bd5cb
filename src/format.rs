use chrono::{DateTime, Utc};
use crate::record::MessageRecord;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn format_timestamp(created_at: DateTime<Utc>) -> String {
    created_at.format(TIMESTAMP_FORMAT).to_string()
}

/// One text-log line: `[timestamp] name: content\n`
pub fn format_log_line(timestamp: &str, username: &str, content: &str) -> String {
    format!("[{}] {}: {}\n", timestamp, username, content)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    MissingTimestamp,
    MissingSeparator,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::MissingTimestamp => write!(f, "no [timestamp] prefix"),
            ParseError::MissingSeparator => write!(f, "no ': ' after the username"),
        }
    }
}

/// Parse a text-log line back into a record. The first `]` closes the
/// timestamp and the first `: ` after it ends the username, so usernames
/// can't contain `: ` but content can.
pub fn parse_log_line(line: &str) -> Result<MessageRecord, ParseError> {
    let line = line.trim_end_matches(['\n', '\r']);
    let inner = line.strip_prefix('[').ok_or(ParseError::MissingTimestamp)?;
    let ts_end = inner.find(']').ok_or(ParseError::MissingTimestamp)?;
    let timestamp = &inner[..ts_end];
    let rest = inner[ts_end + 1..]
        .strip_prefix(' ')
        .ok_or(ParseError::MissingSeparator)?;
    let (username, content) = rest.split_once(": ").ok_or(ParseError::MissingSeparator)?;
    Ok(MessageRecord::text_only(timestamp, username, content))
}

/// Plain one-line rendering for `history` output.
pub fn format_record(record: &MessageRecord) -> String {
    let mut line = format_log_line(&record.timestamp, &record.username, &record.content);
    line.pop();
    for att in &record.attachments {
        line.push_str(&format!(" [{}]", att.orig_name));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::AttachmentRecord;

    #[test]
    fn test_format_timestamp() {
        let ts = DateTime::parse_from_rfc3339("2025-01-15T14:30:05.123+00:00")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(format_timestamp(ts), "2025-01-15 14:30:05");
    }

    #[test]
    fn test_format_log_line() {
        assert_eq!(
            format_log_line("2025-01-15 14:30:05", "Amy", "hello"),
            "[2025-01-15 14:30:05] Amy: hello\n"
        );
    }

    #[test]
    fn test_parse_log_line() {
        let record = parse_log_line("[2025-01-15 14:30:05] Amy: hello world\n").unwrap();
        assert_eq!(record.timestamp, "2025-01-15 14:30:05");
        assert_eq!(record.username, "Amy");
        assert_eq!(record.content, "hello world");
        assert!(record.avatar.is_none());
        assert!(record.attachments.is_empty());
    }

    #[test]
    fn test_parse_log_line_content_with_separator() {
        let record = parse_log_line("[t] Amy: note: bring snacks").unwrap();
        assert_eq!(record.username, "Amy");
        assert_eq!(record.content, "note: bring snacks");
    }

    #[test]
    fn test_parse_log_line_empty_content() {
        let record = parse_log_line("[t] Amy: \r\n").unwrap();
        assert_eq!(record.content, "");
    }

    #[test]
    fn test_parse_log_line_missing_bracket() {
        assert_eq!(
            parse_log_line("[2025-01-15 14:30:05 Amy: hi"),
            Err(ParseError::MissingTimestamp)
        );
        assert_eq!(parse_log_line("Amy: hi"), Err(ParseError::MissingTimestamp));
    }

    #[test]
    fn test_parse_log_line_missing_separator() {
        assert_eq!(
            parse_log_line("[2025-01-15 14:30:05] Amy says hi"),
            Err(ParseError::MissingSeparator)
        );
    }

    #[test]
    fn test_parse_round_trips_format() {
        let line = format_log_line("2025-01-15 14:30:05", "Amy", "<:wave:1> hi");
        let record = parse_log_line(&line).unwrap();
        assert_eq!(record, MessageRecord::text_only("2025-01-15 14:30:05", "Amy", "<:wave:1> hi"));
    }

    #[test]
    fn test_format_record_lists_attachments() {
        let mut record = MessageRecord::text_only("t", "Amy", "look");
        record.attachments.push(AttachmentRecord {
            filename: "1_att1.png".into(),
            orig_name: "cat.png".into(),
            is_image: true,
        });
        assert_eq!(format_record(&record), "[t] Amy: look [cat.png]");
    }
}

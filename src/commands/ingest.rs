use std::io::{self, BufRead};
use std::path::Path;
use crate::error::{Result, TranscriptError};
use crate::event::{self, IncomingMessage};
use crate::fetch::{Fetcher, HttpFetcher};
use crate::logger::{Outcome, TranscriptLogger};
use crate::storage::config;

/// Open the logger once and feed it every event on stdin until EOF, so the
/// history keeps avatar and attachment metadata for the whole run.
pub fn run(config_path: &Path) -> Result<()> {
    let config = config::read_config(config_path)?;
    let fetcher = HttpFetcher::new(&config.user_agent)?;
    let (mut logger, _skipped) = TranscriptLogger::open(config, fetcher)?;

    ingest_lines(&mut logger, io::stdin().lock())
}

/// Handle one event per non-blank line. Unparseable lines are reported and
/// skipped; a storage error stops the run.
pub fn ingest_lines<F: Fetcher>(logger: &mut TranscriptLogger<F>, input: impl BufRead) -> Result<()> {
    let mut rejected = 0;
    for (idx, line) in input.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let event = match event::parse_event(&line) {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!(line = idx + 1, error = %e, "skipping unparseable event");
                eprintln!("line {}: {}", idx + 1, e);
                rejected += 1;
                continue;
            }
        };
        let outcome = logger.handle(&event)?;
        report(&event, outcome);
    }

    if rejected > 0 {
        return Err(TranscriptError::RejectedEvents(rejected));
    }
    Ok(())
}

fn report(event: &IncomingMessage, outcome: Outcome) {
    match outcome {
        // Ignored events print nothing
        Outcome::Ignored(_) => {}
        Outcome::Logged(logged) => {
            if !logged.avatar_fetched {
                tracing::debug!(avatar = ?logged.record.avatar, "avatar already cached");
            }
            println!(
                "Logged message {} ({} attachments, {} failed downloads).",
                event.id,
                logged.record.attachments.len(),
                logged.failed_downloads.len()
            );
            for failure in &logged.failed_downloads {
                eprintln!(
                    "Could not download {} from {}: {}",
                    failure.filename, failure.url, failure.error
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::FetchError;
    use crate::record::History;
    use crate::storage::config::Config;
    use std::fs;
    use tempfile::TempDir;

    /// Every URL answers with its own text as the body.
    struct EchoFetcher;

    impl Fetcher for EchoFetcher {
        fn fetch(&self, url: &str) -> std::result::Result<Vec<u8>, FetchError> {
            Ok(url.as_bytes().to_vec())
        }
    }

    fn line(id: u64, content: &str, attachment: Option<&str>) -> String {
        let attachments: Vec<_> = attachment
            .map(|name| serde_json::json!({"url": format!("https://cdn.test/{}", name), "filename": name}))
            .into_iter()
            .collect();
        serde_json::json!({
            "id": id,
            "author": {"id": 1234, "display_name": "Amy", "avatar_url": "https://cdn.test/a.png"},
            "created_at": "2025-01-15T14:30:05Z",
            "content": content,
            "attachments": attachments,
        })
        .to_string()
    }

    #[test]
    fn one_logger_keeps_metadata_across_events() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("dm");
        let mut logger = TranscriptLogger::new(Config::new(1234, &dir), History::new(), EchoFetcher);

        let input = format!("{}\n\n{}\n", line(1, "first", Some("p.png")), line(2, "second", None));
        ingest_lines(&mut logger, input.as_bytes()).unwrap();

        assert_eq!(logger.history().len(), 2);
        assert_eq!(logger.history().records()[0].attachments[0].filename, "1_att1.png");
        let html = fs::read_to_string(dir.join("messages.html")).unwrap();
        assert!(html.contains(r#"<img src="1_att1.png""#));
        assert_eq!(html.matches(r#"src="1234_avatar.png""#).count(), 2);
    }

    #[test]
    fn bad_lines_are_skipped_then_reported() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("dm");
        let mut logger = TranscriptLogger::new(Config::new(1234, &dir), History::new(), EchoFetcher);

        let input = format!("{{oops\n{}\n", line(2, "after the bad line", None));
        let err = ingest_lines(&mut logger, input.as_bytes()).unwrap_err();

        assert!(matches!(err, TranscriptError::RejectedEvents(1)));
        assert_eq!(logger.history().len(), 1);
        assert_eq!(logger.history().records()[0].content, "after the bad line");
    }
}

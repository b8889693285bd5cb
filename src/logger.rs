use std::fs;
use std::path::Path;
use crate::error::Result;
use crate::event::IncomingMessage;
use crate::fetch::{FetchError, Fetcher};
use crate::format;
use crate::record::{AttachmentRecord, History, MessageRecord};
use crate::render::{self, RenderOptions};
use crate::storage::config::Config;
use crate::storage::log::{self, SkippedLine};
use crate::storage::paths;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    NotPrivate,
    OtherSender,
    Bot,
}

/// A download that produced no file. The record still names the file.
#[derive(Debug)]
pub struct DownloadFailure {
    pub filename: String,
    pub url: String,
    pub error: FetchError,
}

#[derive(Debug)]
pub struct Logged {
    pub record: MessageRecord,
    /// False when the avatar was already cached.
    pub avatar_fetched: bool,
    pub failed_downloads: Vec<DownloadFailure>,
}

#[derive(Debug)]
pub enum Outcome {
    Ignored(IgnoreReason),
    Logged(Logged),
}

/// Logs direct messages from one user to messages.txt and re-renders
/// messages.html after each one. Events must be handed over one at a time.
pub struct TranscriptLogger<F> {
    config: Config,
    history: History,
    fetcher: F,
}

impl<F: Fetcher> TranscriptLogger<F> {
    pub fn new(config: Config, history: History, fetcher: F) -> Self {
        TranscriptLogger { config, history, fetcher }
    }

    /// Build a logger whose history is loaded from the configured text log.
    pub fn open(config: Config, fetcher: F) -> Result<(Self, Vec<SkippedLine>)> {
        let report = log::load_history(&paths::text_log_path(&config.save_path))?;
        tracing::debug!(
            loaded = report.history.len(),
            skipped = report.skipped.len(),
            "loaded transcript history"
        );
        Ok((Self::new(config, report.history, fetcher), report.skipped))
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn admit(&self, event: &IncomingMessage) -> std::result::Result<(), IgnoreReason> {
        if !event.is_private() {
            return Err(IgnoreReason::NotPrivate);
        }
        if event.author.id != self.config.target_user_id {
            return Err(IgnoreReason::OtherSender);
        }
        if event.author.bot {
            return Err(IgnoreReason::Bot);
        }
        Ok(())
    }

    /// Filter, append to the text log, fetch media, then rewrite the HTML.
    /// Storage errors abort the message; download errors are collected.
    pub fn handle(&mut self, event: &IncomingMessage) -> Result<Outcome> {
        if let Err(reason) = self.admit(event) {
            tracing::debug!(message_id = event.id, ?reason, "ignoring message");
            return Ok(Outcome::Ignored(reason));
        }

        let save_path = self.config.save_path.clone();
        fs::create_dir_all(&save_path)?;

        let timestamp = format::format_timestamp(event.created_at);
        log::append_message(
            &paths::text_log_path(&save_path),
            &timestamp,
            &event.author.display_name,
            &event.content,
        )?;

        let mut failed_downloads = Vec::new();

        let avatar = paths::avatar_filename(event.author.id, &event.author.avatar_url);
        let avatar_path = save_path.join(&avatar);
        let avatar_fetched = !avatar_path.exists();
        if avatar_fetched {
            if let Some(failure) = self.download(&event.author.avatar_url, &save_path, &avatar)? {
                failed_downloads.push(failure);
            }
        }

        let mut attachments = Vec::with_capacity(event.attachments.len());
        for (idx, att) in event.attachments.iter().enumerate() {
            let filename = paths::attachment_filename(event.id, idx + 1, &att.filename);
            if let Some(failure) = self.download(&att.url, &save_path, &filename)? {
                failed_downloads.push(failure);
            }
            attachments.push(AttachmentRecord {
                is_image: paths::is_image(&att.filename),
                filename,
                orig_name: att.filename.clone(),
            });
        }

        let record = MessageRecord {
            timestamp,
            username: event.author.display_name.clone(),
            content: event.content.clone(),
            avatar: Some(avatar),
            attachments,
        };
        self.history.push(record.clone());
        self.render()?;

        tracing::info!(
            message_id = event.id,
            attachments = record.attachments.len(),
            failed = failed_downloads.len(),
            "logged direct message"
        );
        Ok(Outcome::Logged(Logged { record, avatar_fetched, failed_downloads }))
    }

    /// Rewrite messages.html from the full in-memory history.
    pub fn render(&self) -> Result<()> {
        render::write_document(
            &paths::html_path(&self.config.save_path),
            self.history.records(),
            RenderOptions { escape_html: self.config.escape_html },
        )
    }

    /// GET `url` into `save_path/filename`. Only a write failure is an error.
    fn download(&self, url: &str, save_path: &Path, filename: &str) -> Result<Option<DownloadFailure>> {
        match self.fetcher.fetch(url) {
            Ok(body) => {
                fs::write(save_path.join(filename), body)?;
                Ok(None)
            }
            Err(error) => {
                tracing::warn!(%url, %filename, %error, "download failed, file not written");
                Ok(Some(DownloadFailure {
                    filename: filename.to_string(),
                    url: url.to_string(),
                    error,
                }))
            }
        }
    }
}

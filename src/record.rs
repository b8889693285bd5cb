use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttachmentRecord {
    /// Stored name inside the save directory.
    pub filename: String,
    pub orig_name: String,
    pub is_image: bool,
}

/// One logged message. Records reloaded from messages.txt carry no avatar
/// and no attachments; the text format doesn't keep them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageRecord {
    pub timestamp: String,
    pub username: String,
    pub content: String,
    pub avatar: Option<String>,
    pub attachments: Vec<AttachmentRecord>,
}

impl MessageRecord {
    pub fn text_only(timestamp: &str, username: &str, content: &str) -> Self {
        MessageRecord {
            timestamp: timestamp.to_string(),
            username: username.to_string(),
            content: content.to_string(),
            avatar: None,
            attachments: Vec::new(),
        }
    }
}

/// Append-only, chronologically ordered message history.
#[derive(Debug, Default, Clone)]
pub struct History {
    records: Vec<MessageRecord>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: MessageRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[MessageRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The last `n` records (all of them when `n` exceeds the length).
    pub fn tail(&self, n: usize) -> &[MessageRecord] {
        let start = self.records.len().saturating_sub(n);
        &self.records[start..]
    }
}

impl From<Vec<MessageRecord>> for History {
    fn from(records: Vec<MessageRecord>) -> Self {
        History { records }
    }
}

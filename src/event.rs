use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use crate::error::Result;

/// A message-received notification handed over by the bot framework.
#[derive(Debug, Clone, Deserialize)]
pub struct IncomingMessage {
    #[serde(deserialize_with = "snowflake")]
    pub id: u64,
    /// Absent for direct messages.
    #[serde(default, deserialize_with = "optional_snowflake")]
    pub guild_id: Option<u64>,
    pub author: Author,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Author {
    #[serde(deserialize_with = "snowflake")]
    pub id: u64,
    pub display_name: String,
    #[serde(default)]
    pub bot: bool,
    pub avatar_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Attachment {
    pub url: String,
    pub filename: String,
}

impl IncomingMessage {
    pub fn is_private(&self) -> bool {
        self.guild_id.is_none()
    }
}

/// Ids arrive either as JSON numbers or as decimal strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(u64),
    Text(String),
}

impl RawId {
    fn into_u64<E: serde::de::Error>(self) -> std::result::Result<u64, E> {
        match self {
            RawId::Number(n) => Ok(n),
            RawId::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| E::custom(format!("invalid id: {:?}", s))),
        }
    }
}

fn snowflake<'de, D: Deserializer<'de>>(de: D) -> std::result::Result<u64, D::Error> {
    RawId::deserialize(de)?.into_u64()
}

fn optional_snowflake<'de, D: Deserializer<'de>>(de: D) -> std::result::Result<Option<u64>, D::Error> {
    Option::<RawId>::deserialize(de)?
        .map(RawId::into_u64)
        .transpose()
}

pub fn parse_event(input: &str) -> Result<IncomingMessage> {
    Ok(serde_json::from_str(input)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_direct_message() {
        let json = r#"{
            "id": "1100000000000000001",
            "author": {
                "id": "1234",
                "display_name": "Amy",
                "avatar_url": "https://cdn.discordapp.com/avatars/1234/abc.png?size=128"
            },
            "created_at": "2025-01-15T14:30:05.512Z",
            "content": "hi",
            "attachments": [{"url": "https://cdn.example/x.png", "filename": "x.png"}]
        }"#;
        let event = parse_event(json).unwrap();
        assert_eq!(event.id, 1_100_000_000_000_000_001);
        assert!(event.is_private());
        assert_eq!(event.author.id, 1234);
        assert!(!event.author.bot);
        assert_eq!(event.attachments.len(), 1);
        assert_eq!(event.attachments[0].filename, "x.png");
    }

    #[test]
    fn parse_guild_message_with_numeric_ids() {
        let json = r#"{
            "id": 5,
            "guild_id": 77,
            "author": {"id": 9, "display_name": "Bot", "bot": true, "avatar_url": ""},
            "created_at": "2025-01-15T14:30:05Z"
        }"#;
        let event = parse_event(json).unwrap();
        assert_eq!(event.guild_id, Some(77));
        assert!(!event.is_private());
        assert!(event.author.bot);
        assert_eq!(event.content, "");
        assert!(event.attachments.is_empty());
    }

    #[test]
    fn null_guild_is_private() {
        let json = r#"{
            "id": 5, "guild_id": null,
            "author": {"id": 9, "display_name": "Amy", "avatar_url": ""},
            "created_at": "2025-01-15T14:30:05Z"
        }"#;
        assert!(parse_event(json).unwrap().is_private());
    }

    #[test]
    fn bad_id_is_rejected() {
        let json = r#"{
            "id": "not-a-number",
            "author": {"id": 9, "display_name": "Amy", "avatar_url": ""},
            "created_at": "2025-01-15T14:30:05Z"
        }"#;
        assert!(parse_event(json).is_err());
    }
}

//! Command parser - Recognizes "mention or prefix" commands in raw message text

use crate::domain::entities::Content;

/// Parses incoming message text into structured content
#[derive(Debug, Clone)]
pub struct CommandParser {
    command_prefix: String,
    mentions: Vec<String>,
}

impl CommandParser {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            command_prefix: prefix.into(),
            mentions: Vec::new(),
        }
    }

    /// Also accept `<@id>` and `<@!id>` mentions of the bot as a prefix
    pub fn with_mention(mut self, bot_id: u64) -> Self {
        self.mentions = vec![format!("<@{}>", bot_id), format!("<@!{}>", bot_id)];
        self
    }

    /// Parse a text message
    pub fn parse(&self, text: &str) -> Content {
        let trimmed = text.trim_start();
        if trimmed.is_empty() {
            return Content::Empty;
        }

        match self.strip_prefix(trimmed) {
            Some(rest) => Self::parse_command(rest).unwrap_or_else(|| Content::Text(text.to_string())),
            None => Content::Text(text.to_string()),
        }
    }

    fn strip_prefix<'a>(&self, text: &'a str) -> Option<&'a str> {
        for mention in &self.mentions {
            if let Some(rest) = text.strip_prefix(mention.as_str()) {
                return Some(rest.trim_start());
            }
        }
        if self.command_prefix.is_empty() {
            return None;
        }
        text.strip_prefix(self.command_prefix.as_str())
    }

    /// Split command and arguments
    fn parse_command(text: &str) -> Option<Content> {
        let mut parts = text.split_whitespace();
        let name = parts.next()?.to_lowercase();
        let args = parts.map(|s| s.to_string()).collect();
        Some(Content::Command { name, args })
    }
}

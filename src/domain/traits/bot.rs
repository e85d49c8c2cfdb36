use async_trait::async_trait;

use crate::application::errors::BotError;
use crate::domain::entities::CommandSpec;

/// Pushes the bot's command tree to the chat platform
#[async_trait]
pub trait CommandSync: Send + Sync {
    /// Replace the platform's global command set. Returns how many commands were registered.
    async fn sync(&self, commands: &[CommandSpec]) -> Result<usize, BotError>;
}

/// Who the bot is logged in as
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotIdentity {
    pub id: u64,
    pub name: String,
}

impl BotIdentity {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl std::fmt::Display for BotIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

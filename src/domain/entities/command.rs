use async_trait::async_trait;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use super::Invocation;
use crate::application::errors::{CommandError, ExtensionError};

/// Fallback text for commands registered without a description
const DEFAULT_DESCRIPTION: &str = "No description";

/// Async handler behind a command
#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn call(&self, invocation: Invocation) -> Result<String, CommandError>;
}

/// Adapts an async closure into a [`CommandHandler`]
struct FnHandler<F>(F);

#[async_trait]
impl<F, Fut> CommandHandler for FnHandler<F>
where
    F: Fn(Invocation) -> Fut + Send + Sync,
    Fut: Future<Output = Result<String, CommandError>> + Send + 'static,
{
    async fn call(&self, invocation: Invocation) -> Result<String, CommandError> {
        (self.0)(invocation).await
    }
}

/// Represents a bot command
#[derive(Clone)]
pub struct Command {
    pub name: String,
    pub description: Option<String>,
    pub usage: Option<String>,
    /// Name of the extension that attached this command
    pub extension: String,
    pub handler: Option<Arc<dyn CommandHandler>>,
}

impl Command {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into().to_lowercase(),
            description: None,
            usage: None,
            extension: String::new(),
            handler: None,
        }
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    pub fn with_usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = Some(usage.into());
        self
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn with_handler<F, Fut>(mut self, handler: F) -> Self
    where
        F: Fn(Invocation) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<String, CommandError>> + Send + 'static,
    {
        self.handler = Some(Arc::new(FnHandler(handler)));
        self
    }

    pub fn spec(&self) -> CommandSpec {
        CommandSpec {
            name: self.name.clone(),
            description: self
                .description
                .clone()
                .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
        }
    }

    pub async fn run(&self, invocation: Invocation) -> Result<String, CommandError> {
        match &self.handler {
            Some(handler) => handler.call(invocation).await,
            None => Ok(format!("Command {} not implemented", self.name)),
        }
    }
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("extension", &self.extension)
            .finish()
    }
}

/// What gets pushed to the platform when the command tree is synced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub name: String,
    pub description: String,
}

/// Command registry for managing attached commands
#[derive(Default)]
pub struct CommandRegistry {
    commands: HashMap<String, Command>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a batch of commands from one extension.
    ///
    /// Either every command is attached or none is.
    pub fn attach(&mut self, extension: &str, commands: Vec<Command>) -> Result<usize, ExtensionError> {
        let mut seen = HashMap::new();
        for cmd in &commands {
            let owner = self
                .commands
                .get(&cmd.name)
                .map(|c| c.extension.clone())
                .or_else(|| seen.get(&cmd.name).cloned());
            if let Some(owner) = owner {
                return Err(ExtensionError::CommandConflict {
                    command: cmd.name.clone(),
                    extension: extension.to_string(),
                    owner,
                });
            }
            seen.insert(cmd.name.clone(), extension.to_string());
        }

        let count = commands.len();
        for cmd in commands {
            let cmd = cmd.with_extension(extension);
            self.commands.insert(cmd.name.clone(), cmd);
        }
        Ok(count)
    }

    pub fn get(&self, name: &str) -> Option<&Command> {
        self.commands.get(name)
    }

    pub fn find(&self, input: &str) -> Option<&Command> {
        self.commands.get(&input.to_lowercase())
    }

    pub fn all(&self) -> impl Iterator<Item = &Command> {
        self.commands.values()
    }

    /// Specs for every attached command, sorted by name
    pub fn specs(&self) -> Vec<CommandSpec> {
        let mut specs: Vec<CommandSpec> = self.commands.values().map(Command::spec).collect();
        specs.sort_by(|a, b| a.name.cmp(&b.name));
        specs
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

use tokio::sync::RwLock;

use crate::application::errors::{CommandError, ExtensionError};
use crate::application::messaging::CommandParser;
use crate::domain::entities::{Command, CommandRegistry, CommandSpec, Content, Invocation};

/// Name of the help command every bot answers, whatever extensions are loaded
pub const HELP_COMMAND: &str = "help";

/// Service owning the bot's command namespace
pub struct CommandService {
    registry: RwLock<CommandRegistry>,
    prefix: String,
}

impl CommandService {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            registry: RwLock::new(CommandRegistry::new()),
            prefix: prefix.into(),
        }
    }

    /// Attach one extension's commands
    pub async fn attach(&self, extension: &str, commands: Vec<Command>) -> Result<usize, ExtensionError> {
        if let Some(cmd) = commands.iter().find(|c| c.name == HELP_COMMAND) {
            return Err(ExtensionError::CommandConflict {
                command: cmd.name.clone(),
                extension: extension.to_string(),
                owner: "core".to_string(),
            });
        }
        self.registry.write().await.attach(extension, commands)
    }

    /// Everything the command tree sync should register, help included
    pub async fn specs(&self) -> Vec<CommandSpec> {
        let mut specs = self.registry.read().await.specs();
        specs.push(CommandSpec {
            name: HELP_COMMAND.to_string(),
            description: "Show available commands".to_string(),
        });
        specs.sort_by(|a, b| a.name.cmp(&b.name));
        specs
    }

    pub async fn len(&self) -> usize {
        self.registry.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.registry.read().await.is_empty()
    }

    /// Run a command by name
    pub async fn invoke(&self, name: &str, invocation: Invocation) -> Result<String, CommandError> {
        if name.eq_ignore_ascii_case(HELP_COMMAND) {
            return Ok(self.get_help(invocation.args.first().map(String::as_str)).await);
        }

        // Clone out so the lock isn't held across the handler
        let cmd = self
            .registry
            .read()
            .await
            .find(name)
            .cloned()
            .ok_or_else(|| CommandError::NotFound(name.to_string()))?;

        cmd.run(invocation).await
    }

    /// Run parsed content; plain text yields `None`
    pub async fn handle(&self, content: &Content, invocation: Invocation) -> Result<Option<String>, CommandError> {
        let Content::Command { name, args } = content else {
            return Ok(None);
        };

        let invocation = invocation.with_args(args.clone());
        self.invoke(name, invocation).await.map(Some)
    }

    pub async fn get_help(&self, command: Option<&str>) -> String {
        let registry = self.registry.read().await;

        if let Some(name) = command {
            if let Some(cmd) = registry.find(name) {
                let mut help = format!(
                    "{}{} - {}",
                    self.prefix,
                    cmd.name,
                    cmd.description.as_deref().unwrap_or("No description")
                );
                if let Some(usage) = &cmd.usage {
                    help.push_str(&format!("\nUsage: {}", usage));
                }
                return help;
            }
            return format!("Command {}{} not found", self.prefix, name);
        }

        let mut names: Vec<&Command> = registry.all().collect();
        names.sort_by(|a, b| a.name.cmp(&b.name));

        let mut help = "Available commands:\n".to_string();
        help.push_str(&format!("  {}{} - Show this message\n", self.prefix, HELP_COMMAND));
        for cmd in names {
            help.push_str(&format!(
                "  {}{} - {}\n",
                self.prefix,
                cmd.name,
                cmd.description.as_deref().unwrap_or("")
            ));
        }
        help
    }

    /// Parser for this service's prefix, optionally also accepting mentions of `bot_id`
    pub fn parser(&self, bot_id: Option<u64>) -> CommandParser {
        let parser = CommandParser::new(self.prefix.clone());
        match bot_id {
            Some(id) => parser.with_mention(id),
            None => parser,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn greet() -> Command {
        Command::new("greet")
            .with_description("Say hello")
            .with_usage("!greet [name]")
            .with_handler(|inv: Invocation| async move {
                let who = inv.args.first().cloned().unwrap_or(inv.author_name);
                Ok(format!("Hello, {}!", who))
            })
    }

    #[tokio::test]
    async fn test_handle_command_and_text() {
        let service = CommandService::new("!");
        service.attach("greetings", vec![greet()]).await.unwrap();
        let parser = service.parser(None);

        let reply = service
            .handle(&parser.parse("!greet Ana"), Invocation::new(1, "bob"))
            .await
            .unwrap();
        assert_eq!(reply.as_deref(), Some("Hello, Ana!"));

        let reply = service
            .handle(&parser.parse("just chatting"), Invocation::new(1, "bob"))
            .await
            .unwrap();
        assert_eq!(reply, None);
    }

    #[tokio::test]
    async fn test_unknown_command() {
        let service = CommandService::new("!");
        let err = service.invoke("nope", Invocation::new(1, "bob")).await.unwrap_err();
        assert!(matches!(err, CommandError::NotFound(ref n) if n == "nope"));
    }

    #[tokio::test]
    async fn test_help_is_reserved_and_listed() {
        let service = CommandService::new("!");
        service.attach("greetings", vec![greet()]).await.unwrap();

        let err = service
            .attach("rogue", vec![Command::new("help")])
            .await
            .unwrap_err();
        assert!(matches!(err, ExtensionError::CommandConflict { .. }));

        let help = service.invoke("help", Invocation::new(1, "bob")).await.unwrap();
        assert!(help.contains("!greet - Say hello"));

        let detail = service.get_help(Some("greet")).await;
        assert!(detail.contains("Usage: !greet [name]"));

        let names: Vec<String> = service.specs().await.into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["greet", "help"]);
    }
}

//! Discord adapter

use async_trait::async_trait;
use serenity::all::{
    Command as SlashCommand, CommandInteraction, CommandOptionType, Context, CreateCommand,
    CreateCommandOption, CreateInteractionResponse, CreateInteractionResponseMessage, EventHandler,
    GatewayIntents, Http, Interaction, Message, Ready,
};
use std::sync::Arc;

use crate::application::client::BotClient;
use crate::application::errors::{BotError, CommandError};
use crate::application::messaging::{EventDispatcher, HandlerResult};
use crate::domain::entities::{CommandSpec, Invocation};
use crate::domain::traits::{BotIdentity, CommandSync};

/// Name of the free-text option every slash command carries
const ARGS_OPTION: &str = "args";

/// Discord rejects message bodies above this many characters
const MAX_MESSAGE_LEN: usize = 2000;

/// Gateway intents: the non-privileged defaults plus the member list and message content
pub fn intents() -> GatewayIntents {
    GatewayIntents::non_privileged() | GatewayIntents::GUILD_MEMBERS | GatewayIntents::MESSAGE_CONTENT
}

/// Trim a reply to what Discord accepts
fn clamp_reply(text: &str) -> String {
    if text.chars().count() <= MAX_MESSAGE_LEN {
        return text.to_string();
    }
    let mut out: String = text.chars().take(MAX_MESSAGE_LEN - 3).collect();
    out.push_str("...");
    out
}

/// Reply text for a command that failed; not-found stays quiet for prefix messages
fn error_reply(err: &CommandError) -> String {
    match err {
        CommandError::InvalidArgs(msg) => format!("Invalid arguments: {}", msg),
        _ => "Something went wrong running that command.".to_string(),
    }
}

/// Serenity event handler feeding the platform-independent client
struct DiscordHandler {
    client: Arc<BotClient>,
    dispatcher: Arc<EventDispatcher>,
}

impl DiscordHandler {
    async fn on_message(&self, ctx: &Context, msg: &Message) -> HandlerResult {
        if msg.author.bot {
            return Ok(());
        }

        let invocation = Invocation::new(msg.author.id.get(), msg.author.name.clone());
        let reply = match self.client.handle_text(&msg.content, invocation).await {
            Ok(Some(reply)) => reply,
            Ok(None) => return Ok(()),
            Err(CommandError::NotFound(name)) => {
                tracing::debug!("Ignoring unknown command {}", name);
                return Ok(());
            }
            Err(e) => {
                msg.channel_id.say(&ctx.http, error_reply(&e)).await?;
                return Err(e.into());
            }
        };

        msg.channel_id.say(&ctx.http, clamp_reply(&reply)).await?;
        Ok(())
    }

    async fn on_command(&self, ctx: &Context, command: &CommandInteraction) -> HandlerResult {
        let args = command
            .data
            .options
            .iter()
            .find(|o| o.name == ARGS_OPTION)
            .and_then(|o| o.value.as_str())
            .map(|s| s.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default();

        let invocation =
            Invocation::new(command.user.id.get(), command.user.name.clone()).with_args(args);
        let result = self.client.invoke(&command.data.name, invocation).await;

        let content = match &result {
            Ok(reply) => clamp_reply(reply),
            Err(CommandError::NotFound(name)) => format!("Unknown command: {}", name),
            Err(e) => error_reply(e),
        };
        let response = CreateInteractionResponse::Message(
            CreateInteractionResponseMessage::new().content(content),
        );
        command.create_response(&ctx.http, response).await?;

        result.map(|_| ()).map_err(BotError::from)
    }
}

#[serenity::async_trait]
impl EventHandler for DiscordHandler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        self.dispatcher
            .dispatch("on_ready", async {
                self.client
                    .on_ready(BotIdentity::new(ready.user.id.get(), ready.user.name.clone()));
                Ok(())
            })
            .await;
    }

    async fn message(&self, ctx: Context, msg: Message) {
        self.dispatcher
            .dispatch("on_message", self.on_message(&ctx, &msg))
            .await;
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        if let Interaction::Command(command) = interaction {
            self.dispatcher
                .dispatch("on_application_command", self.on_command(&ctx, &command))
                .await;
        }
    }
}

/// Pushes command specs as global application commands
pub struct SerenityCommandSync {
    http: Arc<Http>,
}

impl SerenityCommandSync {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }

    fn build(spec: &CommandSpec) -> CreateCommand {
        CreateCommand::new(spec.name.clone())
            .description(spec.description.clone())
            .add_option(
                CreateCommandOption::new(CommandOptionType::String, ARGS_OPTION, "Command arguments")
                    .required(false),
            )
    }
}

#[async_trait]
impl CommandSync for SerenityCommandSync {
    async fn sync(&self, commands: &[CommandSpec]) -> Result<usize, BotError> {
        if self.http.application_id().is_none() {
            let info = self.http.get_current_application_info().await?;
            self.http.set_application_id(info.id);
        }

        let builders = commands.iter().map(Self::build).collect();
        let registered = SlashCommand::set_global_commands(&self.http, builders).await?;
        Ok(registered.len())
    }
}

/// Connect to Discord and block until the gateway shuts down.
///
/// A bad token surfaces here as the process's one unrecovered error.
pub async fn run(client: Arc<BotClient>, dispatcher: Arc<EventDispatcher>, token: &str) -> Result<(), BotError> {
    let handler = DiscordHandler {
        client: client.clone(),
        dispatcher,
    };

    let mut discord = serenity::Client::builder(token, intents())
        .event_handler(handler)
        .await?;

    tracing::info!("Discord client built, running setup hook");
    client.setup_hook(&SerenityCommandSync::new(discord.http.clone())).await?;

    let result = discord.start().await;
    client.on_disconnect();
    result.map_err(BotError::from)
}

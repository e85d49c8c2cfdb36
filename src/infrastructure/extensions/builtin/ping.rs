use async_trait::async_trait;

use crate::application::errors::ExtensionError;
use crate::domain::entities::{Command, Invocation};
use crate::infrastructure::extensions::catalog::{Extension, ExtensionContext};

pub const NAME: &str = "ping";

/// Liveness check. The reply text can be changed with the `reply` setting.
pub struct Ping;

#[async_trait]
impl Extension for Ping {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Responds to ping"
    }

    async fn setup(&self, ctx: &ExtensionContext) -> Result<Vec<Command>, ExtensionError> {
        let reply = ctx.manifest.setting("reply").unwrap_or("Pong!").to_string();

        Ok(vec![Command::new("ping")
            .with_description("Check that the bot is responsive")
            .with_handler(move |_: Invocation| {
                let reply = reply.clone();
                async move { Ok(reply) }
            })])
    }
}

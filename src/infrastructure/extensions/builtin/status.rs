use async_trait::async_trait;

use crate::application::errors::{CommandError, ExtensionError};
use crate::domain::entities::{Command, Invocation};
use crate::infrastructure::extensions::catalog::{Extension, ExtensionContext};

pub const NAME: &str = "status";

/// Reports whether a configured URL answers, over the shared HTTP client
pub struct Status;

#[async_trait]
impl Extension for Status {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Checks a remote service"
    }

    async fn setup(&self, ctx: &ExtensionContext) -> Result<Vec<Command>, ExtensionError> {
        let raw = ctx.manifest.require(NAME, "url")?;
        let url = reqwest::Url::parse(raw).map_err(|e| ExtensionError::Setup {
            name: NAME.to_string(),
            reason: format!("invalid url '{}': {}", raw, e),
        })?;
        let http = ctx.http.clone();

        Ok(vec![Command::new("status")
            .with_description("Check whether the remote service is up")
            .with_handler(move |_: Invocation| {
                let http = http.clone();
                let url = url.clone();
                async move {
                    let response = http
                        .get(url.clone())
                        .send()
                        .await
                        .map_err(|e| CommandError::ExecutionFailed(format!("{} unreachable: {}", url, e)))?;
                    Ok(format!("{} responded with {}", url, response.status()))
                }
            })])
    }
}

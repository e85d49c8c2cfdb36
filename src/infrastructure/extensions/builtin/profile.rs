use async_trait::async_trait;
use std::path::PathBuf;

use crate::application::errors::{CommandError, ExtensionError};
use crate::domain::entities::{Command, Invocation, UserRecord};
use crate::infrastructure::database::Database;
use crate::infrastructure::extensions::catalog::{Extension, ExtensionContext};

pub const NAME: &str = "profile";

/// Shows the caller's `user_data` row. Read-only.
pub struct Profile;

#[async_trait]
impl Extension for Profile {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Look up stored user profiles"
    }

    async fn setup(&self, ctx: &ExtensionContext) -> Result<Vec<Command>, ExtensionError> {
        let path = ctx.database_path.clone();

        Ok(vec![Command::new("profile")
            .with_description("Show your stored profile")
            .with_handler(move |inv: Invocation| {
                let path = path.clone();
                async move {
                    let record = lookup(path, inv.author_id).await?;
                    Ok(match record {
                        Some(user) => render(&user),
                        None => format!("No profile on record for {}.", inv.author_name),
                    })
                }
            })])
    }
}

async fn lookup(path: PathBuf, discord_id: u64) -> Result<Option<UserRecord>, CommandError> {
    let discord_id = i64::try_from(discord_id)
        .map_err(|_| CommandError::InvalidArgs(format!("user id {} out of range", discord_id)))?;

    // Read-only: the schema step belongs to startup and may be switched off
    tokio::task::spawn_blocking(move || -> rusqlite::Result<Option<UserRecord>> {
        let Some(db) = Database::open_existing(&path)? else {
            return Ok(None);
        };
        if !db.has_user_table()? {
            return Ok(None);
        }
        db.get_user(discord_id)
    })
        .await
        .map_err(|e| CommandError::ExecutionFailed(e.to_string()))?
        .map_err(|e| CommandError::ExecutionFailed(format!("profile lookup failed: {}", e)))
}

fn render(user: &UserRecord) -> String {
    let mut lines = vec![format!("Profile: {}", user)];
    lines.push(format!("Whitelisted: {}", if user.whitelisted { "yes" } else { "no" }));
    lines.push(format!("Security level: {}", user.security_level));
    for (label, value) in [
        ("Staff role", &user.staff_role),
        ("Activity", &user.activity),
        ("Affiliation", &user.affiliation),
    ] {
        if let Some(value) = value {
            lines.push(format!("{}: {}", label, value));
        }
    }
    lines.join("\n")
}

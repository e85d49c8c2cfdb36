use std::fmt;

/// A row of the `user_data` table, keyed by Discord user id.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserRecord {
    pub discord_id: i64,
    pub game_id: Option<String>,
    pub game_name: Option<String>,
    pub whitelisted: bool,
    pub security_level: i64,
    pub staff_role: Option<String>,
    pub event_log: Option<String>,
    pub activity: Option<String>,
    pub affiliation: Option<String>,
}

impl UserRecord {
    pub fn new(discord_id: i64) -> Self {
        Self {
            discord_id,
            ..Self::default()
        }
    }

    pub fn display_name(&self) -> String {
        match (&self.game_name, &self.game_id) {
            (Some(name), Some(id)) => format!("{} ({})", name, id),
            (Some(name), None) => name.clone(),
            (None, Some(id)) => id.clone(),
            (None, None) => self.discord_id.to_string(),
        }
    }
}

impl fmt::Display for UserRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

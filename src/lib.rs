//! warden-bot: a Discord bot bootstrap with directory-driven extensions and a SQLite user table

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::client::{BotClient, ClientOptions, ClientState};
pub use application::errors::BotError;
pub use infrastructure::config::Config;

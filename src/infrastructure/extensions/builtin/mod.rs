//! Extensions compiled into the bot

pub mod ping;
pub mod profile;
pub mod status;

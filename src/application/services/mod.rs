//! Application services - Command namespace orchestration

pub mod command_service;

pub use command_service::{CommandService, HELP_COMMAND};

//! Domain entities - Core business objects

pub mod user;
pub mod message;
pub mod command;
pub mod extension;

pub use user::UserRecord;
pub use message::{Content, Invocation};
pub use command::{Command, CommandHandler, CommandRegistry, CommandSpec};
pub use extension::ExtensionRecord;

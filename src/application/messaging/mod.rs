//! Messaging - Command parsing and event dispatching

pub mod dispatcher;
pub mod parser;

pub use dispatcher::{EventDispatcher, HandlerResult};
pub use parser::CommandParser;

//! Application layer - Bot lifecycle and command handling
//!
//! This layer contains:
//! - Client: The platform-independent bot core and its startup hook
//! - Services: Command namespace orchestration
//! - Errors: Domain-specific errors
//! - Messaging: Command parsing, event dispatching

pub mod client;
pub mod errors;
pub mod services;
pub mod messaging;

//! Domain layer - Core bot objects with no platform dependencies
//!
//! This layer contains:
//! - Entities: UserRecord, Command, Invocation, ExtensionRecord
//! - Traits: Abstractions for infrastructure (CommandSync)

pub mod entities;
pub mod traits;

//! Infrastructure layer - External concerns
//!
//! This layer contains:
//! - Config: Configuration loading
//! - Database: The SQLite `user_data` table
//! - Extensions: Catalog, manifests and the directory loader
//! - Adapters: Platform integrations (Discord)

pub mod adapters;
pub mod config;
pub mod database;
pub mod extensions;

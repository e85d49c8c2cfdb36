//! Extension system for warden-bot
//!
//! Extensions are compiled-in units of command logic, registered in an
//! [`ExtensionCatalog`] under stable names. A directory of manifest files
//! decides which of them get attached at startup and with what settings.

pub mod builtin;
pub mod catalog;
pub mod loader;
pub mod manifest;
pub mod registry;

pub use catalog::{Extension, ExtensionCatalog, ExtensionContext, ExtensionFactory};
pub use loader::{ExtensionLoader, LoadOutcome, LoadTarget};
pub use manifest::ExtensionManifest;
pub use registry::{ExtensionRegistry, LoadedExtension};

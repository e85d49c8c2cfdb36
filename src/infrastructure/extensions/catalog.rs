//! Extension catalog - The compiled-in set of extensions that can be loaded by name

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use super::builtin;
use super::manifest::ExtensionManifest;
use crate::application::errors::ExtensionError;
use crate::domain::entities::Command;

/// Everything an extension may use while setting itself up
#[derive(Debug, Clone)]
pub struct ExtensionContext {
    pub name: String,
    /// Pooled HTTP client shared by every extension
    pub http: reqwest::Client,
    pub database_path: PathBuf,
    pub manifest: ExtensionManifest,
}

/// A loadable unit of command-handling logic
#[async_trait]
pub trait Extension: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// Build the commands this extension attaches to the bot
    async fn setup(&self, ctx: &ExtensionContext) -> Result<Vec<Command>, ExtensionError>;
}

/// Constructor registered under a stable extension name
pub type ExtensionFactory = Arc<dyn Fn() -> Box<dyn Extension> + Send + Sync>;

/// Name-to-constructor table consulted by the loader
#[derive(Clone, Default)]
pub struct ExtensionCatalog {
    factories: BTreeMap<String, ExtensionFactory>,
}

impl ExtensionCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog with every extension shipped in this crate
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        catalog.register(builtin::ping::NAME, || Box::new(builtin::ping::Ping));
        catalog.register(builtin::profile::NAME, || Box::new(builtin::profile::Profile));
        catalog.register(builtin::status::NAME, || Box::new(builtin::status::Status));
        catalog
    }

    /// Register a constructor. A later registration under the same name replaces the earlier one.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn() -> Box<dyn Extension> + Send + Sync + 'static,
    {
        let name = name.into();
        if self.factories.insert(name.clone(), Arc::new(factory)).is_some() {
            tracing::warn!("Extension '{}' registered twice, keeping the latest", name);
        }
        self
    }

    pub fn create(&self, name: &str) -> Result<Box<dyn Extension>, ExtensionError> {
        self.factories
            .get(name)
            .map(|factory| factory())
            .ok_or_else(|| ExtensionError::NotFound(name.to_string()))
    }

    pub fn names(&self) -> Vec<String> {
        self.factories.keys().cloned().collect()
    }
}

impl std::fmt::Debug for ExtensionCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtensionCatalog")
            .field("names", &self.names())
            .finish()
    }
}

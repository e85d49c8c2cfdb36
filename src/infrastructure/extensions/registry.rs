//! Extension registry - Tracks which extensions are attached to the bot

use std::collections::HashMap;
use std::sync::RwLock;

use crate::application::errors::ExtensionError;

/// What the registry remembers about a loaded extension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedExtension {
    pub name: String,
    pub description: String,
    pub commands: Vec<String>,
}

/// Registry for managing loaded extensions
pub struct ExtensionRegistry {
    extensions: RwLock<HashMap<String, LoadedExtension>>,
}

impl ExtensionRegistry {
    pub fn new() -> Self {
        Self {
            extensions: RwLock::new(HashMap::new()),
        }
    }

    /// Register a loaded extension
    pub fn register(&self, extension: LoadedExtension) -> Result<(), ExtensionError> {
        let mut extensions = self.extensions.write()
            .map_err(|_| ExtensionError::Internal("Lock poisoned".to_string()))?;

        if extensions.contains_key(&extension.name) {
            return Err(ExtensionError::AlreadyLoaded(extension.name));
        }

        extensions.insert(extension.name.clone(), extension);
        Ok(())
    }

    /// Get an extension by name
    pub fn get(&self, name: &str) -> Option<LoadedExtension> {
        self.extensions.read()
            .ok()?
            .get(name)
            .cloned()
    }

    /// Get all extension names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.extensions.read()
            .ok()
            .map(|e| e.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }

    /// Check if an extension is loaded
    pub fn is_loaded(&self, name: &str) -> bool {
        self.extensions.read()
            .ok()
            .map(|e| e.contains_key(name))
            .unwrap_or(false)
    }

    /// Get the number of loaded extensions
    pub fn len(&self) -> usize {
        self.extensions.read()
            .ok()
            .map(|e| e.len())
            .unwrap_or(0)
    }

    /// Check if no extensions are loaded
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ExtensionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

//! Extension manifest definition

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::application::errors::ExtensionError;

/// Per-extension settings read from `<name><suffix>` in the extension directory.
///
/// An empty file is a valid manifest with every field at its default.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ExtensionManifest {
    /// Disabled manifests are skipped without being treated as failures
    pub enabled: bool,

    /// Extension description override
    pub description: Option<String>,

    /// Free-form settings handed to the extension's setup
    pub settings: BTreeMap<String, String>,
}

impl Default for ExtensionManifest {
    fn default() -> Self {
        Self {
            enabled: true,
            description: None,
            settings: BTreeMap::new(),
        }
    }
}

impl ExtensionManifest {
    pub fn from_file(name: &str, path: impl AsRef<Path>) -> Result<Self, ExtensionError> {
        let content = std::fs::read_to_string(path).map_err(|e| ExtensionError::Manifest {
            name: name.to_string(),
            reason: format!("Failed to read manifest: {}", e),
        })?;

        Self::parse(name, &content)
    }

    pub fn parse(name: &str, content: &str) -> Result<Self, ExtensionError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(content).map_err(|e| ExtensionError::Manifest {
            name: name.to_string(),
            reason: format!("Failed to parse manifest: {}", e),
        })
    }

    pub fn setting(&self, key: &str) -> Option<&str> {
        self.settings.get(key).map(String::as_str)
    }

    /// A setting the extension cannot start without
    pub fn require(&self, extension: &str, key: &str) -> Result<&str, ExtensionError> {
        self.setting(key).ok_or_else(|| ExtensionError::Setup {
            name: extension.to_string(),
            reason: format!("missing setting '{}'", key),
        })
    }
}

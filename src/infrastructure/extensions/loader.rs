//! Extension loader - Attaches the extensions named by files in a directory

use std::path::{Path, PathBuf};

use super::catalog::{ExtensionCatalog, ExtensionContext};
use super::manifest::ExtensionManifest;
use super::registry::{ExtensionRegistry, LoadedExtension};
use crate::application::errors::{error_chain, ExtensionError};
use crate::application::services::CommandService;
use crate::domain::entities::ExtensionRecord;

/// Shared state every load attempt attaches into
pub struct LoadTarget<'a> {
    pub catalog: &'a ExtensionCatalog,
    pub registry: &'a ExtensionRegistry,
    pub commands: &'a CommandService,
    pub http: &'a reqwest::Client,
    pub database_path: &'a Path,
}

/// How a single load attempt ended when it did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded { commands: usize },
    Disabled,
}

/// Extension loader
pub struct ExtensionLoader {
    directory: PathBuf,
    suffix: String,
}

impl ExtensionLoader {
    pub fn new(directory: impl Into<PathBuf>, suffix: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            suffix: suffix.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Whether a directory entry names an extension: right suffix, no leading underscore
    pub fn is_candidate(&self, file_name: &str) -> bool {
        file_name.len() > self.suffix.len()
            && file_name.ends_with(&self.suffix)
            && !file_name.starts_with('_')
    }

    /// Extension names found in the directory, sorted
    pub fn discover(&self) -> Result<Vec<String>, ExtensionError> {
        if !self.directory.is_dir() {
            return Err(ExtensionError::DirectoryMissing(self.directory.display().to_string()));
        }

        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.directory)? {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    tracing::warn!("Failed to read directory entry: {}", e);
                    continue;
                }
            };

            let file_name = entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                tracing::warn!("Skipping non UTF-8 entry {:?}", entry.file_name());
                continue;
            };

            if self.is_candidate(file_name) {
                names.push(file_name[..file_name.len() - self.suffix.len()].to_string());
            }
        }

        names.sort();
        Ok(names)
    }

    /// Load one extension by name and attach its commands
    pub async fn load_one(&self, name: &str, target: &LoadTarget<'_>) -> Result<LoadOutcome, ExtensionError> {
        if target.registry.is_loaded(name) {
            return Err(ExtensionError::AlreadyLoaded(name.to_string()));
        }

        let manifest_path = self.directory.join(format!("{}{}", name, self.suffix));
        let manifest = ExtensionManifest::from_file(name, &manifest_path)?;
        if !manifest.enabled {
            return Ok(LoadOutcome::Disabled);
        }

        let extension = target.catalog.create(name)?;
        let description = manifest
            .description
            .clone()
            .unwrap_or_else(|| extension.description().to_string());

        let ctx = ExtensionContext {
            name: name.to_string(),
            http: target.http.clone(),
            database_path: target.database_path.to_path_buf(),
            manifest,
        };
        let commands = extension.setup(&ctx).await?;
        let command_names: Vec<String> = commands.iter().map(|c| c.name.clone()).collect();

        let count = target.commands.attach(name, commands).await?;
        target.registry.register(LoadedExtension {
            name: name.to_string(),
            description,
            commands: command_names,
        })?;

        Ok(LoadOutcome::Loaded { commands: count })
    }

    /// Try every discovered extension; one failure never stops the rest
    pub async fn load_all(&self, target: &LoadTarget<'_>) -> Vec<ExtensionRecord> {
        let names = match self.discover() {
            Ok(names) => names,
            Err(e) => {
                tracing::error!("{}", error_chain(&e));
                return Vec::new();
            }
        };

        let mut records = Vec::with_capacity(names.len());
        for name in names {
            match self.load_one(&name, target).await {
                Ok(LoadOutcome::Loaded { commands }) => {
                    tracing::info!("Loaded extension {} ({} commands)", name, commands);
                    records.push(ExtensionRecord::loaded(name));
                }
                Ok(LoadOutcome::Disabled) => {
                    tracing::info!("Skipped disabled extension {}", name);
                    records.push(ExtensionRecord::failed(name, "disabled"));
                }
                Err(e) => {
                    let trace = error_chain(&e);
                    tracing::error!("Failed to load extension {}\n{}", name, trace);
                    records.push(ExtensionRecord::failed(name, trace));
                }
            }
        }

        records
    }
}

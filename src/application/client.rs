//! Bot client core - Startup hook, sync guard and lifecycle state, independent of the chat platform

use std::path::PathBuf;
use std::sync::RwLock;
use tokio::sync::Mutex;

use crate::application::errors::{BotError, CommandError};
use crate::application::messaging::CommandParser;
use crate::application::services::CommandService;
use crate::domain::entities::{Content, ExtensionRecord, Invocation};
use crate::domain::traits::{BotIdentity, CommandSync};
use crate::infrastructure::config::Config;
use crate::infrastructure::extensions::{ExtensionCatalog, ExtensionLoader, ExtensionRegistry, LoadTarget};

/// Lifecycle of the client. Handler errors are transient and never change it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientState {
    Constructed,
    Connecting,
    Ready,
    Disconnected,
}

/// Settings the client is built from
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub prefix: String,
    pub extension_dir: PathBuf,
    pub extension_suffix: String,
    pub database_path: PathBuf,
}

impl From<&Config> for ClientOptions {
    fn from(config: &Config) -> Self {
        Self {
            prefix: config.bot.prefix.clone(),
            extension_dir: config.extensions.directory.clone(),
            extension_suffix: config.extensions.suffix.clone(),
            database_path: config.database.path.clone(),
        }
    }
}

pub struct BotClient {
    options: ClientOptions,
    http: reqwest::Client,
    catalog: ExtensionCatalog,
    extensions: ExtensionRegistry,
    commands: CommandService,
    synced: Mutex<bool>,
    state: RwLock<ClientState>,
    identity: RwLock<Option<BotIdentity>>,
}

impl BotClient {
    /// `http` is the pooled client every extension shares for the life of the process
    pub fn new(options: ClientOptions, http: reqwest::Client, catalog: ExtensionCatalog) -> Self {
        let commands = CommandService::new(options.prefix.clone());
        Self {
            options,
            http,
            catalog,
            extensions: ExtensionRegistry::new(),
            commands,
            synced: Mutex::new(false),
            state: RwLock::new(ClientState::Constructed),
            identity: RwLock::new(None),
        }
    }

    /// Runs once the platform session is being established: loads extensions, then
    /// syncs the command tree unless that already happened in this process.
    pub async fn setup_hook(&self, sync: &dyn CommandSync) -> Result<Vec<ExtensionRecord>, BotError> {
        self.set_state(ClientState::Connecting);

        let records = self.load_extensions().await;

        let mut synced = self.synced.lock().await;
        if !*synced {
            let specs = self.commands.specs().await;
            let count = sync.sync(&specs).await?;
            *synced = true;
            tracing::info!("Synced command tree ({} commands)", count);
        }

        Ok(records)
    }

    async fn load_extensions(&self) -> Vec<ExtensionRecord> {
        let loader = ExtensionLoader::new(&self.options.extension_dir, self.options.extension_suffix.clone());
        let target = LoadTarget {
            catalog: &self.catalog,
            registry: &self.extensions,
            commands: &self.commands,
            http: &self.http,
            database_path: &self.options.database_path,
        };

        let records = loader.load_all(&target).await;
        let loaded = records.iter().filter(|r| r.loaded).count();
        tracing::info!(
            "Extension scan of {} finished: {} loaded, {} not loaded",
            loader.directory().display(),
            loaded,
            records.len() - loaded
        );
        records
    }

    pub fn on_ready(&self, identity: BotIdentity) {
        tracing::info!("Logged in as {}", identity);
        if let Ok(mut slot) = self.identity.write() {
            *slot = Some(identity);
        }
        self.set_state(ClientState::Ready);
    }

    pub fn on_disconnect(&self) {
        self.set_state(ClientState::Disconnected);
    }

    /// Parser accepting the configured prefix and, once ready, mentions of the bot
    pub fn parser(&self) -> CommandParser {
        self.commands.parser(self.identity().map(|i| i.id))
    }

    /// Handle raw message text. `Ok(None)` means the text was not a command.
    pub async fn handle_text(&self, text: &str, invocation: Invocation) -> Result<Option<String>, CommandError> {
        match self.parser().parse(text) {
            content @ Content::Command { .. } => self.commands.handle(&content, invocation).await,
            _ => Ok(None),
        }
    }

    pub async fn invoke(&self, name: &str, invocation: Invocation) -> Result<String, CommandError> {
        self.commands.invoke(name, invocation).await
    }

    pub fn state(&self) -> ClientState {
        self.state.read().map(|s| *s).unwrap_or(ClientState::Disconnected)
    }

    fn set_state(&self, next: ClientState) {
        if let Ok(mut state) = self.state.write() {
            tracing::debug!("Client state {:?} -> {:?}", *state, next);
            *state = next;
        }
    }

    pub fn identity(&self) -> Option<BotIdentity> {
        self.identity.read().ok().and_then(|i| i.clone())
    }

    pub async fn is_synced(&self) -> bool {
        *self.synced.lock().await
    }

    pub fn extensions(&self) -> &ExtensionRegistry {
        &self.extensions
    }

    pub fn commands(&self) -> &CommandService {
        &self.commands
    }
}

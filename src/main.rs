use clap::{Parser, Subcommand};
use std::sync::Arc;

use warden_bot::application::errors::error_chain;
use warden_bot::application::messaging::EventDispatcher;
use warden_bot::infrastructure::adapters::discord;
use warden_bot::infrastructure::database;
use warden_bot::infrastructure::extensions::ExtensionCatalog;
use warden_bot::{BotClient, BotError, ClientOptions, Config};

#[derive(Parser)]
#[command(name = "warden-bot")]
#[command(about = "A Discord bot with directory-driven extensions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Bot token (overrides config and TOKEN)
    #[arg(short, long)]
    token: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot (default)
    Run,
    /// Show version
    Version,
    /// Print the default config
    InitConfig,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            if let Err(e) = run_bot(&cli.config, cli.token) {
                tracing::error!("Fatal: {}", error_chain(&e));
                std::process::exit(1);
            }
        }
        Commands::Version => {
            println!("warden-bot v{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::InitConfig => init_config(),
    }
}

fn run_bot(config_path: &str, token_override: Option<String>) -> Result<(), BotError> {
    let mut config = Config::resolve(config_path);
    if let Some(token) = token_override {
        config.discord.token = Some(token);
    }

    tracing::info!("Starting {}", config.bot.name);

    let db_path = &config.database.path;
    tracing::info!(
        "Database path {} exists: {}",
        db_path.display(),
        database::database_exists(db_path)
    );

    if config.database.create_schema {
        database::create_database(db_path);
    }

    let token = config.token()?.to_string();

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| BotError::Internal(format!("Failed to start runtime: {}", e)))?;

    rt.block_on(async {
        let http = reqwest::Client::builder()
            .user_agent(concat!("warden-bot/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| BotError::Network(e.to_string()))?;

        let client = Arc::new(BotClient::new(
            ClientOptions::from(&config),
            http,
            ExtensionCatalog::builtin(),
        ));
        let dispatcher = Arc::new(EventDispatcher::new());

        discord::run(client, dispatcher, &token).await
    })
}

fn init_config() {
    match Config::default().to_yaml() {
        Ok(yaml) => {
            println!("{}", yaml);
            println!("\nSave this to config.yaml and adjust as needed.");
        }
        Err(e) => tracing::error!("{}", e),
    }
}

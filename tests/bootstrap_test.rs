//! Startup sequence integration tests (no network access)
//! Run with: cargo test --test bootstrap_test

use async_trait::async_trait;
use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::io;
use std::sync::{Arc, Mutex, Once};
use tracing_subscriber::fmt::MakeWriter;

use warden_bot::application::messaging::EventDispatcher;
use warden_bot::domain::entities::{CommandSpec, Invocation};
use warden_bot::domain::traits::{BotIdentity, CommandSync};
use warden_bot::infrastructure::database::{self, Database};
use warden_bot::infrastructure::extensions::{Extension, ExtensionCatalog, ExtensionContext};
use warden_bot::application::errors::{CommandError, ExtensionError};
use warden_bot::domain::entities::Command;
use warden_bot::{BotClient, BotError, ClientOptions, ClientState, Config};

static INIT: Once = Once::new();

fn ensure_init() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    });
}

/// Collects formatted log output for assertions
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[derive(Default)]
struct RecordingSync {
    calls: AtomicUsize,
}

#[async_trait]
impl CommandSync for RecordingSync {
    async fn sync(&self, commands: &[CommandSpec]) -> Result<usize, BotError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(commands.len())
    }
}

/// Extension whose setup always fails
struct Broken;

#[async_trait]
impl Extension for Broken {
    fn name(&self) -> &str {
        "broken"
    }

    fn description(&self) -> &str {
        "Never loads"
    }

    async fn setup(&self, _ctx: &ExtensionContext) -> Result<Vec<Command>, ExtensionError> {
        Err(ExtensionError::Setup {
            name: "broken".to_string(),
            reason: "refusing to start".to_string(),
        })
    }
}

fn options(dir: &std::path::Path) -> ClientOptions {
    let mut config = Config::default();
    config.extensions.directory = dir.join("extensions");
    config.database.path = dir.join("warden.db");
    ClientOptions::from(&config)
}

#[tokio::test]
async fn test_full_startup_sequence() {
    ensure_init();
    let dir = tempfile::tempdir().unwrap();
    let ext_dir = dir.path().join("extensions");
    fs::create_dir(&ext_dir).unwrap();
    for (name, content) in [
        ("_disabled_helper.yaml", ""),
        ("broken.yaml", ""),
        ("ping.yaml", "settings:\n  reply: pong\n"),
        ("profile.yaml", "description: Profiles\n"),
        ("README.md", "not an extension"),
    ] {
        fs::write(ext_dir.join(name), content).unwrap();
    }

    let options = options(dir.path());

    // Schema step before the client exists
    assert!(!database::database_exists(&options.database_path));
    assert!(database::create_database(&options.database_path));
    assert!(database::database_exists(&options.database_path));

    let mut catalog = ExtensionCatalog::builtin();
    catalog.register("broken", || Box::new(Broken));

    let client = BotClient::new(options, reqwest::Client::new(), catalog);
    let sync = RecordingSync::default();

    let records = client.setup_hook(&sync).await.unwrap();
    let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["broken", "ping", "profile"]);
    assert!(!records[0].loaded);
    assert!(records[1].loaded && records[2].loaded);

    // Reconnect fires the hook again; sync must not repeat
    client.setup_hook(&sync).await.unwrap();
    assert_eq!(sync.calls.load(Ordering::SeqCst), 1);

    client.on_ready(BotIdentity::new(100, "warden"));
    assert_eq!(client.state(), ClientState::Ready);
    assert_eq!(client.extensions().names(), vec!["ping", "profile"]);
    assert_eq!(
        client.extensions().get("profile").unwrap().description,
        "Profiles"
    );

    let reply = client
        .handle_text("<@!100> ping", Invocation::new(5, "lee"))
        .await
        .unwrap();
    assert_eq!(reply.as_deref(), Some("pong"));

    let reply = client.invoke("profile", Invocation::new(5, "lee")).await.unwrap();
    assert_eq!(reply, "No profile on record for lee.");
}

#[tokio::test]
async fn test_empty_directory_loads_nothing() {
    ensure_init();
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("extensions")).unwrap();

    let client = BotClient::new(options(dir.path()), reqwest::Client::new(), ExtensionCatalog::builtin());
    let sync = RecordingSync::default();

    let records = client.setup_hook(&sync).await.unwrap();
    assert!(records.is_empty());
    assert_eq!(sync.calls.load(Ordering::SeqCst), 1);

    client.on_ready(BotIdentity::new(1, "warden"));
    assert_eq!(client.state(), ClientState::Ready);

    // Only the built-in help answers
    let help = client.invoke("help", Invocation::new(2, "kim")).await.unwrap();
    assert!(help.starts_with("Available commands:"));
    assert!(matches!(
        client.invoke("ping", Invocation::new(2, "kim")).await,
        Err(CommandError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_profile_reads_existing_row() {
    ensure_init();
    let dir = tempfile::tempdir().unwrap();
    let ext_dir = dir.path().join("extensions");
    fs::create_dir(&ext_dir).unwrap();
    fs::write(ext_dir.join("profile.yaml"), "").unwrap();

    let options = options(dir.path());
    assert!(database::create_database(&options.database_path));
    {
        // Rows are written by tooling outside the bot core
        let conn = rusqlite::Connection::open(&options.database_path).unwrap();
        conn.execute(
            "INSERT INTO user_data (discord_id, game_name, whitelisted, security_level, staff_role)
             VALUES (55, 'Warden', 1, 3, 'moderator')",
            [],
        )
        .unwrap();
    }
    let stored = Database::open(&options.database_path).unwrap().get_user(55).unwrap().unwrap();
    assert!(stored.whitelisted);

    let client = BotClient::new(options, reqwest::Client::new(), ExtensionCatalog::builtin());
    client.setup_hook(&RecordingSync::default()).await.unwrap();

    let reply = client.invoke("profile", Invocation::new(55, "ava")).await.unwrap();
    assert_eq!(
        reply,
        "Profile: Warden\nWhitelisted: yes\nSecurity level: 3\nStaff role: moderator"
    );
}

#[tokio::test]
async fn test_dispatcher_keeps_going_after_handler_error() {
    ensure_init();
    let dispatcher = EventDispatcher::new();

    let failed = dispatcher
        .dispatch("on_message", async {
            Err(BotError::Command(CommandError::ExecutionFailed("boom".to_string())))
        })
        .await;
    let succeeded = dispatcher.dispatch("on_ready", async { Ok(()) }).await;

    assert!(!failed);
    assert!(succeeded);
    assert_eq!(dispatcher.failures(), 1);
}

#[tokio::test]
async fn test_missing_directory_logs_one_error() {
    let logs = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let dir = tempfile::tempdir().unwrap();
    let options = options(dir.path());
    let missing = options.extension_dir.display().to_string();

    let client = BotClient::new(options, reqwest::Client::new(), ExtensionCatalog::builtin());
    let records = client.setup_hook(&RecordingSync::default()).await.unwrap();
    client.on_ready(BotIdentity::new(3, "warden"));

    assert!(records.is_empty());
    assert!(client.extensions().is_empty());
    assert_eq!(client.state(), ClientState::Ready);

    let output = logs.contents();
    let errors: Vec<&str> = output.lines().filter(|l| l.contains("ERROR")).collect();
    assert_eq!(errors.len(), 1, "unexpected log output:\n{}", output);
    assert!(errors[0].contains(&missing));
    assert!(!output.contains("Failed to load extension"));
}

#[tokio::test]
async fn test_profile_respects_disabled_schema_step() {
    ensure_init();
    let dir = tempfile::tempdir().unwrap();
    let ext_dir = dir.path().join("extensions");
    fs::create_dir(&ext_dir).unwrap();
    fs::write(ext_dir.join("profile.yaml"), "").unwrap();

    let mut config = Config::default();
    config.extensions.directory = ext_dir;
    config.database.path = dir.path().join("warden.db");
    config.database.create_schema = false;
    let db_path = config.database.path.clone();

    let client = BotClient::new(ClientOptions::from(&config), reqwest::Client::new(), ExtensionCatalog::builtin());
    client.setup_hook(&RecordingSync::default()).await.unwrap();

    assert!(!database::database_exists(&db_path));
    let reply = client.invoke("profile", Invocation::new(8, "x")).await.unwrap();
    assert_eq!(reply, "No profile on record for x.");
    assert!(!database::database_exists(&db_path));

    // A file without the table is also just an empty profile
    rusqlite::Connection::open(&db_path)
        .unwrap()
        .execute("CREATE TABLE unrelated (id INTEGER)", [])
        .unwrap();
    let reply = client.invoke("profile", Invocation::new(8, "x")).await.unwrap();
    assert_eq!(reply, "No profile on record for x.");
    let conn = rusqlite::Connection::open(&db_path).unwrap();
    let tables: i64 = conn
        .query_row("SELECT COUNT(*) FROM sqlite_master WHERE name = 'user_data'", [], |row| row.get(0))
        .unwrap();
    assert_eq!(tables, 0);
}

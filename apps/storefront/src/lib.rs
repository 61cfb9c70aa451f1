//! # Storefront Library
//!
//! Runtime layer of the storefront cart: the cart store, its storage
//! backends, configuration, the catalog, and the commands a view layer
//! calls. The `storefront` binary drives all of it from a terminal shell.
//!
//! ## Module Organization
//! ```text
//! storefront_app/
//! ├── lib.rs          ◄─── You are here (startup & shell loop)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── cart.rs     ◄─── CartStore (watch channel + persistence writer)
//! │   ├── storage.rs  ◄─── CartStorage trait, MemoryStorage, SQLite impl
//! │   ├── catalog.rs  ◄─── Product catalog
//! │   └── config.rs   ◄─── AppConfig
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports
//! │   ├── cart.rs     ◄─── Cart manipulation commands
//! │   ├── product.rs  ◄─── Product detail panel and quantity picker
//! │   └── shell.rs    ◄─── Shell grammar (clap), session and renderer
//! └── error.rs        ◄─── API error type for commands
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Application Startup                               │
//! │                                                                         │
//! │  1. Initialize Logging ───────────────────────────────────────────────► │
//! │     • tracing-subscriber with env filter (RUST_LOG)                     │
//! │                                                                         │
//! │  2. Load Configuration ───────────────────────────────────────────────► │
//! │     • defaults → storefront.toml → STOREFRONT_* env                     │
//! │                                                                         │
//! │  3. Connect to Database ──────────────────────────────────────────────► │
//! │     • SQLite with WAL mode, pending migrations applied                  │
//! │                                                                         │
//! │  4. Load Catalog ─────────────────────────────────────────────────────► │
//! │                                                                         │
//! │  5. Open CartStore ───────────────────────────────────────────────────► │
//! │     • rehydrate once; unreadable record → empty cart                    │
//! │     • spawn persistence writer and cart badge subscriber                │
//! │                                                                         │
//! │  6. Shell loop until `quit` or end of input, then drain writes          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod error;
pub mod state;

use std::io::Write;
use std::path::PathBuf;

use directories::ProjectDirs;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;
use tokio_stream::StreamExt;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use commands::shell::{self, ShellCommand, ShellSession};
use state::{AppConfig, CartStore, Catalog};
use storefront_db::{Database, DbConfig};

/// Runs the storefront shell until `quit` or end of input.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    info!("Starting storefront");

    let config = AppConfig::load_or_default(None);

    let db_path = get_database_path(&config)?;
    info!(?db_path, "Database path determined");
    let db = Database::new(DbConfig::new(db_path)).await?;

    let catalog = match &config.catalog_path {
        Some(path) => Catalog::load(path).await?,
        None => Catalog::bundled()?,
    };

    let store = CartStore::open(db.clone(), config.storage_key.clone()).await;
    let badge = spawn_cart_badge(&store);

    info!(
        storage_key = %store.storage_key(),
        total_items = store.total_items(),
        "Cart store ready"
    );

    println!("{}", shell::help());
    println!("{}", shell::render_cart(&commands::cart::get_cart(&store), &config));

    let result = run_shell(&store, &catalog, &config).await;

    store.shutdown().await;
    badge.abort();
    db.close().await;

    result.map_err(Into::into)
}

/// Reads commands from stdin and prints their results.
async fn run_shell(store: &CartStore, catalog: &Catalog, config: &AppConfig) -> std::io::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut session = ShellSession::new();

    prompt()?;
    while let Some(line) = lines.next_line().await? {
        match shell::parse(&line) {
            Ok(None) => {}
            Ok(Some(ShellCommand::Quit)) => break,
            Ok(Some(command)) => match session.execute(command, store, catalog, config) {
                Ok(output) => println!("{}", output),
                Err(e) => {
                    warn!(code = ?e.code, message = %e.message, "Command failed");
                    println!("Error: {}", e.message);
                }
            },
            Err(e) => print!("{}", e.render()),
        }
        prompt()?;
    }

    Ok(())
}

fn prompt() -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    write!(stdout, "storefront> ")?;
    stdout.flush()
}

/// Prints the cart badge whenever the item count changes.
fn spawn_cart_badge(store: &CartStore) -> JoinHandle<()> {
    let mut changes = store.changes();
    let mut last = store.total_items();

    tokio::spawn(async move {
        while let Some(cart) = changes.next().await {
            let count = cart.total_items();
            if count != last {
                println!("[cart: {} item{}]", count, if count == 1 { "" } else { "s" });
                last = count;
            }
        }
    })
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=storefront_app=trace` - Trace the store only
/// - Default: INFO, with debug for the storefront crates
///
/// Logs go to stderr so they never interleave with shell output.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("info,storefront_app=debug,storefront_db=debug,sqlx=warn")
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Determines the database file path.
///
/// ## Resolution Order
/// 1. `database_path` from config (or `STOREFRONT_DB_PATH`)
/// 2. Platform data directory:
///    - **macOS**: `~/Library/Application Support/com.storefront.storefront/storefront.db`
///    - **Windows**: `%APPDATA%\storefront\storefront\data\storefront.db`
///    - **Linux**: `~/.local/share/storefront/storefront.db`
fn get_database_path(config: &AppConfig) -> Result<PathBuf, Box<dyn std::error::Error>> {
    if let Some(path) = &config.database_path {
        return Ok(path.clone());
    }

    let proj_dirs = ProjectDirs::from("com", "storefront", "storefront")
        .ok_or("Could not determine app data directory")?;

    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)?;

    Ok(data_dir.join("storefront.db"))
}

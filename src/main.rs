use std::sync::Arc;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing::warn;

use shoplist_client::cache::{CachePersister, PersistedQuery};
use shoplist_client::config::settings::ClientConfig;
use shoplist_client::config::load_config;
use shoplist_client::helpers::time::now_u64;
use shoplist_client::net::Connectivity;
use shoplist_client::search::Suggester;
use shoplist_client::services::catalog::CatalogItem;
use shoplist_client::services::{AuthService, CatalogService, ItemService, SessionService};
use shoplist_client::storage::{FileStorage, KvStorage, MemoryStorage};
use shoplist_client::utils::constants::{
    DEFAULT_CACHE_MAX_AGE_SECS, DEFAULT_CACHE_VERSION, DEFAULT_HTTP_TIMEOUT_MS,
};
use shoplist_client::utils::logging::{self, LogLevel};
use shoplist_client::{ApiClient, ApiError};

const CATALOG_CACHE_KEY: &str = "catalog";

#[derive(Parser)]
#[command(name = "shoplist", about = "Shopping-list service client")]
struct Cli {
    /// Path to the YAML client configuration
    #[arg(long, env = "SHOPLIST_CONFIG", default_value = "client.yaml")]
    config: String,

    #[arg(long, value_enum)]
    log_level: Option<LogLevel>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Log in and store the token pair
    Login { email: String, password: String },
    /// Clear the stored token pair (best-effort server-side logout)
    Logout,
    /// List catalog items (falls back to the cached copy when unreachable)
    Catalog,
    /// Suggest catalog items for a partial name
    Suggest { query: String },
    /// Start a shopping session
    Start,
    /// Show the active session and its items
    Current,
    /// Check an item off in the active session
    Check { item_id: u64 },
    /// Complete the active session
    Complete,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;
    logging::run(&config, cli.log_level)?;

    let storage: Arc<dyn KvStorage> = match config.storage.as_ref().and_then(|s| s.path.clone()) {
        Some(path) => Arc::new(FileStorage::new(path)),
        None => Arc::new(MemoryStorage::new()),
    };
    let client = ApiClient::new(
        &config.api.base_url,
        config.api.timeout_ms.unwrap_or(DEFAULT_HTTP_TIMEOUT_MS),
        storage.clone(),
        Connectivity::new(),
    )?;
    let persister = build_persister(&config, storage);

    let auth = AuthService::new(client.clone());
    let catalog = CatalogService::new(client.clone());
    let sessions = SessionService::new(client.clone());
    let items = ItemService::new(client.clone());

    match cli.command {
        Command::Login { email, password } => {
            auth.login(&email, &password).await?;
            println!("logged in as {email}");
        }
        Command::Logout => {
            auth.logout().await?;
            println!("logged out");
        }
        Command::Catalog => match catalog.list().await {
            Ok(entries) => {
                let snapshot = [PersistedQuery {
                    key: CATALOG_CACHE_KEY.to_owned(),
                    updated_at_unix_ts: now_u64(),
                    payload: serde_json::to_value(&entries)?,
                }];
                if let Err(e) = persister.persist(&snapshot).await {
                    warn!("could not persist catalog cache: {e}");
                }
                print_catalog(&entries);
            }
            Err(err @ (ApiError::Transport(_) | ApiError::Offline)) => {
                let Some(cached) = restore_catalog(&persister).await? else {
                    return Err(err.into());
                };
                println!("(cached copy)");
                print_catalog(&cached);
            }
            Err(err) => return Err(err.into()),
        },
        Command::Suggest { query } => {
            let entries = catalog.list().await?;
            let suggester = Suggester::new();
            for hit in suggester.suggest(&query, &entries, 5) {
                println!("{}\t{}", hit.item.id, hit.item.name);
            }
        }
        Command::Start => {
            let session = sessions.start().await?;
            println!("session {} started at {}", session.id, session.started_at);
        }
        Command::Current => {
            let Some(session) = sessions.current().await? else {
                bail!("no active session");
            };
            println!("session {} started at {}", session.id, session.started_at);
            for item in items.list(session.id).await? {
                let mark = if item.checked { "x" } else { " " };
                println!("[{}] {}\t{}", mark, item.id, item.name);
            }
        }
        Command::Check { item_id } => {
            let item = items.set_checked(item_id, true).await?;
            println!("checked {}", item.name);
        }
        Command::Complete => {
            let Some(session) = sessions.current().await? else {
                bail!("no active session");
            };
            let done = sessions.complete(session.id).await?;
            println!("session {} completed", done.id);
        }
    }

    Ok(())
}

fn build_persister(config: &ClientConfig, storage: Arc<dyn KvStorage>) -> CachePersister {
    let cache = config.cache.as_ref();
    let version = cache
        .and_then(|c| c.version.clone())
        .unwrap_or_else(|| DEFAULT_CACHE_VERSION.to_owned());
    let max_age = cache
        .and_then(|c| c.max_age_seconds)
        .unwrap_or(DEFAULT_CACHE_MAX_AGE_SECS);
    CachePersister::new(storage, version, max_age).deny_prefix("auth.")
}

async fn restore_catalog(persister: &CachePersister) -> Result<Option<Vec<CatalogItem>>> {
    let Some(queries) = persister.restore().await? else {
        return Ok(None);
    };
    let Some(entry) = queries.into_iter().find(|q| q.key == CATALOG_CACHE_KEY) else {
        return Ok(None);
    };
    Ok(Some(serde_json::from_value(entry.payload)?))
}

fn print_catalog(entries: &[CatalogItem]) {
    for item in entries {
        let category = item.category.as_deref().unwrap_or_default();
        println!("{}\t{}\t{}", item.id, item.name, category);
    }
}

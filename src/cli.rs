use clap::{Parser, Subcommand};
use color_eyre::eyre::{self, eyre};

use crate::api::types::Movie;
use crate::api::{CatalogConfig, TmdbClient};
use crate::config::{AppConfig, StoreKind};
use crate::credentials::{Credentials, load_credentials};
use crate::search::{SearchServices, TopResult};
use crate::store::appwrite::{AppwriteConfig, AppwriteStore};
use crate::store::memory::MemoryStore;
use crate::store::{StoreBackend, StoreError};

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

#[derive(Parser)]
#[command(name = "moviefinder", about = "TUI and CLI for discovering movies")]
pub struct Cli {
    /// Quiet period before a typed search runs, in milliseconds
    #[arg(long, global = true)]
    pub debounce_ms: Option<u64>,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Subcommand)]
pub enum CliCommand {
    /// Launch the interactive TUI (default)
    Tui,
    /// Search movies by keyword (JSONL)
    Search {
        /// Search query
        query: String,
    },
    /// List popular movies (JSONL)
    Discover,
    /// Show the most searched terms from the configured store (JSONL)
    Trending {
        /// Number of terms to show
        #[arg(long)]
        limit: Option<usize>,
    },
}

impl Cli {
    /// Fold command-line overrides into the loaded config.
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(ms) = self.debounce_ms {
            config.debounce_ms = ms;
        }
    }
}

// ---------------------------------------------------------------------------
// Output helpers
// ---------------------------------------------------------------------------

/// Self-contained JSON object for a movie, with its poster URL resolved.
fn movie_json(movie: &Movie, image_base: &str) -> serde_json::Value {
    serde_json::json!({
        "movie": movie,
        "poster_url": movie.poster_url(image_base),
    })
}

/// Print a list of movies as JSONL to stdout.
fn print_movies(movies: &[Movie], image_base: &str) -> eyre::Result<()> {
    for movie in movies {
        let line = serde_json::to_string(&movie_json(movie, image_base))?;
        println!("{line}");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Service construction (shared with main.rs TUI path)
// ---------------------------------------------------------------------------

/// Build the configured search-count store, if any.
pub fn build_store(
    config: &AppConfig,
    creds: &Credentials,
) -> Result<Option<StoreBackend>, StoreError> {
    match config.store.backend {
        StoreKind::None => Ok(None),
        StoreKind::Memory => Ok(Some(StoreBackend::Memory(MemoryStore::new(
            config.image_base_url.clone(),
        )))),
        StoreKind::Appwrite => {
            let store = AppwriteStore::new(
                AppwriteConfig {
                    endpoint: config.store.endpoint.clone(),
                    project_id: config.store.project_id.clone(),
                    database_id: config.store.database_id.clone(),
                    collection_id: config.store.collection_id.clone(),
                    api_key: creds.appwrite_api_key.clone(),
                },
                config.image_base_url.clone(),
            )?;
            Ok(Some(StoreBackend::Appwrite(store)))
        }
    }
}

/// Build the catalog client and store from env credentials + config.
pub fn build_services(
    config: &AppConfig,
    require_catalog: bool,
) -> eyre::Result<SearchServices<StoreBackend>> {
    services_from(config, &load_credentials(), require_catalog)
}

/// With `require_catalog` unset, a missing API key yields services without a
/// catalog (every fetch then ends in the error state), and a store that
/// cannot be built is left out (reporting and trending are then skipped).
fn services_from(
    config: &AppConfig,
    creds: &Credentials,
    require_catalog: bool,
) -> eyre::Result<SearchServices<StoreBackend>> {
    let catalog = match creds.require_tmdb_key() {
        Ok(key) => {
            let catalog_config = CatalogConfig::new(&config.catalog_base_url, key)?;
            Some(TmdbClient::new(catalog_config)?)
        }
        Err(e) if require_catalog => return Err(e.into()),
        Err(e) => {
            tracing::warn!("{e}");
            None
        }
    };

    let store = match build_store(config, creds) {
        Ok(store) => store,
        Err(e) if require_catalog => return Err(e.into()),
        Err(e) => {
            tracing::warn!(error = %e, "search-count store disabled");
            None
        }
    };
    tracing::info!(
        catalog = catalog.is_some(),
        store = store.is_some(),
        backend = ?config.store.backend,
        "services initialized"
    );

    Ok(SearchServices {
        catalog,
        store,
        trending_limit: config.trending_limit,
    })
}

// ---------------------------------------------------------------------------
// Command execution
// ---------------------------------------------------------------------------

pub async fn run_command(cmd: CliCommand, config: AppConfig) -> eyre::Result<()> {
    match cmd {
        CliCommand::Tui => unreachable!("tui is handled in main"),

        CliCommand::Search { query } => {
            let services = build_services(&config, true)?;
            let term = query.as_str();
            let catalog = services
                .catalog
                .as_ref()
                .ok_or_else(|| eyre!("catalog client unavailable"))?;
            let movies = catalog.fetch_movies(term).await?;
            print_movies(&movies, &config.image_base_url)?;

            if let Some(first) = movies.first().filter(|_| !term.is_empty()) {
                let top = TopResult {
                    term: term.to_string(),
                    movie: first.clone(),
                };
                services.report(&top).await.log("search count");
            }
        }

        CliCommand::Discover => {
            let services = build_services(&config, true)?;
            let catalog = services
                .catalog
                .as_ref()
                .ok_or_else(|| eyre!("catalog client unavailable"))?;
            let movies = catalog.fetch_movies("").await?;
            print_movies(&movies, &config.image_base_url)?;
        }

        CliCommand::Trending { limit } => {
            let mut services = build_services(&config, false)?;
            if let Some(limit) = limit {
                services.trending_limit = limit;
            }
            let outcome = services.trending().await;
            outcome.log("trending");
            for entry in outcome.into_done().unwrap_or_default() {
                let line = serde_json::to_string(&entry)?;
                println!("{line}");
            }
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod credentials;
pub mod debounce;
pub mod event;
pub mod search;
pub mod store;
pub mod ui;

use std::fs::OpenOptions;
use std::sync::Mutex;

use app::App;
use clap::Parser;
use cli::{Cli, CliCommand};
use config::{AppConfig, load_config};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let mut config = load_config();
    cli.apply_overrides(&mut config);

    init_tracing(&config)?;

    match cli.command {
        // No subcommand or explicit `tui` → launch the interactive TUI.
        None | Some(CliCommand::Tui) => run_tui(config).await,
        // All other subcommands → non-interactive JSONL output.
        Some(cmd) => cli::run_command(cmd, config).await,
    }
}

/// Initialize tracing (filtered by RUST_LOG). Logs go to `log_file` when
/// configured, otherwise stderr.
fn init_tracing(config: &AppConfig) -> color_eyre::Result<()> {
    let builder = tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env());
    match config.log_file {
        Some(ref path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }
    Ok(())
}

/// Launch the interactive TUI.
async fn run_tui(config: AppConfig) -> color_eyre::Result<()> {
    // Tolerate a missing API key: the TUI still runs and shows the error state.
    let services = cli::build_services(&config, false)?;
    if services.catalog.is_none() {
        eprintln!("Warning: TMDB_API_KEY is not set. Running without API access.");
    }

    let terminal = ratatui::init();
    let result = App::new(config, services).run(terminal).await;
    ratatui::restore();
    result
}

//! hyprglaze_bar - entry point

use anyhow::Context;
use clap::Parser;
use hyprglaze_bar::app::input::spawn_input_reader;
use hyprglaze_bar::app::spawn_agent_writer;
use hyprglaze_bar::constants::app;
use hyprglaze_bar::{BarApp, BarConfig, Services};
use hyprglaze_core::preferences::JsonFileStorage;
use hyprglaze_core::initialize_logging;
use hyprglaze_core::theme::{self, CssFile};
use log::{error, info};
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::BufReader;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Parser)]
#[command(name = "hyprglaze_bar", version, about = "Themeable status bar for tiling window managers")]
struct Cli {
    /// Configuration file, defaults to <config_dir>/hyprglaze/config.toml
    #[arg(short, long, env = "HYPRGLAZE_CONFIG")]
    config: Option<PathBuf>,

    /// Log level or filter spec, overrides the config file
    #[arg(short, long)]
    log_level: Option<String>,

    /// Print a single line and exit
    #[arg(long)]
    once: bool,

    /// List the built-in themes and exit
    #[arg(long)]
    list_themes: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.list_themes {
        for id in theme::all() {
            let meta = theme::metadata(*id);
            println!(
                "{:<18} {:<6} {}",
                id.as_str(),
                meta.category.mode().to_string(),
                meta.description
            );
        }
        return Ok(());
    }

    let config = match &cli.config {
        Some(path) => BarConfig::load_from(path),
        None => BarConfig::load(),
    }
    .context("Failed to load configuration")?;

    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.level.clone());
    let _logger = initialize_logging(app::NAME, &level, config.logging.log_dir.clone())
        .context("Failed to initialize logging")?;

    info!("Starting {} {}", app::NAME, env!("CARGO_PKG_VERSION"));

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to build tokio runtime")?;

    let result = runtime.block_on(run(cli, config));
    // A blocking stdin read cannot be cancelled
    runtime.shutdown_timeout(Duration::from_millis(500));
    if let Err(e) = &result {
        error!("{:#}", e);
    }
    result
}

async fn run(cli: Cli, config: BarConfig) -> anyhow::Result<()> {
    let storage = JsonFileStorage::open(JsonFileStorage::default_path()?);
    let style = CssFile::new(config.style_path()?);

    let (services, agent_rx) = Services::start(&config, Box::new(storage), Box::new(style))?;
    let agent = spawn_agent_writer(agent_rx, config.agent.command_path.clone());
    let mut bar = BarApp::new(config, services, tokio::io::stdout());

    if cli.once {
        bar.run_once(Duration::from_secs(2)).await?;
        bar.shutdown().await;
        agent.abort();
        return Ok(());
    }

    let token = CancellationToken::new();
    let input = spawn_input_reader(
        BufReader::new(tokio::io::stdin()),
        bar.event_sender(),
        token.clone(),
    );

    let ctrl_c = {
        let token = token.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Interrupted, shutting down");
                token.cancel();
            }
        })
    };

    let result = bar.run(token.clone()).await;

    token.cancel();
    ctrl_c.abort();
    let _ = input.await;
    bar.shutdown().await;
    agent.abort();

    info!("{} exited", app::NAME);
    result.map_err(Into::into)
}

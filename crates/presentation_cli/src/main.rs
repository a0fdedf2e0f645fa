//! Wayfinder CLI
//!
//! Command-line front end for the route coordination engine.

#![allow(clippy::print_stdout)]

mod shell;
mod terminal_surface;

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use application::{
    EngineHandle, GeocodingPort, LocationPort, MapSurfacePort, MapView, NullMapSurface,
    RouteEngine, RoutingPort,
};
use clap::{Parser, Subcommand};
use domain::{PositionFix, SearchPhase, SearchQuery};
use infrastructure::{AppConfig, GeocodingAdapter, RoutingAdapter, init_logging, location_provider};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

use crate::shell::{HELP, ShellCommand, confirms_exit, parse_line};
use crate::terminal_surface::{TerminalSurface, describe};

/// Wayfinder CLI
#[derive(Parser)]
#[command(name = "wayfinder")]
#[command(author, version, about = "Find a place and route to it", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Configuration file (defaults to ./wayfinder.toml when present)
    #[arg(short, long, env = "WAYFINDER_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Route from your position (or --from) to a destination
    ///
    /// Example: wayfinder route --to "Gulshan 2, Dhaka"
    Route {
        /// Destination text
        #[arg(short, long)]
        to: String,

        /// Origin text (defaults to the current position)
        #[arg(short, long)]
        from: Option<String>,

        /// Print the final map view as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the current position
    Locate,

    /// Interactive search shell
    Shell,

    /// Print the effective configuration as TOML
    Config,
}

/// Determine log filter level from verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Adapters built from the configuration
struct Adapters {
    geocoder: Arc<dyn GeocodingPort>,
    router: Arc<dyn RoutingPort>,
    locator: Arc<dyn LocationPort>,
}

impl Adapters {
    fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        Ok(Self {
            geocoder: Arc::new(GeocodingAdapter::new(&config.geocoding)?),
            router: Arc::new(RoutingAdapter::new(&config.routing)?),
            locator: location_provider(&config.location)?,
        })
    }

    fn engine(
        &self,
        surface: Arc<dyn MapSurfacePort>,
        config: application::EngineConfig,
    ) -> RouteEngine {
        RouteEngine::new(
            Arc::clone(&self.geocoder),
            Arc::clone(&self.router),
            Arc::clone(&self.locator),
            surface,
            config,
        )
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    let filter_override = (cli.verbose > 0).then(|| log_filter_from_verbosity(cli.verbose));
    init_logging(&config.logging, filter_override)?;

    match cli.command {
        Commands::Route { to, from, json } => {
            let adapters = Adapters::from_config(&config)?;
            let routed = run_route(&adapters, &config, to, from, json).await?;
            if !routed {
                std::process::exit(1);
            }
        },
        Commands::Locate => {
            let adapters = Adapters::from_config(&config)?;
            match adapters.locator.current_position().await {
                PositionFix::Acquired { coordinate } => {
                    println!("📍 {coordinate}");
                },
                PositionFix::Unavailable { reason } => {
                    println!("❌ Position unavailable: {reason}");
                    println!(
                        "🧭 Map would center on {}",
                        config.map.fallback_coordinate()
                    );
                    std::process::exit(1);
                },
            }
        },
        Commands::Shell => {
            let adapters = Adapters::from_config(&config)?;
            run_shell(&adapters, &config).await?;
        },
        Commands::Config => {
            let rendered =
                toml::to_string_pretty(&config).context("Failed to render configuration")?;
            println!("{rendered}");
        },
    }

    Ok(())
}

/// Run one search to completion and print the view
///
/// Returns whether a route was computed.
async fn run_route(
    adapters: &Adapters,
    config: &AppConfig,
    to: String,
    from: Option<String>,
    json: bool,
) -> anyhow::Result<bool> {
    let engine = adapters.engine(
        Arc::new(NullMapSurface),
        config.engine_config().without_initial_locate(),
    );
    let (handle, task) = engine.spawn();

    let query = match from {
        Some(origin) => SearchQuery::to(to).from_origin(origin),
        None => {
            match adapters.locator.current_position().await {
                PositionFix::Acquired { coordinate } => handle.update_origin(coordinate)?,
                PositionFix::Unavailable { reason } => {
                    info!(%reason, "Current position unavailable");
                },
            }
            SearchQuery::to(to)
        },
    };

    let generation = handle.search(query).await?;
    let state = handle.settled(generation).await?;
    handle.exit()?;
    task.await.context("Engine task failed")?;

    let view = MapView::project(&state, config.map.fallback_coordinate());
    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        println!("{}", describe(&view));
        if state.phase == SearchPhase::Failed && state.origin.is_none() {
            println!("❌ Current position unavailable; pass --from to set an origin");
        }
    }

    Ok(state.phase == SearchPhase::Routed)
}

/// Read commands from stdin until the user quits
async fn run_shell(adapters: &Adapters, config: &AppConfig) -> anyhow::Result<()> {
    let surface = Arc::new(TerminalSurface::new(std::io::stdout()));
    let (handle, task) = adapters.engine(surface, config.engine_config()).spawn();

    println!("🗺️  Wayfinder shell. Type :help for commands.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        prompt("> ")?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        match parse_line(&line) {
            ShellCommand::Search(query) => submit(&handle, query).await?,
            ShellCommand::Locate => handle.locate()?,
            ShellCommand::Help => println!("{HELP}"),
            ShellCommand::Empty => {},
            ShellCommand::Unknown(command) => {
                println!("❓ Unknown command :{command} (try :help)");
            },
            ShellCommand::Quit => {
                prompt("Exit Wayfinder? [y/N] ")?;
                let answer = lines.next_line().await?.unwrap_or_default();
                if confirms_exit(&answer) {
                    break;
                }
            },
        }
    }

    handle.exit()?;
    let state = task.await.context("Engine task failed")?;
    debug!(generation = state.generation, "Shell closed");
    println!("👋 Bye");
    Ok(())
}

async fn submit(handle: &EngineHandle, query: SearchQuery) -> anyhow::Result<()> {
    let generation = handle.search(query).await?;
    debug!(generation, "Search submitted");
    Ok(())
}

fn prompt(text: &str) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout();
    write!(stdout, "{text}")?;
    stdout.flush()?;
    Ok(())
}

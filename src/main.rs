// src/main.rs
use std::path::PathBuf;
use std::process::exit;
use anyhow::{anyhow, Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{error, Level};

use dossier::config::Config;
use dossier::error::DossierError;
use dossier::{watch_interrupts, App, RunOptions};

/// Exit status used when the run is interrupted
const EXIT_ABORTED: i32 = 130;

#[derive(Parser)]
#[command(name = "dossier")]
#[command(version)]
#[command(about = "Single-target public profile reconnaissance")]
struct Args {
    /// Target profile identifier, with or without the leading @
    #[arg(short, long, required_unless_present = "init_config")]
    username: Option<String>,

    /// Save the dossier as JSON (".json" is appended when missing)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Configuration file layered over the built-in defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long, help = "Enable debug logging")]
    verbose: bool,

    #[arg(long, help = "Do not print the banner")]
    no_banner: bool,

    /// Write the default configuration to ~/.dossier/config.toml and exit
    #[arg(long)]
    init_config: bool,

    #[arg(long, requires = "init_config", help = "Overwrite an existing configuration")]
    force: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize logging: {}", e))?;

    if args.init_config {
        let path = Config::init(args.force).context("Failed to write default configuration")?;
        println!("Configuration written to {}", path.display());
        return Ok(());
    }

    let username = args.username.context("A target identifier is required")?;
    let config = Config::load(args.config.as_deref()).context("Failed to load configuration")?;

    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if watch_interrupts(|| async { tokio::signal::ctrl_c().await.is_ok() }, interrupt).await {
            exit(EXIT_ABORTED);
        }
    });

    let options = RunOptions {
        output: args.output,
        show_banner: !args.no_banner,
        show_progress: true,
    };
    let app = App::new(&config, options, cancel).context("Failed to initialize application")?;
    app.renderer().banner(&mut std::io::stdout())?;

    match app.run(&username).await {
        Ok(report) => {
            if let Some(path) = report.saved_to {
                println!("Dossier saved to {}", path.display());
            }
            Ok(())
        }
        Err(DossierError::Aborted { partial }) => {
            if let Some(partial) = partial {
                println!("\n[ PARTIAL DOSSIER ]");
                if let Err(e) = app.renderer().render(&partial) {
                    error!("Failed to render partial dossier: {}", e);
                }
            }
            eprintln!("Mission aborted by user.");
            exit(EXIT_ABORTED);
        }
        Err(e) => {
            error!("{}", e);
            exit(1);
        }
    }
}

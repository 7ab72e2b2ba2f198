mod analyze_cmd;
mod config_cmd;
mod status_cmd;
mod terminal_output;

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use pokedex_config::{load_and_prepare, validate, PokedexConfig};
use pokedex_gateway::{start_server, GatewayState};
use pokedex_understanding::build_provider;

use terminal_output::note_error;

#[derive(Parser)]
#[command(name = "pokedex")]
#[command(about = "Photograph a card, get back what a vision model sees")]
#[command(version)]
struct Cli {
    /// Path to a YAML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the analysis endpoint
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
        /// Address to bind the HTTP server to
        #[arg(long)]
        bind: Option<String>,
    },
    /// Submit an image file (or data: URL) to a running endpoint
    Analyze {
        file: PathBuf,
        /// Server base URL (defaults to the configured local port)
        #[arg(long)]
        endpoint: Option<String>,
    },
    /// Show whether the endpoint is running
    Status {
        #[arg(long)]
        endpoint: Option<String>,
    },
    /// Print the effective configuration with secrets redacted
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = load_and_prepare(cli.config.as_deref()).await?;
    pokedex_logging::init_logger(
        loaded.config.logging.dir.as_deref().map(Path::new),
        &loaded.config.logging.level,
    );
    loaded.log_report();
    let config = loaded.config;

    let local = format!("http://localhost:{}", config.server.port);

    match cli.command {
        Commands::Serve { port, bind } => {
            let mut config = config;
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(bind) = bind {
                config.server.bind_address = bind;
            }
            run_server(config).await?;
        }
        Commands::Analyze { file, endpoint } => {
            analyze_cmd::run(&file, endpoint.as_deref().unwrap_or(&local)).await?;
        }
        Commands::Status { endpoint } => {
            status_cmd::run(endpoint.as_deref().unwrap_or(&local)).await?;
        }
        Commands::Config => config_cmd::run(&config, &loaded.report)?,
    }

    Ok(())
}

async fn run_server(config: PokedexConfig) -> Result<()> {
    // CLI flags may have changed the config since it was loaded.
    let report = validate(&config);
    if !report.is_valid() {
        for error in &report.errors {
            note_error(&error.to_string());
        }
        bail!("Refusing to start with an invalid configuration");
    }

    let provider = build_provider(&config.vision)?;
    info!(
        provider = provider.name(),
        model = provider.model(),
        bind = %config.server.bind_address,
        port = config.server.port,
        "Starting Pokedex analysis endpoint"
    );

    let state = GatewayState::new(provider, config.vision.resolved_prompt())
        .with_max_upload_bytes(config.server.max_upload_bytes);

    let addr: SocketAddr = config
        .server
        .addr()
        .parse()
        .with_context(|| format!("Invalid bind address: {}", config.server.addr()))?;

    start_server(addr, state).await
}

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use match_stats::api::Server;
use match_stats::config::AppConfig;
use match_stats::extract::{extract_from_html, MatchStatsExtractor};
use match_stats::fetch::Fetcher;

#[derive(Parser)]
#[command(name = "match-stats")]
#[command(about = "Extract and rank per-player stats from match result pages")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Bind address
        #[arg(long)]
        host: Option<String>,

        /// Port number
        #[arg(long)]
        port: Option<u16>,
    },

    /// Extract a single match and print the ranked players as JSON
    Extract {
        /// Match page URL to fetch
        #[arg(long, conflicts_with = "file", required_unless_present = "file")]
        url: Option<String>,

        /// Local HTML file to parse instead of fetching
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

fn init_tracing(level: &str, json_logs: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let json_layer = json_logs.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
    });
    let text_layer =
        (!json_logs).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }

    init_tracing(&config.log_level, cli.json_logs);

    tracing::info!("Starting match-stats v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            config.validate()?;

            let fetcher = Fetcher::new(config.fetch.to_fetcher_config())?;
            let server = Server::new(config.server, Arc::new(fetcher));
            server.run().await?;
        }
        Commands::Extract { url, file } => {
            let players = match (url, file) {
                (Some(url), _) => {
                    let fetcher = Fetcher::new(config.fetch.to_fetcher_config())?;
                    let extractor = MatchStatsExtractor::new(Arc::new(fetcher));
                    extractor.extract(&url).await?
                }
                (None, Some(path)) => {
                    let html = std::fs::read_to_string(&path)
                        .with_context(|| format!("reading {}", path.display()))?;
                    extract_from_html(&html)?
                }
                (None, None) => anyhow::bail!("Specify --url or --file"),
            };

            println!("{}", serde_json::to_string_pretty(&players)?);
        }
    }

    Ok(())
}

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "shrinemap")]
#[command(about = "Shrine map data and place lookup tools")]
struct Cli {
    /// GeoJSON path or URL; overrides `SHRINEMAP_DATA_SOURCE`
    #[arg(long, global = true)]
    source: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Load and normalize the data source, then list the records
    Normalize {
        /// Print the records as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the marker/cluster layout after fitting the viewport
    Clusters {
        /// Zoom level to cluster at (defaults to the fitted zoom)
        #[arg(long)]
        zoom: Option<u8>,
    },
    /// Run place enrichment for one record and print its detail panel
    Lookup {
        /// Record id, e.g. shrine-0
        record_id: String,
    },
    /// Print the placeholder FeatureCollection
    Sample,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let mut config = shrinemap_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Some(source) = cli.source {
        config.data_source = source;
    }

    match cli.command {
        Commands::Normalize { json } => commands::run_normalize(&config, json).await,
        Commands::Clusters { zoom } => commands::run_clusters(&config, zoom).await,
        Commands::Lookup { record_id } => commands::run_lookup(&config, &record_id).await,
        Commands::Sample => commands::run_sample(),
    }
}

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use maps_leads::config::Config;
use maps_leads::pipeline::Pipeline;

#[derive(Debug, Parser)]
#[command(name = "maps-leads")]
#[command(about = "Find businesses on the map and enrich them with leads")]
struct Cli {
    /// Free-text maps search, e.g. "software companies".
    #[arg(long, default_value = "software companies")]
    query: String,

    /// Place name to search near.
    #[arg(long, default_value = "Chennai")]
    near: String,

    /// Directory for linkedin_output.json / linkedin_output.csv.
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Map zoom level used for the coordinate token.
    #[arg(long)]
    zoom: Option<u8>,
}

/// Entry point.
///
/// Loads configuration (failing fast on missing credentials), runs one
/// pipeline and prints the run summary as pretty JSON.
#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "maps_leads=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Run failed: {:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::from_env()?;
    if let Some(dir) = cli.output_dir {
        config.output_dir = dir;
    }
    if let Some(zoom) = cli.zoom {
        config.map_zoom = zoom;
    }

    let pipeline = Pipeline::new(&config)?;
    let summary = pipeline.run(&cli.query, &cli.near).await?;

    println!("\nFINAL RESULT:\n");
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

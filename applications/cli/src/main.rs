/// Cadence - track library management
use anyhow::Context;
use cadence_cli::{commands, config::CliConfig};
use cadence_core::DownloadSource;
use cadence_library::{DirectoryLibrary, YtDlpDownloader};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "cadence")]
#[command(about = "Manage the Cadence track library", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Library directory (overrides configuration)
    #[arg(short, long, global = true)]
    library: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List tracks in play order
    List {
        /// Only show tracks whose name contains this text
        #[arg(short, long)]
        filter: Option<String>,
    },
    /// Delete a track file
    Delete {
        /// Track file name, e.g. "Song.mp3"
        id: String,
    },
    /// Search and download a track as mp3
    Download {
        /// Search text or URL
        query: String,
        /// Where to search
        #[arg(short, long, default_value = "youtube")]
        source: DownloadSource,
    },
    /// Decode a track and print its duration, sample rate and frame count
    Inspect {
        /// Track file name
        id: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cadence=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = CliConfig::load(cli.config.as_deref()).context("loading configuration")?;
    if let Some(dir) = cli.library {
        config.library_dir = dir;
    }

    let library = DirectoryLibrary::new(&config.library_dir);
    library.initialize().await?;
    tracing::debug!(dir = %config.library_dir.display(), "library ready");

    match cli.command {
        Commands::List { filter } => {
            let entries = commands::list(&library, filter.as_deref()).await?;
            if entries.is_empty() {
                println!("No songs found.");
            }
            for entry in entries {
                println!("{entry}");
            }
        }
        Commands::Delete { id } => {
            commands::delete(&library, &id).await?;
            println!("Deleted {id}");
        }
        Commands::Download { query, source } => {
            let downloader = YtDlpDownloader::new(&config.ytdlp_path, &config.library_dir);
            let count = commands::download(&downloader, &library, &query, source).await?;
            println!("Download finished; library now has {count} tracks");
        }
        Commands::Inspect { id } => {
            let report = commands::inspect(&library, &id).await?;
            println!("{report}");
        }
    }

    Ok(())
}

#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

mod command;

use clap::{Parser, Subcommand};
use command::{
    CommandStrategy, ExtractInput, ExtractStrategy, InfoStrategy, InitStrategy, PatternsInput,
    PatternsStrategy, VersionStrategy,
};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "scorematch")]
#[command(about = "Extract grading scores from free-text pathology reports", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract score rows from texts
    Extract {
        /// JSON file with `[{"text_id": 1, "text": "..."}]`
        #[arg(short = 'i', long, conflicts_with = "text")]
        input: Option<PathBuf>,

        /// Single text to extract from
        #[arg(short = 't', long)]
        text: Option<String>,

        /// Where to write the rows; stdout when omitted
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Config file instead of ~/scorematch/config.json
        #[arg(short = 'c', long)]
        config: Option<PathBuf>,
    },
    /// Print the active pattern table as JSON
    Patterns {
        /// Config file instead of ~/scorematch/config.json
        #[arg(short = 'c', long)]
        config: Option<PathBuf>,
    },
    /// Initialize configuration
    Init,
    /// Show effective settings
    Info,
    /// Show version
    Version,
}

fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Extract {
            input,
            text,
            output,
            config,
        } => ExtractStrategy.execute(ExtractInput {
            input,
            text,
            output,
            config,
        }),
        Commands::Patterns { config } => PatternsStrategy.execute(PatternsInput { config }),
        Commands::Init => InitStrategy.execute(()),
        Commands::Info => InfoStrategy.execute(()),
        Commands::Version => VersionStrategy.execute(()),
    }
}

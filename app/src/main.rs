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
    CommandStrategy, FieldEdit, InfoStrategy, InitStrategy, ParseInput, ParseStrategy, SaveInput,
    SaveStrategy, ScanInput, ScanStrategy, VersionStrategy,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cardscan")]
#[command(about = "Business card scanner: photo to CRM record", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a card photo and print the extracted record
    Scan {
        /// Image file path or data URL
        image: String,

        /// Model to use
        #[arg(short = 'M', long)]
        model: Option<String>,

        /// Override a field before printing or saving (field=value)
        #[arg(long = "set", value_name = "FIELD=VALUE")]
        edits: Vec<FieldEdit>,

        /// Save the record to Airtable
        #[arg(long)]
        save: bool,
    },
    /// Extract a record from already-transcribed card text
    Parse {
        /// Text file to read (stdin when omitted)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Use the text heuristics only
        #[arg(long)]
        heuristic: bool,
    },
    /// Save a JSON record to Airtable
    Save {
        /// Path to the record JSON
        record: PathBuf,

        /// Override a field before saving (field=value)
        #[arg(long = "set", value_name = "FIELD=VALUE")]
        edits: Vec<FieldEdit>,
    },
    /// Show configuration and test the Airtable connection
    Info,
    /// Initialize configuration
    Init,
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Scan {
            image,
            model,
            edits,
            save,
        } => {
            ScanStrategy
                .execute(ScanInput {
                    image,
                    model,
                    edits,
                    save,
                })
                .await?;
        }
        Commands::Parse { file, heuristic } => {
            ParseStrategy
                .execute(ParseInput { file, heuristic })
                .await?;
        }
        Commands::Save { record, edits } => {
            SaveStrategy.execute(SaveInput { record, edits }).await?;
        }
        Commands::Info => InfoStrategy.execute(()).await?,
        Commands::Init => InitStrategy.execute(()).await?,
        Commands::Version => VersionStrategy.execute(()).await?,
    }

    Ok(())
}

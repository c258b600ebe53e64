use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use procsync::config::Config;
use procsync::sync::DuplicatePolicy;

mod commands;

#[derive(Parser)]
#[command(author, version = env!("CARGO_PKG_VERSION"), about = "Keep warehouse routines and a git repository in sync", long_about = None)]
struct Cli {
    /// Config file (defaults to ./procsync.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Dump routine definitions from the warehouse into the snapshot directory
    Dump {
        /// Ignore the configured schema filter and dump every schema in the catalog
        #[arg(long)]
        all_schemas: bool,

        /// Output the report as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Diff routine names between the snapshot directory and the repository
    Compare {
        /// Output the diff as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Overwrite repository files whose snapshot counterparts differ
    Sync {
        /// What to do when one snapshot file matches several repository files
        #[arg(long, value_enum)]
        on_duplicate: Option<DuplicatePolicy>,

        /// Output the report as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Prepend provenance headers to routine files listed in LIST
    Annotate {
        /// File of whitespace-separated `SCHEMA NAME` pairs ('-' for stdin)
        list: PathBuf,

        /// Output the records as JSON
        #[arg(short, long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Dump { all_schemas, json } => commands::dump::execute(&config, all_schemas, json),
        Commands::Compare { json } => commands::compare::execute(&config, json),
        Commands::Sync { on_duplicate, json } => {
            commands::sync::execute(&config, on_duplicate, json)
        }
        Commands::Annotate { list, json } => commands::annotate::execute(&config, &list, json),
    }
}

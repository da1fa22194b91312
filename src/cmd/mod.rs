mod describe;
mod preview;
mod seed;

use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "docseed")]
#[command(version)]
#[command(about = "Seed a document store with synthetic, internally consistent records", long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate one batch of records and insert them into the document store
    Seed {
        /// Store root: a directory path or file:// URI
        #[arg(short, long, env = "DOCSEED_STORE")]
        store: Option<String>,

        /// Database name inside the store
        #[arg(short, long, env = "DOCSEED_DB")]
        database: Option<String>,

        /// Fixed number of records per collection (otherwise normally distributed)
        #[arg(short, long, conflicts_with_all = ["mean", "std_dev"])]
        records: Option<usize>,

        /// Mean of the normally distributed record count (default: 1000)
        #[arg(long)]
        mean: Option<f64>,

        /// Standard deviation of the record count (default: 200)
        #[arg(long)]
        std_dev: Option<f64>,

        /// Random seed for reproducibility
        #[arg(long)]
        seed: Option<u64>,

        /// Collections to leave out (comma-separated names; replaces the config file list)
        #[arg(long)]
        skip: Option<String>,

        /// YAML config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Show progress during seeding
        #[arg(short, long)]
        progress: bool,

        /// Generate without writing to the store
        #[arg(long)]
        dry_run: bool,
    },

    /// Print generated records as JSON lines
    Preview {
        /// Entity to generate, or "all" for one of each
        #[arg(short, long, default_value = "all")]
        entity: String,

        /// Number of records (per entity with "all")
        #[arg(short = 'n', long, default_value = "1")]
        count: usize,

        /// Random seed for reproducibility
        #[arg(long)]
        seed: Option<u64>,

        /// Pretty-print each document
        #[arg(long)]
        pretty: bool,
    },

    /// List entities, their collections and field rules
    Describe {
        /// Only describe this entity
        #[arg(short, long)]
        entity: Option<String>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Seed {
            store,
            database,
            records,
            mean,
            std_dev,
            seed,
            skip,
            config,
            progress,
            dry_run,
        } => seed::run(
            store, database, records, mean, std_dev, seed, skip, config, progress, dry_run,
        ),
        Commands::Preview {
            entity,
            count,
            seed,
            pretty,
        } => preview::run(entity, count, seed, pretty),
        Commands::Describe { entity } => describe::run(entity),
        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "docseed", &mut io::stdout());
            Ok(())
        }
    }
}

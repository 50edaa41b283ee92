//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Perkscan - Track credit card reward rates
#[derive(Parser)]
#[command(name = "perkscan")]
#[command(about = "Scrape card marketing pages into structured reward records", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "perkscan.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable database encryption (not recommended for production)
    ///
    /// By default, the database is encrypted using SQLCipher.
    /// Set PERKSCAN_DB_KEY environment variable with your passphrase.
    /// Use --no-encrypt only for development or testing.
    #[arg(long, global = true)]
    pub no_encrypt: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Extract rewards from saved page text
    Extract {
        /// Card name (selects the extraction profile)
        #[arg(short, long)]
        card: String,

        /// Text file to read (stdin if not specified)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Store the extracted records in the database
        #[arg(long)]
        store: bool,

        /// Print records as JSON
        #[arg(long)]
        json: bool,
    },

    /// Scrape every card page in the catalog and store the results
    Scrape {
        /// Card catalog TOML (defaults to data dir override, then built-in)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Keep previously stored records instead of clearing them
        #[arg(long)]
        keep: bool,
    },

    /// Scrape now and then on a fixed interval until interrupted
    Watch {
        /// Hours between runs (default: PERKSCAN_SCRAPE_HOURS or 6; 0 runs once)
        #[arg(long, value_parser = clap::value_parser!(u64).range(0..=crate::scheduler::MAX_INTERVAL_HOURS))]
        every_hours: Option<u64>,

        /// Card catalog TOML
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Keep previously stored records instead of clearing them
        #[arg(long)]
        keep: bool,
    },

    /// List stored rewards
    Rewards {
        /// Only show this card
        #[arg(short, long)]
        card: Option<String>,

        /// Print records as JSON
        #[arg(long)]
        json: bool,
    },

    /// List stored statement credit offers
    Offers {
        /// Only show this card
        #[arg(short, long)]
        card: Option<String>,

        /// Print records as JSON
        #[arg(long)]
        json: bool,
    },

    /// List catalog cards and the extraction profile each uses
    Cards {
        /// Card catalog TOML
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// Show the standardized category for a phrase
    Normalize {
        /// Category phrase, e.g. "U.S. supermarkets"
        text: String,
    },

    /// Show database status and recent scrape runs
    Status,
}

//! Perkscan CLI - Credit card reward scraper
//!
//! Usage:
//!   perkscan init                         Initialize database
//!   perkscan scrape                       Scrape all catalog cards
//!   perkscan watch --every-hours 6        Scrape on a schedule
//!   perkscan extract --card NAME -f page  Extract from saved page text

mod cli;
mod commands;
mod scheduler;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db, cli.no_encrypt),
        Commands::Extract {
            card,
            file,
            store,
            json,
        } => {
            let text = commands::read_input(file.as_deref())?;
            let db = if store {
                Some(commands::open_db(&cli.db, cli.no_encrypt)?)
            } else {
                None
            };
            commands::cmd_extract(db.as_ref(), &card, &text, json).map(|_| ())
        }
        Commands::Scrape { catalog, keep } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_scrape(&db, catalog.as_deref(), keep).await
        }
        Commands::Watch {
            every_hours,
            catalog,
            keep,
        } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_watch(&db, every_hours, catalog.as_deref(), keep).await
        }
        Commands::Rewards { card, json } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_rewards(&db, card.as_deref(), json)
        }
        Commands::Offers { card, json } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_offers(&db, card.as_deref(), json)
        }
        Commands::Cards { catalog } => commands::cmd_cards(catalog.as_deref()),
        Commands::Normalize { text } => commands::cmd_normalize(&text),
        Commands::Status => commands::cmd_status(&cli.db, cli.no_encrypt),
    }
}

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use fyyur_suite::booking::BookingStore;
use fyyur_suite::coffee::CoffeeStore;
use fyyur_suite::config::{AppKind, Config};
use fyyur_suite::storage::Database;
use fyyur_suite::trivia::TriviaStore;

#[derive(Parser)]
#[command(name = "clear-database")]
#[command(about = "Delete all rows from one app's database after confirmation")]
struct Args {
    #[arg(value_enum)]
    app: AppKind,
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,
    /// Skip the confirmation prompt
    #[arg(long)]
    yes: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();
    let config = Config::load(&args.config)?;
    let db_path = config.database_path(args.app);

    if !args.yes {
        println!("⚠️  WARNING: This will delete ALL data from {db_path}!");
        println!("Press Enter to continue or Ctrl+C to cancel...");
        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;
    }

    println!("🗑️  Clearing database...");
    let db = Database::open(&db_path).with_context(|| format!("Failed to open '{db_path}'"))?;
    match args.app {
        AppKind::Booking => BookingStore::open(db).await?.clear().await?,
        AppKind::Trivia => TriviaStore::open(db).await?.clear().await?,
        AppKind::Coffee => CoffeeStore::open(db).await?.clear().await?,
    }

    println!("✅ Database cleared successfully!");
    Ok(())
}

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::{error, info};

use fyyur_suite::booking::BookingStore;
use fyyur_suite::coffee::CoffeeStore;
use fyyur_suite::config::{AppKind, Config};
use fyyur_suite::observability::metrics;
use fyyur_suite::storage::Database;
use fyyur_suite::trivia::TriviaStore;
use fyyur_suite::{logging, seed, server};

#[derive(Parser)]
#[command(name = "fyyur-suite")]
#[command(about = "Venue booking site, trivia API and coffee-shop backends")]
#[command(version)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, global = true, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one app's HTTP server
    Serve {
        #[arg(value_enum)]
        app: AppKind,
        /// Listener port (overrides the config file)
        #[arg(long)]
        port: Option<u16>,
        /// SQLite file (overrides the config file)
        #[arg(long)]
        database: Option<String>,
        /// Expose Prometheus metrics on this address, e.g. 127.0.0.1:9100
        #[arg(long)]
        metrics_addr: Option<SocketAddr>,
    },
    /// Insert demo data into an app's database
    Seed {
        #[arg(value_enum)]
        app: AppKind,
    },
}

impl Commands {
    fn app(&self) -> AppKind {
        match self {
            Commands::Serve { app, .. } | Commands::Seed { app } => *app,
        }
    }
}

async fn seed_app(app: AppKind, db: Database) -> Result<()> {
    match app {
        AppKind::Booking => seed::seed_booking(&BookingStore::open(db).await?).await?,
        AppKind::Trivia => seed::seed_trivia(&TriviaStore::open(db).await?).await?,
        AppKind::Coffee => seed::seed_coffee(&CoffeeStore::open(db).await?).await?,
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    let app = cli.command.app();

    // Keep the guards alive so file logs are flushed on exit
    let _guards = logging::init_logging(app.as_str());

    let mut config = Config::load(&cli.config)?;

    match cli.command {
        Commands::Serve {
            app,
            port,
            database,
            metrics_addr,
        } => {
            if let Some(database) = database {
                match app {
                    AppKind::Booking => config.booking.database = Some(database),
                    AppKind::Trivia => config.trivia.database = Some(database),
                    AppKind::Coffee => config.coffee.database = Some(database),
                }
            }
            if let Some(addr) = metrics_addr {
                metrics::init(addr).map_err(|e| anyhow::anyhow!(e.to_string()))?;
                info!("Metrics exporter listening on {}", addr);
            }

            let db_path = config.database_path(app);
            let db = Database::open(&db_path)
                .with_context(|| format!("Failed to open database '{db_path}'"))?;
            let router = server::create_server(app, &config, db).await?;
            let port = port.unwrap_or_else(|| config.port(app));
            if let Err(e) = server::start_server(app, router, port).await {
                error!("Server failed: {e:#}");
                return Err(e);
            }
        }
        Commands::Seed { app } => {
            let db_path = config.database_path(app);
            let db = Database::open(&db_path)
                .with_context(|| format!("Failed to open database '{db_path}'"))?;
            println!("🌱 Seeding {} database at {db_path}...", app.as_str());
            seed_app(app, db).await?;
            println!("✅ Seed data inserted");
        }
    }
    Ok(())
}

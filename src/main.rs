use std::path::PathBuf;

use anyhow::Context;
use axum::http::HeaderName;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use liftlog::config::Config;
use liftlog::{api, db};

#[derive(Parser)]
#[command(name = "liftlog")]
#[command(about = "Personal workout log: exercises, workouts and sets")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Port for HTTP API (overrides LIFTLOG_PORT)
        #[arg(short, long)]
        port: Option<u16>,

        /// SQLite database file (overrides LIFTLOG_DB_PATH)
        #[arg(long)]
        db: Option<PathBuf>,
    },
    /// Insert the default global exercises
    Seed {
        #[arg(long)]
        db: Option<PathBuf>,
    },
    /// Apply pending migrations and exit
    Migrate {
        #[arg(long)]
        db: Option<PathBuf>,
    },
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "liftlog=debug,tower_http=debug".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn open_database(config: &Config, db_override: Option<PathBuf>) -> anyhow::Result<db::Database> {
    let path = db_override.unwrap_or_else(|| config.db_path.clone());
    let db = db::Database::open(&path)
        .with_context(|| format!("Failed to open database at {}", path.display()))?;
    db.migrate().context("Failed to run migrations")?;
    Ok(db)
}

async fn serve(config: Config, port: Option<u16>, db_path: Option<PathBuf>) -> anyhow::Result<()> {
    let port = port.unwrap_or(config.port);
    let user_header = HeaderName::try_from(config.user_header.as_str())
        .with_context(|| format!("Invalid user header name: {}", config.user_header))?;

    let db = open_database(&config, db_path)?;
    let app = api::create_router_with(db, user_header);

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;
    tracing::info!("liftlog listening on http://127.0.0.1:{}", port);

    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = Config::from_env()?;

    match cli.command {
        Some(Commands::Serve { port, db }) => serve(config, port, db).await?,
        Some(Commands::Seed { db }) => {
            let db = open_database(&config, db)?;
            let inserted = db.seed_global_exercises(db::DEFAULT_GLOBAL_EXERCISES)?;
            println!("Inserted {} global exercises", inserted);
        }
        Some(Commands::Migrate { db }) => {
            open_database(&config, db)?;
            println!("Database is up to date");
        }
        None => serve(config, None, None).await?,
    }

    Ok(())
}

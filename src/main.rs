use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use hostel_complaints::config::{self, StoreBackend};
use hostel_complaints::database::DatabaseManager;
use hostel_complaints::{app, AppState};

#[derive(Parser)]
#[command(name = "hostel-complaints")]
#[command(about = "Hostel complaint management server")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    #[command(about = "Run the web server (default)")]
    Serve,

    #[command(about = "Create the database schema and exit")]
    InitDb,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so DATABASE_URL, SESSION_SECRET, etc. are picked up
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("hostel_complaints=info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();

    // Initialize configuration (this loads the config singleton)
    let config = config::config();
    config.validate().context("invalid configuration")?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config.clone()).await,
        Command::InitDb => init_db(config).await,
    }
}

async fn serve(config: config::AppConfig) -> anyhow::Result<()> {
    tracing::info!(
        "Starting hostel-complaints in {:?} mode ({:?} store)",
        config.environment,
        config.database.backend
    );

    let bind_addr = config.bind_addr();
    let state = AppState::connect(config)
        .await
        .context("failed to open the store")?;

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    tracing::info!("Listening on http://{}", bind_addr);

    axum::serve(listener, app(state)).await.context("server error")?;
    Ok(())
}

async fn init_db(config: &config::AppConfig) -> anyhow::Result<()> {
    if config.database.backend != StoreBackend::Postgres {
        anyhow::bail!("init-db needs the postgres store backend (set DATABASE_URL)");
    }
    let pool = DatabaseManager::connect(&config.database).await?;
    DatabaseManager::ensure_schema(&pool).await?;
    tracing::info!("Schema ready");
    Ok(())
}

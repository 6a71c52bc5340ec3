//! # SamStore Server
//!
//! Catalog backend for an online store.
//!
//! The server is built on Axum and uses PostgreSQL for persistent storage.
//! Run `samstore-server migrate` once before serving against a fresh
//! database.

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use clap::{Args as ClapArgs, Parser, Subcommand};
use samstore_core::database::{PostgresDatabase, context::DatabaseContext};
use samstore_server::{AppState, create_app, infra::config::Config};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// CLI entry point
#[derive(Parser, Debug)]
#[command(name = "samstore-server")]
#[command(about = "HTTP API for the SamStore catalog")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    serve: ServeArgs,
}

#[derive(ClapArgs, Debug, Clone)]
struct ServeArgs {
    /// Server port (overrides config)
    #[arg(short, long, env = "SERVER_PORT")]
    port: Option<u16>,

    /// Server host (overrides config)
    #[arg(long, env = "SERVER_HOST")]
    host: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Apply database migrations and exit
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = Config::from_env()?;
    if let Some(port) = cli.serve.port {
        config.server_port = port;
    }
    if let Some(host) = cli.serve.host.clone() {
        config.server_host = host;
    }

    match cli.command {
        Some(Command::Migrate) => run_migrate(&config).await,
        None => run_server(config).await,
    }
}

async fn connect(config: &Config) -> anyhow::Result<Arc<PostgresDatabase>> {
    let postgres = PostgresDatabase::new(config.database_url()?)
        .await
        .context("failed to connect to PostgreSQL")?;
    Ok(Arc::new(postgres))
}

async fn run_migrate(config: &Config) -> anyhow::Result<()> {
    let postgres = connect(config).await?;
    postgres
        .migrate()
        .await
        .context("failed to apply migrations")?;
    info!("Database migrations applied");
    Ok(())
}

async fn run_server(config: Config) -> anyhow::Result<()> {
    let context = DatabaseContext::from_postgres(connect(&config).await?);
    let stats = context.postgres().pool_stats();
    info!(
        pool_size = stats.size,
        max_size = stats.max_size,
        "Database ready"
    );

    let addr: SocketAddr = format!("{}:{}", config.server_host, config.server_port)
        .parse()
        .with_context(|| {
            format!(
                "invalid listen address {}:{}",
                config.server_host, config.server_port
            )
        })?;

    let state = AppState::new(config, context.unit_of_work());
    let router = create_app(state);

    info!("Starting SamStore server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    info!("Shutdown signal received");
}

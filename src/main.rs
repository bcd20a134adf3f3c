#![forbid(unsafe_code)]

mod config;
mod database;
mod error;
mod image_types;
mod models;
mod pages;
mod repository;
mod routes;
mod server;
mod submission_service;
mod utils;

use std::{process::exit, sync::Arc};

use clap::{Parser, Subcommand};
use config::AppConfig;
use database::setup_database;
use repository::SubmissionRepository;
use server::AppState;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Photo wall that hands out QR-coded reward links for every submission.
#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the web server (default).
    Serve,
    /// Create the database tables and exit.
    InitDb,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let dotenv_result = dotenvy::dotenv();
    let app_config = AppConfig::from_env();

    let default_directive = app_config
        .as_ref()
        .map(AppConfig::log_directive)
        .unwrap_or("reward_wall=info");

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_directive)),
        )
        .init();

    if let Err(err) = dotenv_result {
        warn!("Could not load config from .env file: {err}");
    }

    let app_config = match app_config {
        Ok(config) => config,
        Err(err) => {
            error!("Could not load app config: {err}");
            exit(255);
        }
    };

    let result = match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => run(app_config).await,
        Command::InitDb => init_db(&app_config).await,
    };

    if let Err(err) = result {
        error!("{err:#}");
        exit(255);
    }
}

async fn run(app_config: AppConfig) -> Result<(), anyhow::Error> {
    let db_pool = setup_database(&app_config.database_url).await?;

    let app_state = AppState::new(
        app_config,
        Arc::new(SubmissionRepository::new(db_pool.clone())),
    );

    let served = server::serve(app_state).await;

    info!("Closing the database");
    db_pool.close().await;

    served
}

async fn init_db(app_config: &AppConfig) -> Result<(), anyhow::Error> {
    let db_pool = setup_database(&app_config.database_url).await?;
    db_pool.close().await;

    println!("Initialized the database.");
    Ok(())
}

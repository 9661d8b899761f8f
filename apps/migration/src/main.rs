use std::path::PathBuf;

use clap::{Parser, Subcommand};
use migration::runner::{self, run_migrations, run_named};
use migration::{
    AddRetraiteTicketStatus, CreateAssetsTables, MigrationName, MigrationReport, StepOutcome,
};
use tracing_subscriber::prelude::*;

use crate::config::{AppConfig, MigrationConfig};

mod config;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, value_name = "FILE")]
    config: Option<Vec<PathBuf>>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, Default)]
enum Command {
    /// Add the `retraite` and `RETRAITE` values to the ticket status enum
    AddRetraiteStatus,
    /// Create the `assets` and `asset_history` tables
    CreateAssetsTables,
    /// Run every migration in order
    #[default]
    All,
    /// Print the migration names in run order
    List,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or_default();

    if let Command::List = command {
        for migration in runner::migrations() {
            println!("{}", migration.name());
        }
        return Ok(());
    }

    let mut config_files = cli.config.unwrap_or_default();
    config_files.insert(0, "config/config.yml".into());

    let config = AppConfig::from_files(&config_files)?;

    initialize_tracing(&config.app)?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(&config.app, command))
}

async fn run(config: &MigrationConfig, command: Command) -> anyhow::Result<()> {
    let db = sea_orm::Database::connect(config.database_url.as_str()).await?;

    let reports = match command {
        Command::AddRetraiteStatus => vec![run_named(&db, AddRetraiteTicketStatus.name()).await?],
        Command::CreateAssetsTables => vec![run_named(&db, CreateAssetsTables.name()).await?],
        Command::All => run_migrations(&db).await?,
        Command::List => vec![],
    };

    for report in &reports {
        log_report(report);
    }

    db.close().await?;
    Ok(())
}

fn log_report(report: &MigrationReport) {
    match &report.failure {
        None => tracing::info!(
            migration = %report.migration,
            applied = report.count(StepOutcome::Applied),
            already_present = report.count(StepOutcome::AlreadyPresent),
            unsupported = report.count(StepOutcome::Unsupported),
            "finished, no existing data was modified"
        ),
        Some(failure) => tracing::warn!(
            migration = %report.migration,
            "aborted and rolled back: {failure}"
        ),
    }
}

fn initialize_tracing(config: &MigrationConfig) -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().or_else(|_| {
        tracing_subscriber::EnvFilter::try_new(config.trace_level.as_deref().unwrap_or("info"))
    })?;

    let tracing_layer = tracing_subscriber::registry().with(filter);

    if config.trace_json.unwrap_or_default() {
        tracing_layer
            .with(tracing_subscriber::fmt::layer().json().flatten_event(true))
            .init();
    } else {
        tracing_layer.with(tracing_subscriber::fmt::layer()).init();
    };

    Ok(())
}

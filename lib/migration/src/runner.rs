use sea_orm::DatabaseConnection;

use crate::catalog::{DatabaseCatalog, SchemaCatalog};
use crate::error::MigrationError;
use crate::model::{FailureMode, MigrationReport, StepOutcome};
use crate::{AddRetraiteTicketStatus, CreateAssetsTables, SchemaMigration};

/// Every migration, in the order they have to be run.
pub fn migrations() -> Vec<Box<dyn SchemaMigration>> {
    vec![
        Box::new(AddRetraiteTicketStatus),
        Box::new(CreateAssetsTables),
    ]
}

pub async fn run_migration(
    migration: &dyn SchemaMigration,
    catalog: &dyn SchemaCatalog,
) -> Result<MigrationReport, MigrationError> {
    let name = migration.name();
    let mut report = MigrationReport::new(name);

    tracing::info!(migration = name, "starting migration");

    match migration.converge(catalog, &mut report).await {
        Ok(()) => {
            tracing::info!(
                migration = name,
                applied = report.count(StepOutcome::Applied),
                already_present = report.count(StepOutcome::AlreadyPresent),
                "migration completed"
            );
            Ok(report)
        }
        Err(err) => {
            let failure_mode = migration.failure_mode();
            tracing::error!(migration = name, %failure_mode, "migration failed: {err}");
            match failure_mode {
                FailureMode::Propagate => Err(err),
                FailureMode::ReportOnly => {
                    report.failure = Some(err.to_string());
                    Ok(report)
                }
            }
        }
    }
}

/// Runs all migrations in order, stopping at the first one that raises.
pub async fn run_migrations(
    db: &DatabaseConnection,
) -> Result<Vec<MigrationReport>, MigrationError> {
    let catalog = DatabaseCatalog::new(db.to_owned());

    let mut reports = vec![];
    for migration in migrations() {
        reports.push(run_migration(migration.as_ref(), &catalog).await?);
    }
    Ok(reports)
}

pub async fn run_named(
    db: &DatabaseConnection,
    name: &str,
) -> Result<MigrationReport, MigrationError> {
    let migration = migrations()
        .into_iter()
        .find(|migration| migration.name() == name)
        .ok_or_else(|| MigrationError::UnknownMigration(name.to_owned()))?;

    run_migration(migration.as_ref(), &DatabaseCatalog::new(db.to_owned())).await
}

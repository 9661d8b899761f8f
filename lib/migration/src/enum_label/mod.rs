use sea_orm::{DbBackend, DbErr};

use crate::catalog::SchemaCatalog;
use crate::error::{MigrationError, is_duplicate_object};
use crate::model::{MigrationReport, SchemaObject, StepOutcome};


/// Labels that must exist in an enum type known only by its name prefix.
#[derive(Clone, Copy, Debug)]
pub struct EnumLabels<'a> {
    pub type_prefix: &'a str,
    /// Altered when no enum type matches `type_prefix`; the database error that
    /// follows if it does not exist either is returned to the caller.
    pub fallback_type: &'a str,
    /// Compared case-sensitively.
    pub labels: &'a [&'a str],
}

/// Looks up the live name of the enum type starting with `type_prefix`.
pub async fn resolve_type_name(
    catalog: &dyn SchemaCatalog,
    type_prefix: &str,
) -> Result<Option<String>, DbErr> {
    let type_name = catalog.resolve_enum_type(type_prefix).await?;
    if type_name.is_none() {
        tracing::warn!(type_prefix, "no enum type matches prefix");
    }
    Ok(type_name)
}

/// Adds every missing label of `target`, each in its own commit.
///
/// The type name is resolved once, the first time a label is missing. A label
/// added concurrently by another run between the check and the alteration
/// counts as already present.
pub async fn ensure_enum_labels(
    catalog: &dyn SchemaCatalog,
    target: &EnumLabels<'_>,
    report: &mut MigrationReport,
) -> Result<(), MigrationError> {
    if catalog.backend() != DbBackend::Postgres {
        for label in target.labels {
            let object = SchemaObject::enum_label(target.type_prefix, *label);
            let outcome = StepOutcome::Unsupported;
            tracing::info!(%object, %outcome, "backend has no enum types, skipping");
            report.record(object, outcome);
        }
        return Ok(());
    }

    let mut resolved_type: Option<String> = None;

    for label in target.labels {
        let object = SchemaObject::enum_label(target.type_prefix, *label);

        if catalog.enum_has_label(target.type_prefix, label).await? {
            let outcome = StepOutcome::AlreadyPresent;
            tracing::info!(%object, %outcome, "already exists");
            report.record(object, outcome);
            continue;
        }

        let type_name = match resolved_type.take() {
            Some(type_name) => type_name,
            None => resolve_type_name(catalog, target.type_prefix)
                .await?
                .unwrap_or_else(|| target.fallback_type.to_owned()),
        };

        tracing::info!(%object, %type_name, "adding value");
        let result = catalog.add_enum_label(&type_name, label).await;
        resolved_type = Some(type_name);

        let outcome = match result {
            Ok(()) => StepOutcome::Applied,
            Err(err) if is_duplicate_object(&err) => {
                tracing::warn!(%object, "added concurrently: {err}");
                StepOutcome::AlreadyPresent
            }
            Err(source) => return Err(MigrationError::Apply { object, source }),
        };
        tracing::info!(%object, %outcome, "value converged");
        report.record(object, outcome);
    }

    Ok(())
}
